// src/config/schema.rs
use serde::{Deserialize, Serialize};

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub log: LogSettings,
    pub runtime: RuntimeSettings,
    pub output: OutputSettings,
    pub plan: PlanSettings,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// One of trace, debug, info, warn, error
    pub level: String,
}

/// Tokio runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    pub flavor: RuntimeFlavor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeFlavor {
    CurrentThread,
    MultiThread,
}

/// Report output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub pretty: bool,
}

/// Plan execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSettings {
    /// Delay added in front of every worker call, in milliseconds
    pub default_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log: LogSettings {
                level: "info".to_string(),
            },
            runtime: RuntimeSettings {
                flavor: RuntimeFlavor::MultiThread,
                worker_threads: None,
            },
            output: OutputSettings { pretty: true },
            plan: PlanSettings { default_delay_ms: 0 },
        }
    }
}

impl RuntimeSettings {
    /// Configured worker thread count, or one per CPU
    pub fn worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get).max(1)
    }
}
