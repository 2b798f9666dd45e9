// src/cli/app.rs
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Settings;
use crate::error::TaskExecResult;

use super::commands::{self, Args};

/// The command-line application
pub struct App {
    settings: Settings,
    settings_source: Option<PathBuf>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            settings_source: None,
        }
    }

    /// Load settings for `args` and build the application.
    ///
    /// Runs before logging is installed; `run` reports where the settings
    /// came from.
    pub fn from_args(args: &Args) -> TaskExecResult<Self> {
        let settings = Settings::load(args.config.as_deref())?;
        Ok(Self {
            settings,
            settings_source: Settings::source(args.config.as_deref()),
        })
    }

    /// Log level for this invocation
    pub fn log_level(&self, args: &Args) -> TaskExecResult<tracing::Level> {
        if args.verbose {
            return Ok(tracing::Level::DEBUG);
        }
        self.settings.log_level()
    }

    /// Tokio runtime as configured in the settings
    pub fn build_runtime(&self) -> std::io::Result<tokio::runtime::Runtime> {
        use crate::config::RuntimeFlavor;

        let runtime = &self.settings.runtime;
        match runtime.flavor {
            RuntimeFlavor::CurrentThread => tokio::runtime::Builder::new_current_thread().enable_all().build(),
            RuntimeFlavor::MultiThread => tokio::runtime::Builder::new_multi_thread()
                .worker_threads(runtime.worker_threads())
                .enable_all()
                .build(),
        }
    }

    /// Run the command given on the command line
    pub async fn run(&self, args: &Args) -> TaskExecResult<()> {
        info!("Starting taskexec v{}", env!("CARGO_PKG_VERSION"));
        match &self.settings_source {
            Some(path) => info!("Settings loaded from: {}", path.display()),
            None => info!("No settings file found, using built-in defaults"),
        }
        debug!("Settings: {:?}", self.settings);

        match &args.command {
            Some(command) => commands::execute_command(command, &self.settings).await,
            None => {
                println!("No command specified. Use --help for available commands.");
                Ok(())
            }
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Settings file in effect, `None` for built-in defaults
    pub fn settings_source(&self) -> Option<&Path> {
        self.settings_source.as_deref()
    }
}
