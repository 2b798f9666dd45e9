// src/report.rs
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::engine::{GroupTask, Mode, TaskOutput};
use crate::error::{TaskError, TaskExecResult};

/// Outcome of one execution of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport<R> {
    pub run_id: Uuid,
    pub mode: Mode,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub result: Vec<TaskOutput<R>>,
}

impl<R> RunReport<R>
where
    R: Clone + Send + Sync + 'static,
{
    /// Execute `group` and record when it ran and what it produced
    pub async fn capture<P>(group: &mut GroupTask<P, R>) -> TaskExecResult<Self>
    where
        P: Clone + Send + Sync + 'static,
    {
        let run_id = Uuid::new_v4();
        info!("Starting run {} ({} mode)", run_id, group.mode());

        let started_at = Utc::now();
        let result = group.run().await?;
        let finished_at = Utc::now();
        let elapsed_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;

        info!("Run {} finished in {} ms", run_id, elapsed_ms);

        Ok(Self {
            run_id,
            mode: group.mode(),
            started_at,
            finished_at,
            elapsed_ms,
            result,
        })
    }
}

impl<R: Serialize> RunReport<R> {
    pub fn to_json(&self, pretty: bool) -> TaskExecResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.map_err(|e| TaskError::Plan(format!("Failed to serialize report: {}", e)))
    }

    /// Write the report as JSON to `path`
    pub fn save(&self, path: &Path, pretty: bool) -> TaskExecResult<()> {
        std::fs::write(path, self.to_json(pretty)?).map_err(|e| TaskError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write report: {}", e),
        })?;
        info!("Report saved to {}", path.display());
        Ok(())
    }
}
