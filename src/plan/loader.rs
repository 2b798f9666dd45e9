// src/plan/loader.rs
use std::path::Path;

use config::{Config as ConfigLoader, FileFormat};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::registry::WorkerRegistry;
use super::schema::PlanNode;
use crate::engine::deprecation::{deprecate, Deprecation};
use crate::engine::{GroupTask, GroupTaskConfig, Mode, SubTask, Task, TaskConfig};
use crate::error::{TaskError, TaskExecResult};

impl<P: DeserializeOwned> PlanNode<P> {
    /// Load a plan file. The format follows the extension (TOML, JSON or
    /// YAML).
    pub fn load(path: &Path) -> TaskExecResult<Self> {
        info!("Loading plan from: {}", path.display());

        if !path.exists() {
            return Err(TaskError::Io {
                path: path.to_path_buf(),
                message: "Plan file not found".to_string(),
            });
        }

        ConfigLoader::builder()
            .add_source(config::File::from(path))
            .build()
            .and_then(|plan| plan.try_deserialize())
            .map_err(|e| TaskError::Plan(format!("Failed to load plan {}: {}", path.display(), e)))
    }

    pub fn from_toml_str(s: &str) -> TaskExecResult<Self> {
        toml::from_str(s).map_err(|e| TaskError::Plan(format!("Failed to parse TOML plan: {}", e)))
    }

    pub fn from_json_str(s: &str) -> TaskExecResult<Self> {
        serde_json::from_str(s).map_err(|e| TaskError::Plan(format!("Failed to parse JSON plan: {}", e)))
    }

    /// Parse a plan held in memory through the same loader used for files
    pub fn from_str_with_format(s: &str, format: FileFormat) -> TaskExecResult<Self> {
        ConfigLoader::builder()
            .add_source(config::File::from_str(s, format))
            .build()
            .and_then(|plan| plan.try_deserialize())
            .map_err(|e| TaskError::Plan(format!("Failed to parse plan: {}", e)))
    }
}

impl<P: Clone> PlanNode<P> {
    /// Build the root group of the plan.
    pub fn build<R>(&self, registry: &WorkerRegistry<P, R>) -> TaskExecResult<GroupTask<P, R>>
    where
        P: Send + 'static,
        R: Send + 'static,
    {
        match self.build_node(registry)? {
            SubTask::Group(group) => Ok(group),
            SubTask::Task(_) => Err(TaskError::Plan(
                "plan root must be a group with `mode` and `tasks`".to_string(),
            )),
        }
    }

    fn build_node<R>(&self, registry: &WorkerRegistry<P, R>) -> TaskExecResult<SubTask<P, R>>
    where
        P: Send + 'static,
        R: Send + 'static,
    {
        let worker = self.worker.as_deref().map(|name| registry.get(name)).transpose()?;
        let worker_params = self.params.clone();

        if !self.is_group() {
            return Ok(Task::new(TaskConfig { worker, worker_params }).into());
        }

        let mode = self.mode.as_deref().map(str::parse::<Mode>).transpose()?;
        // `type` is only read when `mode` is absent
        let legacy_type = match (mode, self.legacy_type.as_deref()) {
            (None, Some(legacy)) => Some(legacy.parse::<Mode>()?),
            (Some(_), Some(_)) => {
                deprecate(Deprecation::TypeField);
                None
            }
            _ => None,
        };

        let sub_tasks = self
            .tasks
            .iter()
            .flatten()
            .map(|child| child.build_node(registry))
            .collect::<TaskExecResult<Vec<_>>>()?;
        debug!("Building group with {} sub tasks", sub_tasks.len());

        GroupTask::from_config(GroupTaskConfig {
            mode,
            legacy_type,
            sub_tasks,
            worker,
            worker_params,
        })
        .map(SubTask::from)
    }
}
