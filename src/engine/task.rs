// src/engine/task.rs
use tracing::{debug, trace};

use super::state::{TaskConfig, TaskState};
use super::worker::Worker;
use crate::error::{TaskError, TaskExecResult};

/// A deferred worker call.
///
/// The worker and its parameters may be left unset and supplied through the
/// fallback configuration at execution time instead.
#[derive(Debug)]
pub struct Task<P, R> {
    state: TaskState<P, R, R>,
}

impl<P, R> Task<P, R> {
    pub fn new(config: TaskConfig<P, R>) -> Self {
        Self {
            state: TaskState::new(config),
        }
    }

    /// Task with both worker and parameters set
    pub fn with(worker: Worker<P, R>, worker_params: P) -> Self {
        Self::new(TaskConfig {
            worker: Some(worker),
            worker_params: Some(worker_params),
        })
    }

    pub fn worker(&self) -> Option<&Worker<P, R>> {
        self.state.worker()
    }

    pub fn worker_params(&self) -> Option<&P> {
        self.state.worker_params()
    }

    /// Result of the last successful execution, cleared whenever the worker
    /// or the parameters are replaced
    pub fn result(&self) -> Option<&R> {
        self.state.result()
    }

    pub fn set_worker(&mut self, worker: Option<Worker<P, R>>) {
        self.state.set_worker(worker);
    }

    pub fn set_worker_params(&mut self, worker_params: Option<P>) {
        self.state.set_worker_params(worker_params);
    }
}

impl<P, R> Task<P, R>
where
    P: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Execute the task.
    ///
    /// The task's own worker and parameters take precedence; `fallback` only
    /// fills in what is unset, for this call only. The worker's value is
    /// stored as the task result and returned. A failing worker leaves the
    /// previous result in place.
    pub async fn execute(&mut self, fallback: &TaskConfig<P, R>) -> TaskExecResult<R> {
        let (worker, worker_params) = require(self.state.resolve(fallback))?;

        trace!("Executing task");
        let value = worker.call(worker_params).await?;

        self.state.store_result(value.clone());
        debug!("Task completed");
        Ok(value)
    }

    /// Execute without a fallback configuration
    pub async fn run(&mut self) -> TaskExecResult<R> {
        self.execute(&TaskConfig::new()).await
    }

    /// Whether `execute(fallback)` would find a worker and parameters
    pub(crate) fn check(&self, fallback: &TaskConfig<P, R>) -> TaskExecResult<()> {
        require(self.state.resolve(fallback)).map(|_| ())
    }
}

impl<P, R> Default for Task<P, R> {
    fn default() -> Self {
        Self::new(TaskConfig::new())
    }
}

impl<P: Clone, R: Clone> Clone for Task<P, R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

/// Split a resolved configuration into the worker and its parameters, or
/// report which half is missing.
fn require<P, R>(resolved: TaskConfig<P, R>) -> TaskExecResult<(Worker<P, R>, P)> {
    match (resolved.worker, resolved.worker_params) {
        (Some(worker), Some(worker_params)) => Ok((worker, worker_params)),
        (None, None) => Err(TaskError::MissingConfiguration),
        (None, Some(_)) => Err(TaskError::MissingWorker),
        (Some(_), None) => Err(TaskError::MissingWorkerParams),
    }
}
