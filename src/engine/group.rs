// src/engine/group.rs
use std::fmt;
use std::str::FromStr;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::deprecation::{deprecate, Deprecation};
use super::parallel::join_ordered;
use super::state::{TaskConfig, TaskState};
use super::task::Task;
use super::worker::Worker;
use crate::error::{TaskError, TaskExecResult};

/// How a group runs its sub tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One at a time, in order, each awaited before the next starts
    Series,
    /// All at once, interleaved on the current task
    Parallel,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Series => "series",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "series" => Ok(Self::Series),
            "parallel" => Ok(Self::Parallel),
            other => Err(TaskError::InvalidMode(other.to_string())),
        }
    }
}

/// Result of executing a tree node: a task's value, or a group's ordered
/// sequence of its children's outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskOutput<R> {
    Value(R),
    Group(Vec<TaskOutput<R>>),
}

impl<R> TaskOutput<R> {
    pub fn as_value(&self) -> Option<&R> {
        match self {
            Self::Value(value) => Some(value),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&[TaskOutput<R>]> {
        match self {
            Self::Value(_) => None,
            Self::Group(outputs) => Some(outputs),
        }
    }

    pub fn into_value(self) -> Option<R> {
        match self {
            Self::Value(value) => Some(value),
            Self::Group(_) => None,
        }
    }

    /// Every value in the tree, depth first
    pub fn leaves(&self) -> Vec<&R> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a R>) {
        match self {
            Self::Value(value) => leaves.push(value),
            Self::Group(outputs) => {
                for output in outputs {
                    output.collect_leaves(leaves);
                }
            }
        }
    }
}

impl<R> From<Vec<TaskOutput<R>>> for TaskOutput<R> {
    fn from(outputs: Vec<TaskOutput<R>>) -> Self {
        Self::Group(outputs)
    }
}

/// A child of a group: either a single task or a nested group.
#[derive(Debug)]
pub enum SubTask<P, R> {
    Task(Task<P, R>),
    Group(GroupTask<P, R>),
}

impl<P, R> SubTask<P, R> {
    pub fn as_task(&self) -> Option<&Task<P, R>> {
        match self {
            Self::Task(task) => Some(task),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupTask<P, R>> {
        match self {
            Self::Task(_) => None,
            Self::Group(group) => Some(group),
        }
    }

    pub fn as_task_mut(&mut self) -> Option<&mut Task<P, R>> {
        match self {
            Self::Task(task) => Some(task),
            Self::Group(_) => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupTask<P, R>> {
        match self {
            Self::Task(_) => None,
            Self::Group(group) => Some(group),
        }
    }

    /// The stored result of this node, in output form
    pub fn output(&self) -> Option<TaskOutput<R>>
    where
        R: Clone,
    {
        match self {
            Self::Task(task) => task.result().cloned().map(TaskOutput::Value),
            Self::Group(group) => group.result().cloned().map(TaskOutput::Group),
        }
    }
}

impl<P, R> SubTask<P, R>
where
    P: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Execute this node with `fallback` as its fallback configuration
    pub fn execute<'a>(
        &'a mut self,
        fallback: &'a TaskConfig<P, R>,
    ) -> BoxFuture<'a, TaskExecResult<TaskOutput<R>>> {
        async move {
            match self {
                Self::Task(task) => task.execute(fallback).await.map(TaskOutput::Value),
                Self::Group(group) => group.execute(fallback).await.map(TaskOutput::Group),
            }
        }
        .boxed()
    }
}

impl<P, R> From<Task<P, R>> for SubTask<P, R> {
    fn from(task: Task<P, R>) -> Self {
        Self::Task(task)
    }
}

impl<P, R> From<GroupTask<P, R>> for SubTask<P, R> {
    fn from(group: GroupTask<P, R>) -> Self {
        Self::Group(group)
    }
}

impl<P: Clone, R: Clone> Clone for SubTask<P, R> {
    fn clone(&self) -> Self {
        match self {
            Self::Task(task) => Self::Task(task.clone()),
            Self::Group(group) => Self::Group(group.clone()),
        }
    }
}

/// Construction options for a [`GroupTask`].
///
/// `legacy_type` is the old spelling of `mode`. It is only consulted when
/// `mode` is unset and its use is reported as deprecated.
pub struct GroupTaskConfig<P, R> {
    pub mode: Option<Mode>,
    pub legacy_type: Option<Mode>,
    pub sub_tasks: Vec<SubTask<P, R>>,
    pub worker: Option<Worker<P, R>>,
    pub worker_params: Option<P>,
}

impl<P, R> Default for GroupTaskConfig<P, R> {
    fn default() -> Self {
        Self {
            mode: None,
            legacy_type: None,
            sub_tasks: Vec::new(),
            worker: None,
            worker_params: None,
        }
    }
}

/// A group of tasks and nested groups executed in series or in parallel.
///
/// The group's own worker and parameters are optional. When set (or
/// supplied by the caller's fallback) they become the fallback of every
/// sub task.
#[derive(Debug)]
pub struct GroupTask<P, R> {
    state: TaskState<P, R, Vec<TaskOutput<R>>>,
    mode: Mode,
    sub_tasks: Vec<SubTask<P, R>>,
}

impl<P, R> GroupTask<P, R> {
    pub fn new(mode: Mode, sub_tasks: Vec<SubTask<P, R>>) -> TaskExecResult<Self> {
        Self::from_config(GroupTaskConfig {
            mode: Some(mode),
            sub_tasks,
            ..GroupTaskConfig::default()
        })
    }

    pub fn series(sub_tasks: Vec<SubTask<P, R>>) -> TaskExecResult<Self> {
        Self::new(Mode::Series, sub_tasks)
    }

    pub fn parallel(sub_tasks: Vec<SubTask<P, R>>) -> TaskExecResult<Self> {
        Self::new(Mode::Parallel, sub_tasks)
    }

    /// Validate `config` and build the group.
    ///
    /// Fails with `InvalidMode` when neither `mode` nor `legacy_type` is
    /// set and with `EmptySubtasks` when there are no sub tasks.
    pub fn from_config(config: GroupTaskConfig<P, R>) -> TaskExecResult<Self> {
        let GroupTaskConfig {
            mode,
            legacy_type,
            sub_tasks,
            worker,
            worker_params,
        } = config;

        if legacy_type.is_some() {
            deprecate(Deprecation::TypeField);
        }
        let mode = mode
            .or(legacy_type)
            .ok_or_else(|| TaskError::InvalidMode(String::new()))?;

        check_sub_tasks(&sub_tasks)?;

        Ok(Self {
            state: TaskState::new(TaskConfig {
                worker,
                worker_params,
            }),
            mode,
            sub_tasks,
        })
    }

    /// Like [`GroupTask::from_config`], but a missing configuration is an
    /// error rather than impossible.
    pub fn try_from_config(config: Option<GroupTaskConfig<P, R>>) -> TaskExecResult<Self> {
        config
            .ok_or(TaskError::MissingGroupConfiguration)
            .and_then(Self::from_config)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    #[deprecated(note = "use `mode` instead")]
    pub fn group_type(&self) -> Mode {
        deprecate(Deprecation::TypeField);
        self.mode
    }

    #[deprecated(note = "use `set_mode` instead")]
    pub fn set_group_type(&mut self, mode: Mode) {
        deprecate(Deprecation::TypeField);
        self.mode = mode;
    }

    pub fn sub_tasks(&self) -> &[SubTask<P, R>] {
        &self.sub_tasks
    }

    pub fn sub_tasks_mut(&mut self) -> &mut [SubTask<P, R>] {
        &mut self.sub_tasks
    }

    /// Replace the sub tasks, under the same rules as construction
    pub fn set_sub_tasks(&mut self, sub_tasks: Vec<SubTask<P, R>>) -> TaskExecResult<()> {
        check_sub_tasks(&sub_tasks)?;
        self.sub_tasks = sub_tasks;
        Ok(())
    }

    pub fn worker(&self) -> Option<&Worker<P, R>> {
        self.state.worker()
    }

    pub fn worker_params(&self) -> Option<&P> {
        self.state.worker_params()
    }

    /// Outputs of the last successful execution, one per sub task
    pub fn result(&self) -> Option<&Vec<TaskOutput<R>>> {
        self.state.result()
    }

    pub fn set_worker(&mut self, worker: Option<Worker<P, R>>) {
        self.state.set_worker(worker);
    }

    pub fn set_worker_params(&mut self, worker_params: Option<P>) {
        self.state.set_worker_params(worker_params);
    }
}

impl<P, R> GroupTask<P, R>
where
    P: Clone + Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Execute every sub task according to the group mode.
    ///
    /// The group's worker and parameters, resolved against `fallback`, are
    /// handed down as the fallback of each sub task. Outputs are stored and
    /// returned in sub task order regardless of mode. Any sub task failure
    /// fails the whole group and leaves its previous result untouched.
    ///
    /// In parallel mode nothing starts unless every direct child task can
    /// resolve a worker and parameters. Once started, siblings are never
    /// cancelled: a worker failure is returned only after the slowest
    /// sibling has settled.
    pub async fn execute(&mut self, fallback: &TaskConfig<P, R>) -> TaskExecResult<Vec<TaskOutput<R>>> {
        let inherited = self.state.resolve(fallback);

        debug!(
            mode = %self.mode,
            sub_tasks = self.sub_tasks.len(),
            "Executing group task"
        );

        let outputs = match self.mode {
            Mode::Series => {
                let mut outputs = Vec::with_capacity(self.sub_tasks.len());
                for (index, sub_task) in self.sub_tasks.iter_mut().enumerate() {
                    trace!("Running sub task {} in series", index);
                    outputs.push(sub_task.execute(&inherited).await?);
                }
                outputs
            }
            Mode::Parallel => {
                for sub_task in &self.sub_tasks {
                    if let SubTask::Task(task) = sub_task {
                        task.check(&inherited)?;
                    }
                }
                join_ordered(
                    self.sub_tasks
                        .iter_mut()
                        .map(|sub_task| sub_task.execute(&inherited)),
                )
                .await?
            }
        };

        self.state.store_result(outputs.clone());
        debug!("Group task completed with {} outputs", outputs.len());
        Ok(outputs)
    }

    /// Execute without a fallback configuration
    pub async fn run(&mut self) -> TaskExecResult<Vec<TaskOutput<R>>> {
        self.execute(&TaskConfig::new()).await
    }
}

impl<P: Clone, R: Clone> Clone for GroupTask<P, R> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            mode: self.mode,
            sub_tasks: self.sub_tasks.clone(),
        }
    }
}

fn check_sub_tasks<P, R>(sub_tasks: &[SubTask<P, R>]) -> TaskExecResult<()> {
    match sub_tasks.len() {
        0 => Err(TaskError::EmptySubtasks),
        1 => {
            deprecate(Deprecation::SingleSubTask);
            Ok(())
        }
        _ => Ok(()),
    }
}
