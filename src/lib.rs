pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod plan;
pub mod report;

// Re-export main types for easier access
pub use crate::config::Settings;
pub use engine::{
    GroupTask,
    GroupTaskConfig,
    Mode,
    SubTask,
    Task,
    TaskConfig,
    TaskOutput,
    TaskState,
    TaskWorker,
    Worker,
};
pub use error::{ErrorKind, TaskError, TaskExecResult};
pub use plan::{PlanNode, WorkerRegistry};
pub use report::RunReport;

/// Former name of [`Mode`]
#[deprecated(note = "use `Mode` instead")]
pub type GroupTaskType = Mode;

/// Former name of [`Worker`]
#[deprecated(note = "use `Worker` instead")]
pub type WorkerFn<P, R> = Worker<P, R>;
