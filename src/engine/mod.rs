// src/engine/mod.rs
pub mod deprecation;
mod group;
mod parallel;
mod state;
mod task;
mod worker;

pub use deprecation::Deprecation;
pub use group::{GroupTask, GroupTaskConfig, Mode, SubTask, TaskOutput};
pub use parallel::join_ordered;
pub use state::{TaskConfig, TaskState};
pub use task::Task;
pub use worker::{TaskWorker, Worker};
