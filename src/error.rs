// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Stable error messages, kept identical across releases so callers that
/// match on text keep working.
pub mod messages {
    pub const NO_CONFIG: &str = "no config set and no fallback config provided";
    pub const NO_WORKER: &str = "no worker set and no fallback worker provided";
    pub const NO_WORKER_PARAMS: &str = "no workerParams set and no fallback workerParams provided";
    pub const NO_GROUP_CONFIG: &str = "cannot create grouptask without config";
    pub const INVALID_MODE: &str = "invalid grouptask mode";
    pub const EMPTY_SUBTASKS: &str = "subTasks cannot be empty";
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("{}", messages::NO_CONFIG)]
    MissingConfiguration,

    #[error("{}", messages::NO_WORKER)]
    MissingWorker,

    #[error("{}", messages::NO_WORKER_PARAMS)]
    MissingWorkerParams,

    #[error("{}", messages::NO_GROUP_CONFIG)]
    MissingGroupConfiguration,

    #[error("{}: {0:?}", messages::INVALID_MODE)]
    InvalidMode(String),

    #[error("{}", messages::EMPTY_SUBTASKS)]
    EmptySubtasks,

    /// Failure raised by a worker, passed through untouched.
    #[error(transparent)]
    Worker(#[from] anyhow::Error),

    #[error("Unknown worker: {0}")]
    UnknownWorker(String),

    #[error("Plan error: {0}")]
    Plan(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File error: {path:?} - {message}")]
    Io {
        path: PathBuf,
        message: String,
    },
}

/// Coarse classification of [`TaskError`] for callers that branch on the
/// failure kind rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingConfiguration,
    MissingWorker,
    MissingWorkerParams,
    InvalidMode,
    EmptySubtasks,
    Worker,
    UnknownWorker,
    Plan,
    Config,
    Io,
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfiguration | Self::MissingGroupConfiguration => {
                ErrorKind::MissingConfiguration
            }
            Self::MissingWorker => ErrorKind::MissingWorker,
            Self::MissingWorkerParams => ErrorKind::MissingWorkerParams,
            Self::InvalidMode(_) => ErrorKind::InvalidMode,
            Self::EmptySubtasks => ErrorKind::EmptySubtasks,
            Self::Worker(_) => ErrorKind::Worker,
            Self::UnknownWorker(_) => ErrorKind::UnknownWorker,
            Self::Plan(_) => ErrorKind::Plan,
            Self::Config(_) => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// The worker's own error, if this failure came from a worker call.
    pub fn worker_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Worker(err) => Some(err),
            _ => None,
        }
    }
}

pub type TaskExecResult<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(TaskError::MissingConfiguration.to_string(), messages::NO_CONFIG);
        assert_eq!(TaskError::MissingWorker.to_string(), messages::NO_WORKER);
        assert_eq!(TaskError::MissingWorkerParams.to_string(), messages::NO_WORKER_PARAMS);
        assert_eq!(TaskError::EmptySubtasks.to_string(), messages::EMPTY_SUBTASKS);
        assert!(TaskError::InvalidMode("bogus".into())
            .to_string()
            .starts_with(messages::INVALID_MODE));
    }

    #[test]
    fn test_worker_error_is_transparent() {
        let err = TaskError::from(anyhow::anyhow!("disk on fire"));
        assert_eq!(err.to_string(), "disk on fire");
        assert_eq!(err.kind(), ErrorKind::Worker);
        assert!(err.worker_error().is_some());
    }

    #[test]
    fn test_group_config_kind() {
        assert_eq!(
            TaskError::MissingGroupConfiguration.kind(),
            ErrorKind::MissingConfiguration
        );
        assert_eq!(
            TaskError::MissingGroupConfiguration.to_string(),
            messages::NO_GROUP_CONFIG
        );
    }
}
