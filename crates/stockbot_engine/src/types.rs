use std::fmt;
use std::path::PathBuf;

use stockbot_core::{LogEntry, Notification, PrefilledError, PrefilledStock};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// Unknown to the controller.
    #[default]
    Idle,
    Running,
    Completed,
    Aborted,
}

impl RunStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Aborted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartRejected {
    #[error("{active} is already running")]
    AlreadyRunning { active: RunId },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("response larger than {max_bytes} bytes")]
    TooLarge { max_bytes: u64 },
    #[error(transparent)]
    Parse(#[from] PrefilledError),
}

/// Events the engine thread sends back to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Log(LogEntry),
    PrefilledLoaded(Vec<PrefilledStock>),
    PrefilledFailed(String),
    RunFinished { run_id: RunId, status: RunStatus },
    Notice(Notification),
}
