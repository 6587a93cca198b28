use thiserror::Error;

/// Errors surfaced by the store, the summary windows and the session controller
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Rejected user input (blank task name, bad month, already tracking)
    #[error("{0}")]
    Validation(String),

    /// A timestamp supplied for an edit could not be parsed
    #[error("invalid date-time '{value}' (expected YYYY-MM-DD HH:MM:SS)")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The store refused to start a second running task
    #[error("task {0} is already running; stop it first")]
    AlreadyRunning(i64),

    /// Underlying database failure
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
