use thiserror::Error;

/// Coarse classification of ledger failures
///
/// Callers branch on this instead of matching individual variants, so new
/// store faults can be added without touching the command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    EmptyTotals,
    InvalidInput,
    Store,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    #[error("Topic already exists: {0}")]
    TopicAlreadyExists(String),

    #[error("Topic has no recorded points: {0}")]
    EmptyTotals(String),

    #[error("Invalid topic name: {0:?}")]
    InvalidTopicName(String),

    #[error("Points total overflow for {user} in {topic}")]
    PointsOverflow { topic: String, user: String },

    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::TopicNotFound(_) => ErrorKind::NotFound,
            LedgerError::TopicAlreadyExists(_) => ErrorKind::AlreadyExists,
            LedgerError::EmptyTotals(_) => ErrorKind::EmptyTotals,
            LedgerError::InvalidTopicName(_) => ErrorKind::InvalidInput,
            LedgerError::PointsOverflow { .. }
            | LedgerError::Fjall(_)
            | LedgerError::Serialization(_)
            | LedgerError::Io(_) => ErrorKind::Store,
        }
    }

    /// True for faults of the underlying store (retryable by the caller)
    pub fn is_store_error(&self) -> bool {
        self.kind() == ErrorKind::Store
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
