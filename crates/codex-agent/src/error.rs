use crate::classify::ErrorCategory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("'{0}' was not found on PATH")]
    NotFound(String),

    #[error("'{program}' timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("'{program}' failed ({category}): {detail}")]
    Failed {
        program: String,
        category: ErrorCategory,
        detail: String,
    },
}

impl CodexError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CodexError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                ErrorCategory::Permission
            }
            CodexError::Io(_) => ErrorCategory::Unknown,
            CodexError::NotFound(_) => ErrorCategory::NotInstalled,
            CodexError::Timeout { .. } => ErrorCategory::Timeout,
            CodexError::Failed { category, .. } => *category,
        }
    }

    /// What the user can do about this error.
    pub fn suggestion(&self) -> &'static str {
        self.category().suggestion()
    }
}
