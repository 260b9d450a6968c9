use thiserror::Error;

#[derive(Debug, Error)]
pub enum UxkitError {
    #[error("not initialized: run 'uxkit init'")]
    NotInitialized,

    #[error("study not found: {0}")]
    StudyNotFound(String),

    #[error("study already exists: {0}")]
    StudyExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid study name: {0}")]
    InvalidName(String),

    #[error("source not found in study '{study}': {source_id}")]
    SourceNotFound { study: String, source_id: String },

    #[error("no sources provided and none discovered for study '{0}'")]
    NoSources(String),

    #[error("invalid participant '{0}': must be a plain file name inside the study's sources/")]
    InvalidParticipant(String),

    #[error("transcript not found: {0}")]
    TranscriptNotFound(String),

    #[error("nothing to synthesize in study '{0}': generate questions, summaries or interviews first")]
    NothingToSynthesize(String),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UxkitError>;
