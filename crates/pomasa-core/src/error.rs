use thiserror::Error;

#[derive(Debug, Error)]
pub enum PomasaError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid project name '{0}': must be a single path component")]
    InvalidName(String),

    #[error("directory already exists: {0}")]
    AlreadyExists(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("unreadable: {0}")]
    Unreadable(String),

    #[error("pattern catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("generator instructions unavailable: {0}")]
    InstructionsUnavailable(String),

    #[error("pattern not found: {0}")]
    PatternNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PomasaError>;
