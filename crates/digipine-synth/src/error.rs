use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unknown product '{0}'")]
    UnknownProduct(String),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("invariant violated: {0}")]
    Invariant(String),
}

pub type SynthResult<T> = Result<T, SynthError>;
