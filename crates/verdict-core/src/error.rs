use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerdictError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Feature order mismatch: {0}")]
    FeatureOrderMismatch(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),
}

pub type DealResult<T> = Result<T, VerdictError>;
