use thiserror::Error;

pub type ForecastResult<T> = Result<T, ForecastError>;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown category `{label}` for field `{field}` (call ensure() before encode())")]
    UnknownCategory { field: String, label: String },

    #[error("Code {code} is out of range for field `{field}`")]
    UnknownCode { field: String, code: usize },

    #[error("Insufficient training data: {0}")]
    InsufficientData(String),

    #[error("Classifier has not been trained yet")]
    NotTrained,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
