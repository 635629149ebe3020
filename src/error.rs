use thiserror::Error;

#[derive(Error, Debug)]
pub enum TitleForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Invalid Input: {0}")]
    InvalidInput(String),
}

pub type TfResult<T> = Result<T, TitleForgeError>;

impl TitleForgeError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
