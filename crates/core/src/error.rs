use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefguardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for RefguardError {
    fn from(e: serde_json::Error) -> Self {
        RefguardError::Serialize(e.to_string())
    }
}
