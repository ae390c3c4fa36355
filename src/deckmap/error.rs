use thiserror::Error;

use crate::commands::import::ImportError;
use crate::remote::RemoteError;

#[derive(Error, Debug)]
pub enum DeckmapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Launch error: {0}")]
    Launch(String),
}

impl DeckmapError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeckmapError>;
