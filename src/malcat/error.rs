use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The request never produced a usable response (connection refused, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response arrived but its body was not the JSON we expected.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The backend answered with a non-success status and an `{error}` body.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    /// True for failures where no application-level answer was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Transport(_) | CatalogError::Decode(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
