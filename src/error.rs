use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("Transfer failed: {0}")]
    Transfer(String),
    #[error("Transfer aborted")]
    Aborted,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrderError {
    /// Whether the network or the order service caused the error, as opposed
    /// to a local failure while preparing the upload.
    pub fn is_transfer_failure(&self) -> bool {
        matches!(self, OrderError::Transfer(_) | OrderError::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;
