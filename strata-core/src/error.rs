use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl Error {
    /// Returns a stable error code for this error variant.
    /// These codes are stable and can be used by callers for error classification.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::InvalidOperation(_) => "INVALID_OPERATION",
            Error::InvalidQuery(_) => "INVALID_QUERY",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
