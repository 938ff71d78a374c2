/// Error types for the StrataDB client
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Validation failure detected before any network call.
    #[error(transparent)]
    Core(#[from] strata_core::Error),

    /// Network or HTTP-level failure from the transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be parsed into the expected schema.
    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Returns a stable error code for this error variant.
    /// These codes are stable and can be used by callers for error classification.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Core(e) => e.code(),
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
        }
    }

    /// Returns true if this error is potentially retryable.
    ///
    /// Transport failures are transient and never mutate transaction state,
    /// so the same handle can be retried. Validation and decode errors are
    /// permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<prost::DecodeError> for ClientError {
    fn from(err: prost::DecodeError) -> Self {
        ClientError::Decode(err.to_string())
    }
}
