//! Error types for API access.

use sole_cache::CacheError;
use sole_commerce::checkout::PrepareError;
use thiserror::Error;

/// Error type for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {path}: {message}")]
    Http {
        status: u16,
        path: String,
        message: String,
    },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Deserialization(e.to_string())
    }
}

/// Why a catalog or listing load failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No token stored, or the server rejected it.
    #[error("not authenticated")]
    Unauthenticated,

    /// The body was JSON but lacked the expected fields.
    #[error("unexpected response shape: {0}")]
    InvalidResponseShape(String),

    /// Transport failure or non-2xx status after all attempts.
    #[error("network or server error: {0}")]
    NetworkOrServerError(#[source] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl LoadError {
    /// Only network and server failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkOrServerError(_))
    }
}

impl From<FetchError> for LoadError {
    fn from(e: FetchError) -> Self {
        if e.is_unauthorized() {
            LoadError::Unauthenticated
        } else {
            LoadError::NetworkOrServerError(e)
        }
    }
}

/// Why a sale was not recorded.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("not authenticated")]
    Unauthenticated,

    /// The sale failed local checks; nothing was sent.
    #[error(transparent)]
    Validation(#[from] PrepareError),

    /// The server refused the transaction.
    #[error("submission failed: {message}")]
    SubmissionFailed { message: String },

    /// The request never got an answer.
    #[error("transport error: {0}")]
    Transport(#[source] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl From<FetchError> for SubmitError {
    fn from(e: FetchError) -> Self {
        match e {
            e if e.is_unauthorized() => SubmitError::Unauthenticated,
            FetchError::Http { message, .. } => SubmitError::SubmissionFailed { message },
            other => SubmitError::Transport(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> FetchError {
        FetchError::Http {
            status,
            path: "/api/products".into(),
            message: "nope".into(),
        }
    }

    #[test]
    fn test_unauthorized_maps_to_unauthenticated() {
        assert!(matches!(LoadError::from(http(401)), LoadError::Unauthenticated));
        assert!(matches!(SubmitError::from(http(401)), SubmitError::Unauthenticated));
    }

    #[test]
    fn test_only_network_errors_retry() {
        assert!(LoadError::from(http(500)).is_retryable());
        assert!(LoadError::from(FetchError::Connection("refused".into())).is_retryable());
        assert!(!LoadError::from(http(401)).is_retryable());
        assert!(!LoadError::InvalidResponseShape("data.products".into()).is_retryable());
    }

    #[test]
    fn test_http_rejection_carries_server_message() {
        match SubmitError::from(http(422)) {
            SubmitError::SubmissionFailed { message } => assert_eq!(message, "nope"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            SubmitError::from(FetchError::Timeout("30s".into())),
            SubmitError::Transport(_)
        ));
    }
}
