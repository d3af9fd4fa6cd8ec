use gstbill_core::DomainError;
use thiserror::Error;

pub const MSG_UNEXPECTED: &str = "An unexpected error occurred";
pub const MSG_NOT_FOUND: &str = "Resource not found";
pub const MSG_VALIDATION: &str = "Validation error. Please check your input.";
pub const MSG_SERVER: &str = "Server error. Please try again later.";
pub const MSG_NETWORK: &str = "Unable to connect to server. Please check your connection.";

/// The backend answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    /// User-facing message: the backend's `detail` when it sent one,
    /// otherwise a generic message for the status.
    pub message: String,
    /// The backend's own `detail` text, if any.
    pub detail: Option<String>,
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Api(ApiError),

    /// No response at all (connect failure, timeout, aborted request).
    #[error("Unable to connect to server. Please check your connection.")]
    Network(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("session storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("No refresh token available")]
    NoRefreshToken,
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Backend-provided detail, when the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Api(e) => e.detail.as_deref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(value: std::io::Error) -> Self {
        ClientError::Storage(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_user_facing_message() {
        let err = ClientError::Api(ApiError {
            status: 422,
            message: MSG_VALIDATION.into(),
            detail: None,
        });
        assert_eq!(err.to_string(), MSG_VALIDATION);
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_not_found());

        let err = ClientError::Network("connection refused".into());
        assert_eq!(err.to_string(), MSG_NETWORK);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn domain_errors_pass_through() {
        let err: ClientError = DomainError::conflict("invoice INV-1 is already finalized").into();
        assert_eq!(err.to_string(), "conflict: invoice INV-1 is already finalized");
    }
}
