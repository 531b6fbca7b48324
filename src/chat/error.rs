// Error taxonomy for the request layer
//
// Classification drives the retry policy: network failures and a fixed set
// of HTTP statuses are retryable; everything else is terminal and must be
// surfaced immediately. Cancellation is its own terminal condition and is
// never mistaken for a service failure.

use thiserror::Error;

use crate::config::constants::RETRYABLE_STATUS;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The endpoint could not be reached (DNS, connect, timeout, broken
    /// transfer). Always retryable.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx HTTP status. Retryable only for the configured status set.
    #[error("chat API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Error envelope reported in the response payload. Authoritative even
    /// on a 200 status. Terminal.
    #[error("chat API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
    },

    /// Response body that does not carry usable content (unparseable JSON,
    /// no choices, empty message). Terminal.
    #[error("malformed chat response: {0}")]
    Malformed(String),

    /// The session's cancellation token was observed set. Terminal, never
    /// retried.
    #[error("session cancelled")]
    Cancelled,
}

impl ChatError {
    /// Whether the request layer may try again after backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Network(_) => true,
            ChatError::Status { status, .. } => RETRYABLE_STATUS.contains(status),
            ChatError::Api { .. } | ChatError::Malformed(_) | ChatError::Cancelled => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        for status in [429, 502, 503, 504] {
            let err = ChatError::Status {
                status,
                body: String::new(),
            };
            assert!(err.is_retryable(), "status {status} should be retryable");
        }
    }

    #[test]
    fn test_terminal_statuses() {
        for status in [400, 401, 403, 404, 500] {
            let err = ChatError::Status {
                status,
                body: String::new(),
            };
            assert!(!err.is_retryable(), "status {status} should be terminal");
        }
    }

    #[test]
    fn test_api_envelope_is_terminal() {
        let err = ChatError::Api {
            message: "quota exceeded".to_string(),
            code: Some("insufficient_quota".to_string()),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(!ChatError::Cancelled.is_retryable());
    }

    #[test]
    fn test_malformed_is_terminal() {
        assert!(!ChatError::Malformed("no choices".to_string()).is_retryable());
    }
}
