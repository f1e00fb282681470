//! Journey fetch error types.

use std::error::Error as _;
use std::fmt;

/// Errors from fetching journeys.
///
/// These are values, not panics: every failure is delivered to the render
/// callback through the same path as a successful result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Network-level failure (DNS, TCP, TLS, timeout, body read)
    #[error("transport error: {0}")]
    Transport(String),

    /// API answered with a non-200 status
    #[error("API error {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body did not match the planning response shape
    #[error("parse error: {message}")]
    Parse { message: String },
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    Http,
    Parse,
}

impl ErrorKind {
    /// Stable name used in logs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Transport => "transport_error",
            ErrorKind::Http => "http_error",
            ErrorKind::Parse => "parse_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FetchError {
    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Transport(_) => ErrorKind::Transport,
            FetchError::Http { .. } => ErrorKind::Http,
            FetchError::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// Returns the detail without the kind prefix.
    ///
    /// For HTTP errors this is `"{status}: {body}"`.
    pub fn detail(&self) -> String {
        match self {
            FetchError::Transport(message) => message.clone(),
            FetchError::Http { status, body } => format!("{status}: {body}"),
            FetchError::Parse { message } => message.clone(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        FetchError::Transport(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FetchError::Http {
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(err.to_string(), "API error 404: not found");

        let err = FetchError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "transport error: connection refused");

        let err = FetchError::Parse {
            message: "missing field `journeys`".into(),
        };
        assert!(err.to_string().contains("parse error"));
        assert!(err.to_string().contains("journeys"));
    }

    #[test]
    fn kind_and_detail() {
        let err = FetchError::Http {
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.detail(), "404: not found");

        let err = FetchError::Transport("timed out".into());
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.detail(), "timed out");

        let err = FetchError::Parse {
            message: "bad".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.kind().to_string(), "parse_error");
    }
}
