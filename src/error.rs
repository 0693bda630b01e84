use std::fmt;
use thiserror::Error;

/// Status-specific failures of the chat endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpFailure {
    Unauthorized,
    RateLimited,
    Unavailable,
    Other { status: u16, detail: Option<String> },
}

impl fmt::Display for HttpFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpFailure::Unauthorized => write!(f, "invalid credentials"),
            HttpFailure::RateLimited => write!(f, "too many requests, retry later"),
            HttpFailure::Unavailable => write!(f, "temporarily unavailable, retry later"),
            HttpFailure::Other { detail: Some(detail), .. } => write!(f, "{}", detail),
            HttpFailure::Other { status, detail: None } => write!(f, "HTTP error! status: {}", status),
        }
    }
}

impl HttpFailure {
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            401 => HttpFailure::Unauthorized,
            429 => HttpFailure::RateLimited,
            503 => HttpFailure::Unavailable,
            _ => HttpFailure::Other { status, detail },
        }
    }
}

/// Every way a single exchange can fail. The `Display` text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("question is empty")]
    Validation,
    #[error("a request is already pending")]
    Busy,
    /// Unreachable backend, timeout or an unreadable body. The inner text is for logs only.
    #[error("request failed, retry later")]
    Transport(String),
    #[error(transparent)]
    Http(#[from] HttpFailure),
    #[error("no answer received")]
    Protocol,
    #[error("{0}")]
    Server(String),
}

impl ChatError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChatError::Transport(_)
                | ChatError::Http(HttpFailure::RateLimited)
                | ChatError::Http(HttpFailure::Unavailable)
        )
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_reasons() {
        assert_eq!(ChatError::from(HttpFailure::from_status(401, None)).to_string(), "invalid credentials");
        assert_eq!(
            ChatError::from(HttpFailure::from_status(429, Some("ignored".into()))).to_string(),
            "too many requests, retry later"
        );
        assert_eq!(
            ChatError::from(HttpFailure::from_status(503, None)).to_string(),
            "temporarily unavailable, retry later"
        );
    }

    #[test]
    fn other_status_prefers_server_detail() {
        let with_detail = HttpFailure::from_status(500, Some("index missing".into()));
        assert_eq!(with_detail.to_string(), "index missing");

        let bare = HttpFailure::from_status(418, None);
        assert_eq!(bare.to_string(), "HTTP error! status: 418");
    }

    #[test]
    fn transport_hides_cause_from_user() {
        let err = ChatError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "request failed, retry later");
        assert!(err.is_retryable());
        assert!(!ChatError::Protocol.is_retryable());
    }
}
