pub mod http;

use async_trait::async_trait;
use crate::error::ChatError;
use crate::models::chat::HealthStatus;

pub use self::http::HttpChatEndpoint;

/// Raw outcome of a chat request that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    pub status: u16,
    pub body: String,
}

impl EndpointResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The backend route that turns a question into an answer.
///
/// Implementations only report transport problems as errors. Any response the
/// server produced, whatever its status, comes back as an `EndpointResponse`
/// and is classified by the request lifecycle.
#[async_trait]
pub trait ChatEndpoint: Send + Sync {
    async fn post_question(&self, question: &str) -> Result<EndpointResponse, ChatError>;

    /// Probes the backend's health route.
    async fn health(&self) -> Result<HealthStatus, ChatError> {
        Err(ChatError::Transport(format!("{} has no health route", self.describe())))
    }

    fn describe(&self) -> String;
}
