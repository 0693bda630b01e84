use log::{ info, warn, error };
use std::sync::Arc;

use crate::endpoint::{ ChatEndpoint, EndpointResponse };
use crate::error::{ ChatError, HttpFailure };
use crate::models::chat::ChatReply;
use crate::models::state::RequestState;

/// Drives one question/answer exchange at a time against a chat endpoint.
///
/// The lifecycle never persists anything; on `Succeeded` the caller decides
/// whether the pair goes to the conversation store.
pub struct RequestLifecycle {
    endpoint: Arc<dyn ChatEndpoint>,
    state: RequestState,
}

impl RequestLifecycle {
    pub fn new(endpoint: Arc<dyn ChatEndpoint>) -> Self {
        Self {
            endpoint,
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn endpoint(&self) -> &Arc<dyn ChatEndpoint> {
        &self.endpoint
    }

    /// Validates `question` and moves to `Pending`.
    ///
    /// Returns the trimmed question when the exchange was started. Blank input
    /// and a second question while one is outstanding leave the state untouched.
    pub fn begin(&mut self, question: &str) -> Result<String, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::Validation);
        }
        if self.state.is_pending() {
            warn!("Ignoring question while another request is pending");
            return Err(ChatError::Busy);
        }
        self.state = RequestState::Pending(question.to_string());
        Ok(question.to_string())
    }

    /// Performs the exchange for the pending question and settles the state.
    /// Without a pending question the current state is returned as is.
    pub async fn resolve(&mut self) -> RequestState {
        let question = match &self.state {
            RequestState::Pending(q) => q.clone(),
            _ => return self.state.clone(),
        };

        let outcome = match self.endpoint.post_question(&question).await {
            Ok(response) => classify_response(&response),
            Err(e) => Err(e),
        };

        self.state = match outcome {
            Ok(answer) => {
                info!("Received answer ({} chars)", answer.len());
                RequestState::Succeeded(question, answer)
            }
            Err(e) => {
                if let ChatError::Transport(cause) = &e {
                    error!("Chat request to {} failed: {}", self.endpoint.describe(), cause);
                } else {
                    error!("Chat request rejected: {} (retryable: {})", e, e.is_retryable());
                }
                RequestState::Failed(question, e)
            }
        };
        self.state.clone()
    }

    pub async fn submit(&mut self, question: &str) -> RequestState {
        if self.begin(question).is_err() {
            return self.state.clone();
        }
        self.resolve().await
    }
}

/// Maps a server response onto an answer or a failure reason.
pub fn classify_response(response: &EndpointResponse) -> Result<String, ChatError> {
    if !response.is_success() {
        // Error bodies are best effort; an unreadable one just loses the detail.
        let detail = serde_json::from_str::<ChatReply>(&response.body)
            .ok()
            .and_then(|reply| reply.failure_message().map(str::to_string));
        return Err(ChatError::Http(HttpFailure::from_status(response.status, detail)));
    }

    let reply: ChatReply = serde_json::from_str(&response.body)
        .map_err(|e| ChatError::Transport(format!("malformed response body: {}", e)))?;

    match reply.answer.filter(|a| !a.is_empty()) {
        Some(answer) => Ok(answer),
        None => match reply.error.filter(|e| !e.trim().is_empty()) {
            Some(server_error) => Err(ChatError::Server(server_error)),
            None => Err(ChatError::Protocol),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedEndpoint {
        reply: Result<EndpointResponse, ChatError>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedEndpoint {
        fn new(reply: Result<EndpointResponse, ChatError>) -> Arc<Self> {
            Arc::new(Self { reply, calls: Mutex::new(Vec::new()) })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatEndpoint for ScriptedEndpoint {
        async fn post_question(&self, question: &str) -> Result<EndpointResponse, ChatError> {
            self.calls.lock().unwrap().push(question.to_string());
            self.reply.clone()
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    #[tokio::test]
    async fn blank_question_is_a_no_op() {
        let endpoint = ScriptedEndpoint::new(Ok(EndpointResponse::new(200, r#"{"answer":"X"}"#)));
        let mut lifecycle = RequestLifecycle::new(endpoint.clone());

        assert_eq!(lifecycle.begin(" "), Err(ChatError::Validation));
        assert_eq!(lifecycle.submit("").await, RequestState::Idle);
        assert_eq!(lifecycle.submit("   \t\n").await, RequestState::Idle);
        assert_eq!(lifecycle.state(), &RequestState::Idle);
        assert!(endpoint.calls().is_empty());
    }

    #[tokio::test]
    async fn answer_resolves_to_succeeded() {
        let endpoint = ScriptedEndpoint::new(Ok(EndpointResponse::new(200, r#"{"answer":"X"}"#)));
        let mut lifecycle = RequestLifecycle::new(endpoint.clone());

        let state = lifecycle.submit("  Q ").await;
        assert_eq!(state, RequestState::Succeeded("Q".into(), "X".into()));
        assert_eq!(endpoint.calls(), vec!["Q".to_string()]);
    }

    #[tokio::test]
    async fn begin_enters_pending_and_refuses_overlap() {
        let endpoint = ScriptedEndpoint::new(Ok(EndpointResponse::new(200, r#"{"answer":"X"}"#)));
        let mut lifecycle = RequestLifecycle::new(endpoint.clone());

        assert_eq!(lifecycle.begin("first"), Ok("first".to_string()));
        assert_eq!(lifecycle.state(), &RequestState::Pending("first".into()));
        assert_eq!(lifecycle.begin("second"), Err(ChatError::Busy));
        assert_eq!(lifecycle.state(), &RequestState::Pending("first".into()));

        let state = lifecycle.resolve().await;
        assert_eq!(state, RequestState::Succeeded("first".into(), "X".into()));
        assert_eq!(endpoint.calls().len(), 1);
    }

    #[tokio::test]
    async fn resolve_without_pending_does_nothing() {
        let endpoint = ScriptedEndpoint::new(Ok(EndpointResponse::new(200, r#"{"answer":"X"}"#)));
        let mut lifecycle = RequestLifecycle::new(endpoint.clone());

        assert_eq!(lifecycle.resolve().await, RequestState::Idle);
        assert!(endpoint.calls().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_becomes_failed() {
        let endpoint = ScriptedEndpoint::new(Err(ChatError::Transport("connection refused".into())));
        let mut lifecycle = RequestLifecycle::new(endpoint);

        let state = lifecycle.submit("Q").await;
        assert!(matches!(&state, RequestState::Failed(q, ChatError::Transport(_)) if q == "Q"));
        assert_eq!(state.reason().as_deref(), Some("request failed, retry later"));
    }

    #[tokio::test]
    async fn lifecycle_accepts_a_new_question_after_failure() {
        let endpoint = ScriptedEndpoint::new(Ok(EndpointResponse::new(503, "")));
        let mut lifecycle = RequestLifecycle::new(endpoint);

        assert!(lifecycle.submit("one").await.is_terminal());
        assert!(lifecycle.begin("two").is_ok());
    }

    #[test]
    fn unauthorized_is_classified() {
        let err = classify_response(&EndpointResponse::new(401, r#"{"detail":"Invalid API key"}"#)).unwrap_err();
        assert_eq!(err, ChatError::Http(HttpFailure::Unauthorized));
        assert_eq!(err.to_string(), "invalid credentials");
    }

    #[test]
    fn other_status_uses_detail_or_generic_reason() {
        let err = classify_response(&EndpointResponse::new(500, r#"{"detail":"vector store offline"}"#)).unwrap_err();
        assert_eq!(err.to_string(), "vector store offline");

        let err = classify_response(&EndpointResponse::new(502, "<html>bad gateway</html>")).unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 502");

        let err = classify_response(&EndpointResponse::new(400, r#"{"error":"question too long"}"#)).unwrap_err();
        assert_eq!(err.to_string(), "question too long");
    }

    #[test]
    fn success_without_answer_is_protocol_error() {
        assert_eq!(
            classify_response(&EndpointResponse::new(200, r#"{"result":"X"}"#)),
            Err(ChatError::Protocol)
        );
        assert_eq!(
            classify_response(&EndpointResponse::new(200, r#"{"answer":""}"#)),
            Err(ChatError::Protocol)
        );
    }

    #[test]
    fn success_with_error_field_reports_server_message() {
        assert_eq!(
            classify_response(&EndpointResponse::new(200, r#"{"error":"index not built"}"#)),
            Err(ChatError::Server("index not built".into()))
        );
    }

    #[test]
    fn malformed_success_body_is_transport_failure() {
        let err = classify_response(&EndpointResponse::new(200, "{not json")).unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
    }

    #[test]
    fn non_string_answer_is_transport_failure() {
        let err = classify_response(&EndpointResponse::new(200, r#"{"answer":42}"#)).unwrap_err();
        assert!(matches!(err, ChatError::Transport(_)));
        assert_eq!(err.to_string(), "request failed, retry later");
    }
}
