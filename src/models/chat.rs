use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };

/// One persisted question/answer pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub question: String,
    pub answer: String,
    pub timestamp: String,
}

impl ConversationEntry {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: answer.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

#[derive(Serialize, Debug)]
pub struct ChatRequest<'a> {
    pub question: &'a str,
}

/// Body of a chat endpoint response. Every field is optional because the same
/// shape carries answers and failures.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ChatReply {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    /// Server supplied failure message, `detail` first.
    pub fn failure_message(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}
