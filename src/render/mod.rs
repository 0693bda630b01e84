use std::fmt;

use crate::models::chat::ConversationEntry;
use crate::models::state::RequestState;

pub const PENDING_TEXT: &str = "AI is thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
    /// Transient "working" row shown while a request is outstanding.
    Indicator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub sender: Sender,
    pub text: String,
}

impl DisplayRow {
    pub fn user(text: impl Into<String>) -> Self {
        Self { sender: Sender::User, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { sender: Sender::Assistant, text: text.into() }
    }

    pub fn indicator() -> Self {
        Self { sender: Sender::Indicator, text: PENDING_TEXT.to_string() }
    }

    pub fn is_indicator(&self) -> bool {
        self.sender == Sender::Indicator
    }
}

impl fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sender {
            Sender::User => write!(f, "You: {}", self.text),
            Sender::Assistant => write!(f, "AI: {}", self.text),
            Sender::Indicator => write!(f, "... {}", self.text),
        }
    }
}

pub fn render_log(log: &[ConversationEntry]) -> Vec<DisplayRow> {
    log.iter()
        .flat_map(|entry| [DisplayRow::user(&entry.question), DisplayRow::assistant(&entry.answer)])
        .collect()
}

/// Visible log after a reload: the greeting followed by every persisted pair.
pub fn render_transcript(greeting: &str, log: &[ConversationEntry]) -> Vec<DisplayRow> {
    let mut rows = vec![DisplayRow::assistant(greeting)];
    rows.extend(render_log(log));
    rows
}

/// Rows the assistant side contributes for a given state. Idle contributes nothing.
pub fn render_outcome(state: &RequestState) -> Option<DisplayRow> {
    match state {
        RequestState::Idle => None,
        RequestState::Pending(_) => Some(DisplayRow::indicator()),
        RequestState::Succeeded(_, answer) => Some(DisplayRow::assistant(answer)),
        RequestState::Failed(_, err) => Some(DisplayRow::assistant(format!("Error: {}", err))),
    }
}

/// Full rendering of an exchange: the question row plus its outcome row.
pub fn render_state(state: &RequestState) -> Vec<DisplayRow> {
    let mut rows = Vec::new();
    if let Some(question) = state.question() {
        rows.push(DisplayRow::user(question));
    }
    rows.extend(render_outcome(state));
    rows
}
