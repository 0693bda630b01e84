use log::{ debug, info, warn, error };

use crate::history::{ ConversationStore, StorageError };
use crate::lifecycle::RequestLifecycle;
use crate::models::state::RequestState;
use crate::render::{ self, DisplayRow };

/// Owns everything one chat tab needs: the request lifecycle, the conversation
/// store, the visible log and the state of the send control.
pub struct ChatSession {
    lifecycle: RequestLifecycle,
    store: ConversationStore,
    transcript: Vec<DisplayRow>,
    greeting: String,
    send_enabled: bool,
}

impl ChatSession {
    pub fn new(lifecycle: RequestLifecycle, store: ConversationStore, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            lifecycle,
            store,
            transcript: vec![DisplayRow::assistant(&greeting)],
            greeting,
            send_enabled: true,
        }
    }

    pub fn transcript(&self) -> &[DisplayRow] {
        &self.transcript
    }

    pub fn state(&self) -> &RequestState {
        self.lifecycle.state()
    }

    pub fn is_send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub fn lifecycle(&self) -> &RequestLifecycle {
        &self.lifecycle
    }

    /// Repopulates the visible log from the persisted conversation.
    pub fn restore(&mut self) -> &[DisplayRow] {
        let entries = self.store.load();
        self.transcript = render::render_transcript(&self.greeting, &entries);
        &self.transcript
    }

    /// Rows of the persisted conversation, without the greeting.
    pub fn history_rows(&mut self) -> Vec<DisplayRow> {
        render::render_log(&self.store.load())
    }

    /// Starts an exchange. Returns the rows to show while it is pending, or
    /// `None` when the question was ignored.
    pub fn start(&mut self, question: &str) -> Option<Vec<DisplayRow>> {
        if !self.send_enabled {
            warn!("Send is disabled while a request is pending");
            return None;
        }
        if let Err(e) = self.lifecycle.begin(question) {
            debug!("Question not sent: {}", e);
            return None;
        }
        self.send_enabled = false;

        let rows = render::render_state(self.lifecycle.state());
        self.transcript.extend(rows.iter().cloned());
        Some(rows)
    }

    /// Settles the pending exchange and returns the row that replaced the indicator.
    pub async fn finish(&mut self) -> Option<DisplayRow> {
        if !self.lifecycle.state().is_pending() {
            self.send_enabled = true;
            return None;
        }
        let state = self.lifecycle.resolve().await;

        self.transcript.retain(|row| !row.is_indicator());
        let outcome = render::render_outcome(&state);
        if let Some(row) = &outcome {
            self.transcript.push(row.clone());
        }

        if let RequestState::Succeeded(question, answer) = &state {
            if let Err(e) = self.store.append(question, answer) {
                error!("Failed to save chat history: {}", e);
            }
        }

        self.send_enabled = true;
        outcome
    }

    pub async fn send(&mut self, question: &str) -> RequestState {
        if self.start(question).is_none() {
            return self.lifecycle.state().clone();
        }
        self.finish().await;
        self.lifecycle.state().clone()
    }

    /// Clears the conversation after `confirm` agrees and resets the visible
    /// log to the greeting alone.
    pub fn clear_history<F>(&mut self, confirm: F) -> Result<bool, StorageError>
        where F: FnOnce() -> bool
    {
        match self.store.clear(confirm) {
            Ok(false) => {
                info!("Clearing chat history cancelled");
                Ok(false)
            }
            Ok(true) => {
                self.reset_transcript();
                Ok(true)
            }
            Err(e) => {
                error!("Failed to remove persisted chat history: {}", e);
                self.reset_transcript();
                Err(e)
            }
        }
    }

    fn reset_transcript(&mut self) {
        self.transcript = vec![DisplayRow::assistant(&self.greeting)];
    }
}
