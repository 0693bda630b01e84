use crate::error::ChatError;

/// State of a single question/answer exchange.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending(String),
    Succeeded(String, String),
    Failed(String, ChatError),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Succeeded(..) | RequestState::Failed(..))
    }

    pub fn question(&self) -> Option<&str> {
        match self {
            RequestState::Idle => None,
            RequestState::Pending(q)
            | RequestState::Succeeded(q, _)
            | RequestState::Failed(q, _) => Some(q),
        }
    }

    /// User-facing reason of a failed exchange.
    pub fn reason(&self) -> Option<String> {
        match self {
            RequestState::Failed(_, err) => Some(err.to_string()),
            _ => None,
        }
    }
}
