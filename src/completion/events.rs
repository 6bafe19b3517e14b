//! Events and outcomes of one conversational turn.

use crate::error::CompanionError;

/// Assistant message recorded when a turn fails.
pub const FALLBACK_MESSAGE: &str = "I apologize, but I encountered an error. Please try again.";

/// Where a turn is in its lifecycle.
///
/// `Idle → AwaitingResponse → {Streaming → Completed | Failed}`. Idle is the
/// state between turns; non-streaming turns skip `Streaming`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingResponse,
    Streaming,
    Completed,
    Failed,
}

/// Emitted while a turn runs. The last event is always `Completed` or
/// `Failed`.
#[derive(Debug)]
pub enum TurnEvent {
    /// The request has been issued.
    Started,
    /// The running buffer after a fragment with text arrived.
    Partial { text: String },
    /// The final text, already appended as the assistant message.
    Completed { text: String },
    /// The turn failed; `fallback` was appended instead of any partial text.
    Failed {
        error: CompanionError,
        fallback: String,
    },
}

impl TurnEvent {
    /// The turn state this event moves into.
    pub fn state(&self) -> TurnState {
        match self {
            Self::Started => TurnState::AwaitingResponse,
            Self::Partial { .. } => TurnState::Streaming,
            Self::Completed { .. } => TurnState::Completed,
            Self::Failed { .. } => TurnState::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

/// How a driven turn ended.
#[derive(Debug)]
pub enum TurnOutcome {
    Completed(String),
    Failed {
        error: CompanionError,
        fallback: String,
    },
}

impl TurnOutcome {
    /// The text that was recorded as the assistant message.
    pub fn text(&self) -> &str {
        match self {
            Self::Completed(text) => text,
            Self::Failed { fallback, .. } => fallback,
        }
    }

    /// The error to show inline, if the turn failed.
    pub fn error(&self) -> Option<&CompanionError> {
        match self {
            Self::Completed(_) => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}
