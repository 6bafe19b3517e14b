//! Convenience re-exports for common use.

pub use crate::completion::{CompletionLoop, TurnEvent, TurnOutcome, TurnState, FALLBACK_MESSAGE};
pub use crate::config::CompanionConfig;
pub use crate::error::{CompanionError, ErrorCategory, Result};
pub use crate::models::ChatModel;
pub use crate::provider::{Completion, CompletionRequest, CompletionService};
pub use crate::session::{SessionId, SessionRegistry, SessionStore};
pub use crate::settings::{Settings, SettingsDraft};
pub use crate::types::{FinishReason, Fragment, Message, Role};
