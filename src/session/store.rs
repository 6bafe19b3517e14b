//! Conversation, transcript and settings for one interactive session.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CompanionError, Result};
use crate::settings::{Settings, SettingsDraft};
use crate::types::Message;

/// Identifier of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// State of a single session.
///
/// The conversation is what gets sent to the model; the transcript holds the
/// same entries and is only used for export. Both grow by append and are
/// cleared together. There is no internal locking: every mutation takes
/// `&mut self`, so one session is driven by one control flow at a time.
#[derive(Debug, Clone)]
pub struct SessionStore {
    id: SessionId,
    conversation: Vec<Message>,
    transcript: Vec<Message>,
    settings: Settings,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::from_valid(Settings::default())
    }

    /// Create a store whose initial settings come from `draft`.
    ///
    /// Fails with a validation error when the draft is out of bounds.
    pub fn with_settings(draft: SettingsDraft) -> Result<Self> {
        Ok(Self::from_valid(draft.validate()?))
    }

    fn from_valid(settings: Settings) -> Self {
        Self {
            id: SessionId::new(),
            conversation: Vec::new(),
            transcript: Vec::new(),
            settings,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Append a message to both the conversation and the transcript.
    pub fn append(&mut self, message: Message) -> Result<()> {
        if message.content().is_empty() {
            return Err(CompanionError::EmptyMessage);
        }
        debug!(session = %self.id, role = %message.role(), "append message");
        self.transcript.push(message.clone());
        self.conversation.push(message);
        Ok(())
    }

    /// Clear the conversation and the transcript. Settings are kept.
    pub fn reset(&mut self) {
        info!(session = %self.id, cleared = self.conversation.len(), "reset conversation");
        self.conversation.clear();
        self.transcript.clear();
    }

    /// Clear everything, including settings.
    pub fn full_reset(&mut self) {
        self.reset();
        self.settings = Settings::default();
        info!(session = %self.id, "settings restored to defaults");
    }

    pub fn conversation(&self) -> &[Message] {
        &self.conversation
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start editing a copy of the current settings.
    pub fn draft_settings(&self) -> SettingsDraft {
        self.settings.draft()
    }

    /// Validate `draft` and commit it.
    ///
    /// On error the previous settings stay in place.
    pub fn save_settings(&mut self, draft: SettingsDraft) -> Result<&Settings> {
        let settings = draft.validate()?;
        info!(
            session = %self.id,
            model = %settings.model,
            temperature = settings.temperature,
            max_tokens = settings.max_tokens,
            stream = settings.stream,
            "settings saved"
        );
        self.settings = settings;
        Ok(&self.settings)
    }
}
