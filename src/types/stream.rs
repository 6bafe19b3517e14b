//! Streaming types.

use serde::Serialize;
use strum::{Display, EnumString};

/// One incremental unit of streamed output from the completion service.
///
/// A fragment may carry no text (role preambles, finish markers); callers
/// skip those instead of appending an empty string.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Fragment {
    /// The incremental text chunk, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    /// Finish reason (only on the final fragment).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl Fragment {
    /// A fragment carrying text.
    pub fn text(delta: impl Into<String>) -> Self {
        Self {
            delta: Some(delta.into()),
            finish_reason: None,
        }
    }

    /// A fragment with no text, such as the closing chunk of a stream.
    pub fn finished(reason: FinishReason) -> Self {
        Self {
            delta: None,
            finish_reason: Some(reason),
        }
    }
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}

impl FinishReason {
    /// Parse the wire value, ignoring reasons this crate does not model.
    pub fn from_wire(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}
