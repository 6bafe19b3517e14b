//! OpenAI model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Chat models offered on the settings surface.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
)]
pub enum ChatModel {
    #[strum(serialize = "gpt-4o-mini")]
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
    #[strum(serialize = "gpt-4o")]
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[strum(serialize = "o3-mini")]
    #[serde(rename = "o3-mini")]
    O3Mini,
    #[strum(serialize = "o1")]
    #[serde(rename = "o1")]
    O1,
}

impl ChatModel {
    /// Get the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4o => "gpt-4o",
            Self::O3Mini => "o3-mini",
            Self::O1 => "o1",
        }
    }

    /// Whether this is a reasoning model.
    ///
    /// Reasoning models take `max_completion_tokens` and reject sampling
    /// parameters such as `temperature`.
    pub fn is_reasoning(&self) -> bool {
        matches!(self, Self::O3Mini | Self::O1)
    }

    /// One-line description shown next to the model picker.
    pub fn blurb(&self) -> &'static str {
        match self {
            Self::Gpt4oMini => "faster and more cost-effective",
            Self::Gpt4o => "more capable but slower and more expensive",
            Self::O3Mini => "lightweight thinking model",
            Self::O1 => "large scale thinking model",
        }
    }
}
