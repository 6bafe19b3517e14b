//! Per-session chat settings and the draft used to edit them.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::{CompanionError, Result};
use crate::models::ChatModel;

pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=2.0;
pub const MAX_TOKENS_RANGE: RangeInclusive<u32> = 100..=4000;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, AI assistant.";

/// Committed settings for one session.
///
/// A [`crate::session::SessionStore`] only takes settings through
/// [`SettingsDraft::validate`], so the values it holds always satisfy the
/// declared bounds. A hand-built `Settings` cannot be put into a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub model: ChatModel,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
    pub system_prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: ChatModel::O3Mini,
            temperature: 0.7,
            max_tokens: 1000,
            stream: true,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Settings {
    /// Start a provisional edit of these settings.
    pub fn draft(&self) -> SettingsDraft {
        SettingsDraft::from(self)
    }
}

/// Unsaved edits to [`Settings`].
///
/// Nothing here affects requests until the draft is committed with
/// [`crate::session::SessionStore::save_settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDraft {
    pub model: ChatModel,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
    pub system_prompt: String,
}

impl From<&Settings> for SettingsDraft {
    fn from(settings: &Settings) -> Self {
        Self {
            model: settings.model,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            stream: settings.stream,
            system_prompt: settings.system_prompt.clone(),
        }
    }
}

impl SettingsDraft {
    pub fn model(mut self, model: ChatModel) -> Self {
        self.model = model;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set a field from its textual form, as typed on a settings surface.
    ///
    /// Only parses; bounds are checked when the draft is validated.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match field {
            "model" => {
                self.model = value.parse().map_err(|_| {
                    CompanionError::validation("model", format!("unknown model '{value}'"))
                })?;
            }
            "temperature" => {
                self.temperature = value.parse().map_err(|_| {
                    CompanionError::validation("temperature", format!("'{value}' is not a number"))
                })?;
            }
            "max_tokens" => {
                self.max_tokens = value.parse().map_err(|_| {
                    CompanionError::validation(
                        "max_tokens",
                        format!("'{value}' is not a whole number"),
                    )
                })?;
            }
            "stream" => {
                self.stream = parse_flag(value).ok_or_else(|| {
                    CompanionError::validation("stream", format!("'{value}' is not on/off"))
                })?;
            }
            "system_prompt" => self.system_prompt = value.to_string(),
            other => {
                return Err(CompanionError::validation(
                    "field",
                    format!("unknown setting '{other}'"),
                ))
            }
        }
        Ok(())
    }

    /// Check bounds and turn the draft into committed settings.
    pub fn validate(self) -> Result<Settings> {
        if !TEMPERATURE_RANGE.contains(&self.temperature) {
            return Err(CompanionError::validation(
                "temperature",
                format!(
                    "{} is outside {:.1}..={:.1}",
                    self.temperature,
                    TEMPERATURE_RANGE.start(),
                    TEMPERATURE_RANGE.end()
                ),
            ));
        }
        if !MAX_TOKENS_RANGE.contains(&self.max_tokens) {
            return Err(CompanionError::validation(
                "max_tokens",
                format!(
                    "{} is outside {}..={}",
                    self.max_tokens,
                    MAX_TOKENS_RANGE.start(),
                    MAX_TOKENS_RANGE.end()
                ),
            ));
        }
        Ok(Settings {
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: self.stream,
            system_prompt: self.system_prompt,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
