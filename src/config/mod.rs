//! Process-wide configuration (code > env > `.env` file).

use std::fmt;
use std::sync::OnceLock;

use crate::error::{CompanionError, Result};

/// Global default config (lazy-initialized from env).
static DEFAULT_CONFIG: OnceLock<CompanionConfig> = OnceLock::new();

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Credential and endpoint for the completion service.
///
/// The API key is loaded once and never handed to the UI layer; `Debug`
/// output redacts it.
#[derive(Clone, Default)]
pub struct CompanionConfig {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl fmt::Debug for CompanionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompanionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CompanionConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup(API_KEY_VAR),
            base_url: lookup(BASE_URL_VAR).filter(|url| !url.trim().is_empty()),
        }
    }

    /// Get (or create) the global default config.
    pub fn global() -> &'static CompanionConfig {
        DEFAULT_CONFIG.get_or_init(Self::from_env)
    }

    /// The API key, or an authentication error naming the variable.
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .ok_or_else(|| CompanionError::Authentication(format!("Missing {API_KEY_VAR}")))
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn base_url(&self) -> Option<String> {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn from_lookup_reads_key_and_base_url() {
        let config = CompanionConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test-123"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
        ]));
        assert_eq!(config.require_api_key().unwrap(), "sk-test-123");
        assert_eq!(config.base_url().as_deref(), Some("http://localhost:8080/v1"));
    }

    #[test]
    fn missing_key_is_authentication_error() {
        let config = CompanionConfig::from_lookup(lookup_from(&[]));
        assert!(!config.has_credentials());
        match config.require_api_key() {
            Err(CompanionError::Authentication(msg)) => assert!(msg.contains("OPENAI_API_KEY")),
            other => panic!("expected Authentication, got {other:?}"),
        }
    }

    #[test]
    fn blank_base_url_is_ignored() {
        let config = CompanionConfig::from_lookup(lookup_from(&[("OPENAI_BASE_URL", "  ")]));
        assert_eq!(config.base_url(), None);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = CompanionConfig::new().with_api_key("sk-very-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
