//! CLI-specific error formatting for user-facing messages.

use crate::config::API_KEY_VAR;
use crate::error::CompanionError;

/// Map a [`CompanionError`] to a user-facing help string with actionable guidance.
pub fn format_error_help(err: &CompanionError) -> String {
    match err {
        CompanionError::Authentication(msg) => {
            format!("Authentication failed: {msg}. Set {API_KEY_VAR} in your environment or .env file")
        }
        CompanionError::Configuration(msg) => {
            format!("Configuration error: {msg}. Check your .env file")
        }
        CompanionError::Validation { .. } => {
            format!("{err}. Run /settings to see the current values")
        }
        other => format!("{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_error_names_key_variable() {
        let err = CompanionError::Authentication("Missing OPENAI_API_KEY".into());
        let help = format_error_help(&err);
        assert!(help.contains("OPENAI_API_KEY in your environment"));
    }

    #[test]
    fn validation_error_points_at_settings() {
        let err = CompanionError::validation("max_tokens", "5000 is outside 100..=4000");
        let help = format_error_help(&err);
        assert!(help.starts_with("Invalid max_tokens"));
        assert!(help.contains("/settings"));
    }

    #[test]
    fn other_error_falls_through_to_display() {
        let err = CompanionError::api(500, "boom");
        assert_eq!(format_error_help(&err), "API error (status 500): boom");
    }
}
