//! Terminal front end for companion.

pub mod commands;
pub mod errors;
pub mod repl;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::models::ChatModel;
use crate::settings::{Settings, SettingsDraft};

const DEFAULT_LOG_DIRECTIVE: &str = "companion=warn";

/// Chat with a hosted model from the terminal
#[derive(Parser, Debug)]
#[command(name = "companion", version, about = "Chat with a hosted model from the terminal")]
pub struct Cli {
    /// Model to use (gpt-4o-mini, gpt-4o, o3-mini, o1)
    #[arg(short, long)]
    pub model: Option<ChatModel>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Max tokens (100 - 4000)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Disable streaming output
    #[arg(long)]
    pub no_stream: bool,

    /// Directory that `/save` writes transcripts into
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply command-line overrides to a draft of `base`.
    pub fn settings_draft(&self, base: &Settings) -> SettingsDraft {
        let mut draft = base.draft();
        if let Some(model) = self.model {
            draft = draft.model(model);
        }
        if let Some(ref system) = self.system {
            draft = draft.system_prompt(system.clone());
        }
        if let Some(t) = self.temperature {
            draft = draft.temperature(t);
        }
        if let Some(max) = self.max_tokens {
            draft = draft.max_tokens(max);
        }
        if self.no_stream {
            draft = draft.stream(false);
        }
        draft
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--log-level`.
pub fn init_tracing(log_level: Option<&str>) {
    let fallback = log_level.unwrap_or(DEFAULT_LOG_DIRECTIVE);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(fallback).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
