//! companion binary entry point.

use std::sync::Arc;

use companion::cli::errors::format_error_help;
use companion::cli::repl::Repl;
use companion::cli::{init_tracing, Cli};
use companion::completion::CompletionLoop;
use companion::config::CompanionConfig;
use companion::error::CompanionError;
use companion::session::SessionStore;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.log_level.as_deref());

    tracing::info!("companion v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", format_error_help(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CompanionError> {
    // A missing credential is fatal here, before any session exists.
    let service = companion::provider::create_service(CompanionConfig::global())?;
    let chat = CompletionLoop::new(Arc::from(service));

    let mut store = SessionStore::new();
    let draft = cli.settings_draft(store.settings());
    store.save_settings(draft)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut repl = Repl::new(&chat, &mut store, cli.export_dir, std::io::stdout());
    repl.run(stdin).await
}
