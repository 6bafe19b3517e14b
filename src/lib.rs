//! companion — a small conversational front-end for hosted chat models.
//!
//! A [`session::SessionStore`] holds one session's conversation, export
//! transcript and settings. A [`completion::CompletionLoop`] sends the
//! conversation to a [`provider::CompletionService`] and records the answer,
//! streaming it incrementally when the session asks for it.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use companion::prelude::*;
//!
//! # async fn example() -> companion::error::Result<()> {
//! let service = companion::provider::create_service(CompanionConfig::global())?;
//! let chat = CompletionLoop::new(Arc::from(service));
//! let mut session = SessionStore::new();
//!
//! let outcome = chat
//!     .submit(&mut session, "Hello!", |partial| print!("\r{partial}"))
//!     .await?;
//! println!("\n{}", outcome.text());
//! # Ok(())
//! # }
//! ```

pub mod completion;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod session;
pub mod settings;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
