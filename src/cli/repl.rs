//! Interactive chat loop: the chat page and settings page in one prompt.

use std::io::Write;
use std::path::PathBuf;

use strum::IntoEnumIterator;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::commands::{Command, Input, HELP};
use super::errors::format_error_help;
use crate::completion::{CompletionLoop, TurnOutcome};
use crate::error::Result;
use crate::export::write_export;
use crate::models::ChatModel;
use crate::session::SessionStore;
use crate::settings::{Settings, SettingsDraft};

/// Drives one session from line-based input.
pub struct Repl<'a, W: Write> {
    chat: &'a CompletionLoop,
    store: &'a mut SessionStore,
    export_dir: PathBuf,
    draft: Option<SettingsDraft>,
    out: W,
}

impl<'a, W: Write> Repl<'a, W> {
    pub fn new(
        chat: &'a CompletionLoop,
        store: &'a mut SessionStore,
        export_dir: PathBuf,
        out: W,
    ) -> Self {
        Self {
            chat,
            store,
            export_dir,
            draft: None,
            out,
        }
    }

    /// Read lines until EOF or `/quit`.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        writeln!(
            self.out,
            "Chatting with {} ({}). Type /help for commands.",
            self.store.settings().model,
            self.chat.service().provider_name()
        )?;

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match Input::parse(&line) {
                Input::Empty => {}
                Input::Message(text) => self.chat_turn(text).await?,
                Input::Command(Command::Quit) => break,
                Input::Command(command) => self.handle_command(command)?,
            }
        }
        Ok(())
    }

    /// The pending settings draft, if any.
    pub fn draft(&self) -> Option<&SettingsDraft> {
        self.draft.as_ref()
    }

    async fn chat_turn(&mut self, text: String) -> Result<()> {
        let out = &mut self.out;
        let mut printed = 0;
        let mut write_error: Option<std::io::Error> = None;
        let outcome = self
            .chat
            .submit(self.store, text, |partial| {
                if write_error.is_none() {
                    let written =
                        write!(out, "{}", &partial[printed..]).and_then(|()| out.flush());
                    if let Err(e) = written {
                        write_error = Some(e);
                    }
                }
                printed = partial.len();
            })
            .await;

        // The turn is already recorded; surface the first failed write now.
        if let Some(e) = write_error {
            return Err(e.into());
        }

        match outcome {
            Ok(TurnOutcome::Completed(text)) => {
                if printed == 0 {
                    writeln!(self.out, "{text}")?;
                } else {
                    writeln!(self.out)?;
                }
            }
            Ok(TurnOutcome::Failed { error, fallback }) => {
                if printed > 0 {
                    writeln!(self.out)?;
                }
                writeln!(self.out, "error: {}", format_error_help(&error))?;
                writeln!(self.out, "{fallback}")?;
            }
            Err(e) => writeln!(self.out, "error: {}", format_error_help(&e))?,
        }
        Ok(())
    }

    pub fn handle_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Clear => {
                self.store.reset();
                writeln!(self.out, "Conversation cleared.")?;
            }
            Command::ResetAll => {
                self.store.full_reset();
                self.draft = None;
                writeln!(self.out, "Conversation cleared and settings restored to defaults.")?;
            }
            Command::Save => self.save()?,
            Command::Settings => {
                writeln!(self.out, "Current settings:")?;
                writeln!(self.out, "{}", describe(self.store.settings()))?;
                if let Some(ref draft) = self.draft {
                    writeln!(self.out, "Unsaved edits (run /commit to apply):")?;
                    writeln!(self.out, "{}", describe_draft(draft))?;
                }
            }
            Command::Models => {
                for model in ChatModel::iter() {
                    writeln!(self.out, "  {:<12} {}", model.as_str(), model.blurb())?;
                }
            }
            Command::Set { field, value } => {
                let draft = self
                    .draft
                    .get_or_insert_with(|| self.store.draft_settings());
                match draft.set_field(&field, &value) {
                    Ok(()) => writeln!(self.out, "{field} set to {value} (run /commit to apply)")?,
                    Err(e) => writeln!(self.out, "error: {}", format_error_help(&e))?,
                }
            }
            Command::Commit => match self.draft.take() {
                None => writeln!(self.out, "No unsaved changes.")?,
                Some(draft) => match self.store.save_settings(draft.clone()) {
                    Ok(_) => writeln!(self.out, "Settings saved successfully!")?,
                    Err(e) => {
                        writeln!(self.out, "error: {}", format_error_help(&e))?;
                        self.draft = Some(draft);
                    }
                },
            },
            Command::Discard => {
                self.draft = None;
                writeln!(self.out, "Unsaved edits dropped.")?;
            }
            Command::Debug => {
                writeln!(self.out, "{}", serde_json::to_string_pretty(self.store.settings())?)?;
            }
            Command::Quit => {}
            Command::Unknown(name) => {
                writeln!(self.out, "Unknown command '/{name}'. Type /help for commands.")?;
            }
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        if self.store.transcript().is_empty() {
            writeln!(self.out, "Nothing to save yet.")?;
            return Ok(());
        }
        match write_export(&self.export_dir, self.store.transcript()) {
            Ok(path) => writeln!(self.out, "Conversation saved to {}", path.display())?,
            Err(e) => writeln!(self.out, "error: {}", format_error_help(&e))?,
        }
        Ok(())
    }
}

fn describe(settings: &Settings) -> String {
    describe_draft(&settings.draft())
}

fn describe_draft(draft: &SettingsDraft) -> String {
    format!(
        "  Model:         {}\n  Temperature:   {}\n  Max tokens:    {}\n  Streaming:     {}\n  System prompt: {}",
        draft.model,
        draft.temperature,
        draft.max_tokens,
        if draft.stream { "on" } else { "off" },
        draft.system_prompt
    )
}
