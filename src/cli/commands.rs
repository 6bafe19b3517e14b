//! Parsing of REPL input lines.

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line.
    Empty,
    /// A chat message for the model.
    Message(String),
    /// A `/command`.
    Command(Command),
}

/// REPL commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Clear the conversation, keep settings.
    Clear,
    /// Clear the conversation and restore default settings.
    ResetAll,
    /// Export the transcript to a file.
    Save,
    /// Show current settings and any pending draft.
    Settings,
    /// List selectable models.
    Models,
    /// Edit one field of the settings draft.
    Set { field: String, value: String },
    /// Commit the draft.
    Commit,
    /// Drop the draft.
    Discard,
    /// Dump settings as JSON.
    Debug,
    Quit,
    Unknown(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        match line.strip_prefix('/') {
            Some(rest) => Self::Command(Command::parse(rest)),
            None => Self::Message(line.to_string()),
        }
    }
}

impl Command {
    fn parse(rest: &str) -> Self {
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        match name {
            "help" | "?" => Self::Help,
            "clear" => Self::Clear,
            "reset-all" => Self::ResetAll,
            "save" => Self::Save,
            "settings" => Self::Settings,
            "models" => Self::Models,
            "set" => match args.split_once(char::is_whitespace) {
                Some((field, value)) => Self::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                },
                None => Self::Unknown(format!("set {args}").trim_end().to_string()),
            },
            "commit" => Self::Commit,
            "discard" => Self::Discard,
            "debug" => Self::Debug,
            "quit" | "exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

pub const HELP: &str = "\
Type a message and press Enter to chat.

  /clear                 clear the conversation (settings are kept)
  /reset-all             clear the conversation and restore default settings
  /save                  write the conversation to conversation_<timestamp>.txt
  /settings              show current settings and any unsaved edits
  /models                list available models
  /set <field> <value>   edit a setting (model, temperature, max_tokens,
                         stream, system_prompt); takes effect after /commit
  /commit                save edited settings
  /discard               drop edited settings
  /debug                 print settings as JSON
  /quit                  leave";
