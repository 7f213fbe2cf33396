//! Command-line mode: the `:` prompt on the bottom row.
//!
//! When the user presses `:` in normal mode, the session enters command mode
//! and keys accumulate in a [`CommandLine`]. Enter parses it into an
//! [`Invocation`], Escape throws it away.
//!
//! # Syntax
//!
//! `name` or `name=value`. The line is split once, on the first `=`; the
//! value may itself contain `=`. A missing value is the empty string.
//!
//! # Supported commands
//!
//! | Command          | Value            | Effect                       |
//! |------------------|------------------|------------------------------|
//! | `set-title`      | title text       | set the window title         |
//! | `push-title`     | ignored          | push title onto the stack    |
//! | `pop-title`      | ignored          | pop title from the stack     |
//! | `altscreen`      | switch           | alternate screen on/off      |
//! | `autowrap`       | switch           | autowrap on/off              |
//! | `insert-mode`    | switch           | terminal insert mode on/off  |
//! | `mouse-report`   | switch           | all-motion mouse reports     |
//! | `q`              | ignored          | quit                         |
//!
//! A switch value is one of `on`/`1`/`true`/`yes` or `off`/`0`/`false`/`no`,
//! case-insensitive. Anything else is rejected before any sequence is sent.

use std::fmt;

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The command-line input buffer.
///
/// Append-only apart from backspace; the cursor is always at the end. The
/// leading `:` is not stored; the session draws it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    input: String,
}

impl CommandLine {
    /// Create an empty command line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
        }
    }

    /// The text typed so far.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Append a character.
    pub fn push(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Remove the last character and return it, or `None` if already empty.
    pub fn backspace(&mut self) -> Option<char> {
        self.input.pop()
    }

    /// Parse the current text. See [`parse`].
    ///
    /// # Errors
    ///
    /// See [`parse`].
    pub fn parse(&self) -> Result<Invocation, CommandError> {
        parse(&self.input)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The command-mode registry: every name `parse` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LongCommand {
    SetTitle,
    PushTitle,
    PopTitle,
    InsertMode,
    MouseReport,
    AltScreen,
    Autowrap,
    Quit,
}

impl LongCommand {
    pub const ALL: [Self; 8] = [
        Self::SetTitle,
        Self::PushTitle,
        Self::PopTitle,
        Self::InsertMode,
        Self::MouseReport,
        Self::AltScreen,
        Self::Autowrap,
        Self::Quit,
    ];

    /// The name typed on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SetTitle => "set-title",
            Self::PushTitle => "push-title",
            Self::PopTitle => "pop-title",
            Self::InsertMode => "insert-mode",
            Self::MouseReport => "mouse-report",
            Self::AltScreen => "altscreen",
            Self::Autowrap => "autowrap",
            Self::Quit => "q",
        }
    }

    /// Look a command up by its exact (case-sensitive) name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for LongCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// A validated command, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    SetTitle(String),
    PushTitle,
    PopTitle,
    InsertMode(bool),
    MouseReport(bool),
    AltScreen(bool),
    Autowrap(bool),
    Quit,
}

impl Invocation {
    /// Which registry entry produced this invocation.
    #[must_use]
    pub const fn command(&self) -> LongCommand {
        match self {
            Self::SetTitle(_) => LongCommand::SetTitle,
            Self::PushTitle => LongCommand::PushTitle,
            Self::PopTitle => LongCommand::PopTitle,
            Self::InsertMode(_) => LongCommand::InsertMode,
            Self::MouseReport(_) => LongCommand::MouseReport,
            Self::AltScreen(_) => LongCommand::AltScreen,
            Self::Autowrap(_) => LongCommand::Autowrap,
            Self::Quit => LongCommand::Quit,
        }
    }

    /// Status-line text reporting that this invocation ran.
    #[must_use]
    pub fn status(&self) -> String {
        match self {
            Self::SetTitle(title) => format!("title set: {title}"),
            Self::PushTitle => "title pushed".to_string(),
            Self::PopTitle => "title popped".to_string(),
            Self::InsertMode(on)
            | Self::MouseReport(on)
            | Self::AltScreen(on)
            | Self::Autowrap(on) => {
                format!("{} {}", self.command(), if *on { "on" } else { "off" })
            }
            Self::Quit => "quit".to_string(),
        }
    }
}

/// Why a command line was rejected. `Display` is the status-line text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command")]
    Unknown(String),

    #[error("bad value for {command}")]
    BadValue { command: LongCommand, value: String },
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split `line` once on the first `=` into `(name, value)`.
#[must_use]
pub fn split(line: &str) -> (&str, &str) {
    line.split_once('=').unwrap_or((line, ""))
}

/// Parse an on/off switch value, case-insensitively.
#[must_use]
pub fn parse_switch(value: &str) -> Option<bool> {
    const ON: [&str; 4] = ["on", "1", "true", "yes"];
    const OFF: [&str; 4] = ["off", "0", "false", "no"];

    if ON.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if OFF.iter().any(|t| value.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}

/// Parse a complete command line into an [`Invocation`].
///
/// # Errors
///
/// [`CommandError::Unknown`] if the name is not in the registry,
/// [`CommandError::BadValue`] if a switch value is not recognized or a title
/// contains control characters.
pub fn parse(line: &str) -> Result<Invocation, CommandError> {
    let (name, value) = split(line);
    let command =
        LongCommand::from_name(name).ok_or_else(|| CommandError::Unknown(name.to_string()))?;

    let bad_value = || CommandError::BadValue {
        command,
        value: value.to_string(),
    };

    let switch = || parse_switch(value).ok_or_else(&bad_value);

    Ok(match command {
        LongCommand::SetTitle => {
            if value.chars().any(char::is_control) {
                return Err(bad_value());
            }
            Invocation::SetTitle(value.to_string())
        }
        LongCommand::PushTitle => Invocation::PushTitle,
        LongCommand::PopTitle => Invocation::PopTitle,
        LongCommand::InsertMode => Invocation::InsertMode(switch()?),
        LongCommand::MouseReport => Invocation::MouseReport(switch()?),
        LongCommand::AltScreen => Invocation::AltScreen(switch()?),
        LongCommand::Autowrap => Invocation::Autowrap(switch()?),
        LongCommand::Quit => Invocation::Quit,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
