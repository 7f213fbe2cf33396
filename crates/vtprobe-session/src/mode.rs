//! Interpreter modes.
//!
//! The session is always in exactly one [`Mode`]. Each mode changes how a
//! key token is interpreted:
//!
//! | Mode    | Digits          | Bound keys        | Everything else        |
//! |---------|-----------------|-------------------|------------------------|
//! | Normal  | repeat count    | run action        | ignored                |
//! | Insert  | echoed          | echoed            | echoed; Esc leaves     |
//! | Command | appended        | appended          | Enter runs, Esc aborts |

use std::fmt;

/// The current interpreter mode.
///
/// Pure data. The transitions live in the session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are commands, optionally prefixed by a repeat count.
    #[default]
    Normal,
    /// Keys are written to the terminal literally.
    Insert,
    /// Keys build a `name[=value]` command line on the prompt row.
    Command,
}

impl Mode {
    /// Human-readable name for logs.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn display_names() {
        assert_eq!(Mode::Normal.to_string(), "NORMAL");
        assert_eq!(Mode::Insert.to_string(), "INSERT");
        assert_eq!(Mode::Command.to_string(), "COMMAND");
    }
}
