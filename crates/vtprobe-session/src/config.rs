//! Session configuration.
//!
//! The values are fixed for the lifetime of a session. The binary fills them
//! from command-line flags; [`Default`] gives the stock layout.

/// Layout settings for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Non-scrolling rows above the scroll region.
    pub top_margin: u16,
    /// Non-scrolling rows below the scroll region, including the prompt row.
    pub bottom_margin: u16,
    /// Row the cursor starts on, clamped into the scroll region.
    pub start_row: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            top_margin: 2,
            bottom_margin: 3,
            start_row: 10,
        }
    }
}

/// A configuration that cannot produce a usable layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("bottom margin must be at least 1 (the prompt row)")]
    NoPromptRow,

    #[error("start row must be at least 1")]
    StartRow,
}

impl SessionConfig {
    /// Check that the values describe a usable layout.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.bottom_margin == 0 {
            return Err(ConfigError::NoPromptRow);
        }
        if self.start_row == 0 {
            return Err(ConfigError::StartRow);
        }
        Ok(())
    }
}
