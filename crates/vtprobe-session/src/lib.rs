//! # vtprobe-session — Modal keystroke interpreter for vtprobe
//!
//! This crate decides what each key does. It never touches the real
//! terminal; it writes through a [`vtprobe_term::control::Control`] over any
//! sink, which is what makes every behavior testable against a `Vec<u8>`.
//!
//! - **[`mode`]**: `Mode` (Normal, Insert, Command)
//! - **[`count`]**: `RepeatCount`, the numeric prefix accumulator
//! - **[`keymap`]**: the normal-mode bindings as a closed `NormalAction` table
//! - **[`command`]**: the `:` command line and its `name[=value]` parser
//! - **[`geometry`]**: margins, scroll region, and the static layout text
//! - **[`config`]**: `SessionConfig` and its validation
//! - **[`session`]**: `Session`, the dispatcher, which plugs into the event loop

pub mod command;
pub mod config;
pub mod count;
pub mod geometry;
pub mod keymap;
pub mod mode;
pub mod session;

pub use config::SessionConfig;
pub use session::Session;
