// SPDX-License-Identifier: MIT
//
// vtprobe-term — Terminal layer for vtprobe.
//
// Everything that touches the real terminal or raw bytes lives here: the
// control-sequence encoders, the control channel that writes them, the
// termios input mode, the stdin and resize sources, the key tokenizer and
// classifier, and the blocking event loop that ties them together.
//
// Decisions about *what* to emit for a key live one layer up, in
// vtprobe-session. Nothing in this crate knows about modes or commands.

pub mod ansi;
pub mod control;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod terminal;

use std::io;

/// Environment failures. Any of these means the session cannot start (or
/// continue) safely.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("stdin is not a terminal")]
    NotATerminal,

    #[error("cannot query the terminal window size")]
    Size,

    #[error("cannot register the window-size signal handler")]
    Signal(#[source] io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
