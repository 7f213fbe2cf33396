// SPDX-License-Identifier: MIT
//
// Event loop — one blocking, single-threaded dispatch loop.
//
// The loop blocks on the input channel until something arrives:
//
//   Input::Bytes  → tokenize, then for each key token: dispatch to the app,
//                   flush the app's output, stop at once if it asked to quit.
//   Input::Resize → re-query the size, hand it to the app, flush.
//   Input::Closed → stdin is gone; end the session.
//
// There is no tick and no timeout. A key is classified, dispatched and its
// output flushed before the next message is even looked at, so the app's
// state is never observed half-updated. Resizes arrive through the same
// queue, which makes them just another message between two keys.
//
// Cleanup is unconditional: `run` calls the app's `on_exit` and restores
// the terminal whether the loop returned normally or with an error.

use std::io;
use std::sync::mpsc::Receiver;

use crate::input::{RawKey, Tokenizer};
use crate::reader::{self, Input, ResizeWatcher, StdinReader};
use crate::terminal::{Size, Terminal};
use crate::Error;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep reading keys.
    Continue,
    /// End the session after this key.
    Quit,
}

/// Why the event loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The application asked to quit.
    Quit,
    /// Stdin reached end-of-stream.
    InputClosed,
}

/// Application interface for the event loop.
pub trait App {
    /// Called once, after the terminal input mode is set, before the first
    /// key is read.
    fn on_start(&mut self, _size: Size) -> io::Result<()> {
        Ok(())
    }

    /// Handle one key token. Return [`Action::Quit`] to end the session.
    fn on_key(&mut self, key: &RawKey) -> io::Result<Action>;

    /// The terminal size changed (or may have). Must not touch key-handling
    /// state.
    fn on_resize(&mut self, _size: Size) -> io::Result<()> {
        Ok(())
    }

    /// Push buffered output to the terminal. Called once per processed key
    /// and once per resize.
    fn flush(&mut self) -> io::Result<()>;

    /// Called once when the loop ends, for any reason, before the terminal
    /// input mode is restored.
    fn on_exit(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal handle. Call [`run`](Self::run) to enter the loop; it
/// returns when the app quits or stdin closes.
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use vtprobe_term::event_loop::{Action, App, EventLoop};
/// use vtprobe_term::input::RawKey;
///
/// struct Echo;
///
/// impl App for Echo {
///     fn on_key(&mut self, key: &RawKey) -> io::Result<Action> {
///         if key.as_str() == "q" {
///             return Ok(Action::Quit);
///         }
///         print!("{}", key.as_str());
///         Ok(Action::Continue)
///     }
///
///     fn flush(&mut self) -> io::Result<()> {
///         io::Write::flush(&mut io::stdout())
///     }
/// }
///
/// let mut event_loop = EventLoop::new()?;
/// event_loop.run(&mut Echo)?;
/// # Ok::<(), vtprobe_term::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
}

impl EventLoop {
    /// Open the terminal and query its size.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin is not a terminal or the size is unknown.
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            terminal: Terminal::open()?,
        })
    }

    /// The terminal size as last queried.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the app quits or stdin closes.
    ///
    /// 1. Turns off echo and line buffering
    /// 2. Starts the stdin reader and the resize watcher
    /// 3. Calls [`App::on_start`], then pumps input
    /// 4. Calls [`App::on_exit`] and restores the terminal, even on error
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, signal registration, or any
    /// write to the terminal fails.
    pub fn run(&mut self, app: &mut impl App) -> Result<Exit, Error> {
        self.terminal.enter()?;

        let (tx, rx) = reader::channel();
        let watcher = ResizeWatcher::spawn(tx.clone());
        let mut watcher = match watcher {
            Ok(w) => w,
            Err(e) => {
                self.terminal.leave()?;
                return Err(e);
            }
        };
        let mut stdin = StdinReader::spawn(tx);

        let terminal = &mut self.terminal;
        let result = app
            .on_start(terminal.size())
            .and_then(|()| app.flush())
            .and_then(|()| pump(app, &rx, || terminal.refresh_size()));

        // Always clean up, even if the loop errored.
        stdin.stop();
        watcher.stop();
        let exit_result = finish(app);
        self.terminal.leave()?;

        let exit = result?;
        exit_result?;
        Ok(exit)
    }
}

/// Run the exit hook, then flush even if the hook failed partway so the
/// bytes it did write still reach the terminal. The hook's error wins.
fn finish(app: &mut impl App) -> io::Result<()> {
    let exit = app.on_exit();
    let flush = app.flush();
    exit.and(flush)
}

/// Drive `app` from `rx` until it quits or input closes.
///
/// `refresh_size` is called on every resize notification; it is a parameter
/// so the loop can be exercised without a real terminal.
///
/// # Errors
///
/// Returns the first I/O error reported by the app.
pub fn pump(
    app: &mut impl App,
    rx: &Receiver<Input>,
    mut refresh_size: impl FnMut() -> Size,
) -> io::Result<Exit> {
    let mut tokenizer = Tokenizer::new();

    while let Ok(input) = rx.recv() {
        match input {
            Input::Bytes(bytes) => {
                for key in tokenizer.advance(&bytes) {
                    tracing::trace!(target: "input", key = %key, "key");
                    let action = app.on_key(&key)?;
                    app.flush()?;
                    if action == Action::Quit {
                        return Ok(Exit::Quit);
                    }
                }
            }
            Input::Resize => {
                let size = refresh_size();
                tracing::debug!(target: "input", cols = size.cols, rows = size.rows, "resize");
                app.on_resize(size)?;
                app.flush()?;
            }
            Input::Closed => {
                if tokenizer.has_pending() {
                    tracing::debug!(target: "input", "input closed mid-character");
                }
                return Ok(Exit::InputClosed);
            }
        }
    }

    // Every sender is gone without a Closed message: treat as end of input.
    Ok(Exit::InputClosed)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records every callback as a string.
    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
        quit_on: Option<&'static str>,
    }

    impl App for Recorder {
        fn on_key(&mut self, key: &RawKey) -> io::Result<Action> {
            self.log.push(format!("key {key}"));
            if self.quit_on == Some(key.as_str()) {
                return Ok(Action::Quit);
            }
            Ok(Action::Continue)
        }

        fn on_resize(&mut self, size: Size) -> io::Result<()> {
            self.log.push(format!("resize {}x{}", size.cols, size.rows));
            Ok(())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.log.push("flush".into());
            Ok(())
        }
    }

    fn fixed_size() -> Size {
        Size { cols: 100, rows: 30 }
    }

    #[test]
    fn flushes_once_per_key() {
        let (tx, rx) = reader::channel();
        tx.send(Input::Bytes(b"ab".to_vec())).unwrap();
        tx.send(Input::Closed).unwrap();

        let mut app = Recorder::default();
        let exit = pump(&mut app, &rx, fixed_size).unwrap();

        assert_eq!(exit, Exit::InputClosed);
        assert_eq!(app.log, vec!["key a", "flush", "key b", "flush"]);
    }

    #[test]
    fn quit_stops_before_remaining_tokens() {
        let (tx, rx) = reader::channel();
        tx.send(Input::Bytes(b"xqy".to_vec())).unwrap();
        tx.send(Input::Bytes(b"z".to_vec())).unwrap();

        let mut app = Recorder {
            quit_on: Some("q"),
            ..Recorder::default()
        };
        let exit = pump(&mut app, &rx, fixed_size).unwrap();

        assert_eq!(exit, Exit::Quit);
        assert_eq!(app.log, vec!["key x", "flush", "key q", "flush"]);
    }

    #[test]
    fn resize_between_keys() {
        let (tx, rx) = reader::channel();
        tx.send(Input::Bytes(b"a".to_vec())).unwrap();
        tx.send(Input::Resize).unwrap();
        tx.send(Input::Bytes(b"b".to_vec())).unwrap();
        drop(tx);

        let mut app = Recorder::default();
        let exit = pump(&mut app, &rx, fixed_size).unwrap();

        assert_eq!(exit, Exit::InputClosed);
        assert_eq!(
            app.log,
            vec!["key a", "flush", "resize 100x30", "flush", "key b", "flush"]
        );
    }

    #[test]
    fn arrow_is_one_key() {
        let (tx, rx) = reader::channel();
        tx.send(Input::Bytes(b"\x1b[A".to_vec())).unwrap();
        drop(tx);

        let mut app = Recorder::default();
        pump(&mut app, &rx, fixed_size).unwrap();

        assert_eq!(app.log, vec!["key \\u{1b}[A", "flush"]);
    }

    #[test]
    fn app_error_propagates() {
        struct Failing;
        impl App for Failing {
            fn on_key(&mut self, _key: &RawKey) -> io::Result<Action> {
                Err(io::Error::other("sink gone"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let (tx, rx) = reader::channel();
        tx.send(Input::Bytes(b"a".to_vec())).unwrap();

        let err = pump(&mut Failing, &rx, fixed_size).unwrap_err();
        assert_eq!(err.to_string(), "sink gone");
    }

    #[test]
    fn finish_flushes_after_failed_exit_hook() {
        struct HalfReset {
            flushed: bool,
        }
        impl App for HalfReset {
            fn on_key(&mut self, _key: &RawKey) -> io::Result<Action> {
                Ok(Action::Continue)
            }
            fn flush(&mut self) -> io::Result<()> {
                self.flushed = true;
                Ok(())
            }
            fn on_exit(&mut self) -> io::Result<()> {
                Err(io::Error::other("reset failed"))
            }
        }

        let mut app = HalfReset { flushed: false };
        let err = finish(&mut app).unwrap_err();
        assert_eq!(err.to_string(), "reset failed");
        assert!(app.flushed);
    }

    #[test]
    fn closed_with_partial_character_still_ends() {
        let (tx, rx) = reader::channel();
        tx.send(Input::Bytes("☕".as_bytes()[..1].to_vec())).unwrap();
        tx.send(Input::Closed).unwrap();

        let mut app = Recorder::default();
        assert_eq!(pump(&mut app, &rx, fixed_size).unwrap(), Exit::InputClosed);
        assert!(app.log.is_empty());
    }

    #[test]
    fn disconnected_channel_is_input_closed() {
        let (tx, rx) = reader::channel();
        drop(tx);
        let mut app = Recorder::default();
        assert_eq!(pump(&mut app, &rx, fixed_size).unwrap(), Exit::InputClosed);
        assert!(app.log.is_empty());
    }
}
