// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Input sources — stdin bytes and resize notifications on one channel.
//
// Two background threads feed a single `mpsc` channel of `Input` values:
//
//   StdinReader   — reads raw bytes from stdin and forwards each chunk as
//                   `Input::Bytes`. Sends `Input::Closed` once on EOF or a
//                   read error, then exits.
//   ResizeWatcher — waits for SIGWINCH (via signal-hook's iterator, so no
//                   code of ours runs in signal context) and forwards
//                   `Input::Resize`.
//
// The main thread is the only consumer and the only owner of session state.
// A resize can therefore never interleave with a half-dispatched key: it is
// just the next message in the queue.
//
// Shutdown: the stdin thread polls with a short timeout and checks an
// `AtomicBool` between polls, so it never stays parked in a blocking
// `read()`. The resize thread is released by closing the signal handle.

#[cfg(unix)]
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::Error;

/// Byte chunk read from stdin.
///
/// A keypress is 1–3 bytes, a paste can be kilobytes. 4 KB covers both.
const READ_BUF_SIZE: usize = 4096;

/// How often the reader thread checks the stop flag (milliseconds).
const POLL_TIMEOUT_MS: i32 = 50;

/// One message from the input sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A non-empty chunk of raw stdin bytes, as returned by one `read()`.
    Bytes(Vec<u8>),
    /// The terminal geometry may have changed.
    Resize,
    /// Stdin reached EOF or failed. No more `Bytes` will follow.
    Closed,
}

/// Create the shared input channel.
#[must_use]
pub fn channel() -> (Sender<Input>, Receiver<Input>) {
    mpsc::channel()
}

// ─── StdinReader ────────────────────────────────────────────────────────────

/// Background stdin reader thread.
///
/// Runs until [`stop`](Self::stop) is called (or the reader is dropped),
/// stdin hits EOF, or the receiving side goes away.
pub struct StdinReader {
    /// The reader thread handle. `None` after `stop()` joins it.
    handle: Option<JoinHandle<()>>,
    /// Shared flag to signal the thread to exit.
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader thread, sending into `tx`.
    ///
    /// # Panics
    ///
    /// Panics if the OS cannot spawn a new thread (extremely rare).
    #[must_use]
    pub fn spawn(tx: Sender<Input>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || {
                Self::reader_loop(&tx, &stop_flag);
            })
            .expect("failed to spawn stdin reader thread");

        Self {
            handle: Some(handle),
            stop,
        }
    }

    /// Signal the reader thread to stop and wait for it to exit.
    ///
    /// Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    #[cfg(unix)]
    fn reader_loop(tx: &Sender<Input>, stop: &AtomicBool) {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; READ_BUF_SIZE];

        loop {
            if stop.load(Ordering::Relaxed) {
                return;
            }

            let ready = unsafe {
                let mut pfd = libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
            };

            // Timeout or EINTR (a SIGWINCH lands here): check the flag again.
            if ready <= 0 {
                continue;
            }

            let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };

            if n <= 0 {
                tracing::debug!(target: "input", n, "stdin closed");
                let _ = tx.send(Input::Closed);
                return;
            }

            #[allow(clippy::cast_sign_loss)] // n > 0 guaranteed above.
            let chunk = buf[..n as usize].to_vec();

            if tx.send(Input::Bytes(chunk)).is_err() {
                return;
            }
        }
    }

    /// Non-unix fallback using blocking reads.
    #[cfg(not(unix))]
    fn reader_loop(tx: &Sender<Input>, stop: &AtomicBool) {
        use std::io::Read;

        let stdin = std::io::stdin();
        let mut buf = [0u8; READ_BUF_SIZE];

        loop {
            if stop.load(Ordering::Relaxed) {
                return;
            }

            match stdin.lock().read(&mut buf) {
                Ok(0) | Err(_) => {
                    let _ = tx.send(Input::Closed);
                    return;
                }
                Ok(n) => {
                    if tx.send(Input::Bytes(buf[..n].to_vec())).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── ResizeWatcher ──────────────────────────────────────────────────────────

/// Forwards SIGWINCH to the input channel as [`Input::Resize`].
pub struct ResizeWatcher {
    #[cfg(unix)]
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

impl ResizeWatcher {
    /// Register for SIGWINCH and start forwarding into `tx`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signal`] if the handler cannot be registered.
    #[cfg(unix)]
    pub fn spawn(tx: Sender<Input>) -> Result<Self, Error> {
        use signal_hook::consts::SIGWINCH;
        use signal_hook::iterator::Signals;

        let mut signals = Signals::new([SIGWINCH]).map_err(Error::Signal)?;
        let handle = signals.handle();

        let thread = thread::Builder::new()
            .name("resize-watcher".into())
            .spawn(move || {
                for _ in signals.forever() {
                    if tx.send(Input::Resize).is_err() {
                        break;
                    }
                }
            })
            .map_err(Error::Signal)?;

        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }

    /// Without SIGWINCH there is nothing to watch; geometry stays as queried
    /// at startup.
    #[cfg(not(unix))]
    pub fn spawn(_tx: Sender<Input>) -> Result<Self, Error> {
        Ok(Self { thread: None })
    }

    /// Unregister and join the watcher thread. Idempotent.
    pub fn stop(&mut self) {
        #[cfg(unix)]
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
