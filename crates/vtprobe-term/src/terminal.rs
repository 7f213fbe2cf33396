// SPDX-License-Identifier: MIT
//
// Terminal control — input mode, geometry query, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control; there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Unlike a full-screen application, the probe only switches off echo and
// canonical (line-buffered) input. Signals, CR/NL translation and output
// post-processing stay as the user's shell configured them, so what the
// terminal does with our sequences is the only thing under test.
//
// Restore is guaranteed three ways: `leave()` on the normal path, `Drop`
// if the caller unwinds past us, and a panic hook that restores termios
// and writes a fixed reset sequence straight to fd 1.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::Error;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios for panic recovery.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Reset sequence for emergency use.
///
/// Mouse reporting off, insert mode off, autowrap on, full-screen scroll
/// region, primary screen, cursor visible. Every mode the probe can touch,
/// regardless of whether it did.
#[rustfmt::skip]
const EMERGENCY_RESTORE: &[u8] = b"\
    \x1b[?1003l\
    \x1b[4l\
    \x1b[?7h\
    \x1b[r\
    \x1b[?1047l\
    \x1b[?25h";

/// Panic hook guard: ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the reset sequence directly to stdout's file descriptor, bypassing
/// the stdout lock in case the panic happened while it was held.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Call [`enter`](Self::enter) to turn off echo and line buffering. The
/// original settings come back when the handle is dropped, even on panic.
///
/// # Example
///
/// ```no_run
/// use vtprobe_term::terminal::Terminal;
///
/// let mut term = Terminal::open()?;
/// term.enter()?;
/// // ... read keys, emit sequences ...
/// // Input mode is restored automatically on drop.
/// # Ok::<(), vtprobe_term::Error>(())
/// ```
pub struct Terminal {
    /// Original termios saved before changing the input mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Current terminal size (refresh with [`refresh_size`](Self::refresh_size)).
    size: Size,

    /// Whether echo and line buffering are currently off.
    active: bool,
}

impl Terminal {
    /// Open the controlling terminal and query its size.
    ///
    /// Does **not** change the input mode; call [`enter`](Self::enter).
    ///
    /// # Errors
    ///
    /// [`Error::NotATerminal`] if stdin is not a TTY, [`Error::Size`] if the
    /// window size cannot be queried. The probe cannot run safely without
    /// either.
    pub fn open() -> Result<Self, Error> {
        if !is_tty() {
            return Err(Error::NotATerminal);
        }
        let size = get_size().ok_or(Error::Size)?;

        Ok(Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        })
    }

    /// Current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the terminal size from the OS after a resize notification.
    ///
    /// Keeps the cached size if the query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            self.size = s;
        }
        self.size
    }

    /// Whether echo and line buffering are currently off.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Disable echo and line buffering. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the termios calls fail.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_input()?;

        self.active = true;
        Ok(())
    }

    /// Restore the original input mode. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing stdout or restoring termios fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        io::stdout().flush()?;
        self.disable_raw_input()?;
        self.active = false;
        Ok(())
    }

    // ── Input mode (termios) ────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_input(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // `stty -echo -icanon`, nothing more.
            termios.c_lflag &= !(libc::ECHO | libc::ICANON);

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_input(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_input(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_input(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
