// SPDX-License-Identifier: MIT
//
// The control channel — high-level terminal intents over one output sink.
//
// `Control` wraps any `Write` sink (a buffered stdout in production, a
// `Vec<u8>` in tests) and turns each intent into its control sequence via
// the `ansi` module. It never reads input and holds no dispatcher state.
//
// Writes go into the sink as they are issued; nothing reaches the terminal
// until the event loop calls `flush`, once per processed key. That keeps a
// multi-sequence action (draw prompt, move cursor, echo) atomic from the
// terminal's point of view.
//
// The one piece of state it does keep is a `TermModes` set: which terminal
// modes have been switched away from their power-on defaults. The session
// uses it on exit to undo exactly what the probe changed.

use std::io::{self, Write};

use bitflags::bitflags;

use crate::ansi::{self, Direction};

bitflags! {
    /// Terminal modes currently switched away from their defaults.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TermModes: u8 {
        /// Alternate screen buffer is active.
        const ALT_SCREEN   = 0b0000_0001;
        /// Autowrap has been turned off.
        const NO_AUTOWRAP  = 0b0000_0010;
        /// Insert (IRM) mode is on.
        const INSERT       = 0b0000_0100;
        /// All-motion mouse reporting is on.
        const MOUSE_REPORT = 0b0000_1000;
        /// A scroll region narrower than the screen is configured.
        const SCROLL_REGION = 0b0001_0000;
    }
}

/// Terminal control channel over an output sink.
pub struct Control<W: Write> {
    out: W,
    modes: TermModes,
}

impl<W: Write> Control<W> {
    /// Wrap an output sink. No bytes are written.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            modes: TermModes::empty(),
        }
    }

    /// The underlying sink.
    #[inline]
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    /// Mutable access to the underlying sink.
    #[inline]
    pub const fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Modes currently switched away from their defaults.
    #[inline]
    #[must_use]
    pub const fn modes(&self) -> TermModes {
        self.modes
    }

    // ── Cursor ──────────────────────────────────────────────────────

    /// Move to `(col, row)`, 1-indexed.
    pub fn move_to(&mut self, col: u16, row: u16) -> io::Result<()> {
        ansi::cursor_to(&mut self.out, col, row)
    }

    /// Move `n` cells in `dir`.
    pub fn move_cursor(&mut self, dir: Direction, n: usize) -> io::Result<()> {
        ansi::cursor_move(&mut self.out, dir, n)
    }

    /// Move to column `col` of the current row.
    pub fn move_to_column(&mut self, col: u16) -> io::Result<()> {
        ansi::cursor_to_column(&mut self.out, col)
    }

    pub fn save_cursor(&mut self) -> io::Result<()> {
        ansi::save_cursor(&mut self.out)
    }

    pub fn restore_cursor(&mut self) -> io::Result<()> {
        ansi::restore_cursor(&mut self.out)
    }

    // ── Scrolling ───────────────────────────────────────────────────

    /// Configure the scroll region to rows `top..=bottom`.
    pub fn set_scroll_region(&mut self, top: u16, bottom: u16) -> io::Result<()> {
        ansi::set_scroll_region(&mut self.out, top, bottom)?;
        self.modes.insert(TermModes::SCROLL_REGION);
        Ok(())
    }

    pub fn scroll_up(&mut self, n: usize) -> io::Result<()> {
        ansi::scroll_up(&mut self.out, n)
    }

    pub fn scroll_down(&mut self, n: usize) -> io::Result<()> {
        ansi::scroll_down(&mut self.out, n)
    }

    pub fn delete_lines(&mut self, n: usize) -> io::Result<()> {
        ansi::delete_lines(&mut self.out, n)
    }

    // ── Modes ───────────────────────────────────────────────────────

    pub fn set_alt_screen(&mut self, on: bool) -> io::Result<()> {
        ansi::alt_screen(&mut self.out, on)?;
        self.modes.set(TermModes::ALT_SCREEN, on);
        Ok(())
    }

    pub fn set_autowrap(&mut self, on: bool) -> io::Result<()> {
        ansi::autowrap(&mut self.out, on)?;
        self.modes.set(TermModes::NO_AUTOWRAP, !on);
        Ok(())
    }

    pub fn set_insert_mode(&mut self, on: bool) -> io::Result<()> {
        ansi::insert_mode(&mut self.out, on)?;
        self.modes.set(TermModes::INSERT, on);
        Ok(())
    }

    pub fn set_mouse_report(&mut self, on: bool) -> io::Result<()> {
        ansi::mouse_report(&mut self.out, on)?;
        self.modes.set(TermModes::MOUSE_REPORT, on);
        Ok(())
    }

    // ── Title ───────────────────────────────────────────────────────

    pub fn push_title(&mut self) -> io::Result<()> {
        ansi::push_title(&mut self.out)
    }

    pub fn pop_title(&mut self) -> io::Result<()> {
        ansi::pop_title(&mut self.out)
    }

    /// Set the window title. `text` must be free of control characters.
    pub fn set_title(&mut self, text: &str) -> io::Result<()> {
        ansi::set_title(&mut self.out, text)
    }

    // ── Text ────────────────────────────────────────────────────────

    /// Write literal text at the cursor.
    pub fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    /// Push everything written so far to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails to flush.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Return every tracked mode to its default, in reverse order of how
    /// intrusive it is: input-affecting modes first, the screen switch last
    /// so the primary buffer reappears with sane settings.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn reset_modes(&mut self) -> io::Result<()> {
        if self.modes.contains(TermModes::MOUSE_REPORT) {
            self.set_mouse_report(false)?;
        }
        if self.modes.contains(TermModes::INSERT) {
            self.set_insert_mode(false)?;
        }
        if self.modes.contains(TermModes::NO_AUTOWRAP) {
            self.set_autowrap(true)?;
        }
        if self.modes.contains(TermModes::SCROLL_REGION) {
            ansi::reset_scroll_region(&mut self.out)?;
            self.modes.remove(TermModes::SCROLL_REGION);
        }
        if self.modes.contains(TermModes::ALT_SCREEN) {
            self.set_alt_screen(false)?;
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
