// SPDX-License-Identifier: MIT
//
// ANSI control sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit; the `Control` channel makes those. This
// module just knows the byte-level encoding of every sequence the probe
// exercises.
//
// Coordinates are passed through verbatim: callers hand us 1-indexed rows and
// columns exactly as the terminal expects them. Counts are never validated
// here; the dispatcher guarantees they are positive before they reach us.
//
// All functions return `io::Result` propagated from the underlying writer.
use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Relative cursor movement direction (CUU / CUD / CUF / CUB).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    /// Final byte of the CSI sequence for this direction.
    #[inline]
    #[must_use]
    pub const fn final_byte(self) -> char {
        match self {
            Self::Up => 'A',
            Self::Down => 'B',
            Self::Right => 'C',
            Self::Left => 'D',
        }
    }
}

/// Move the cursor to `(col, row)` using CUP. Both are 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, col: u16, row: u16) -> io::Result<()> {
    write!(w, "\x1b[{row};{col}H")
}

/// Move the cursor `n` cells in `dir`.
#[inline]
pub fn cursor_move(w: &mut impl Write, dir: Direction, n: usize) -> io::Result<()> {
    write!(w, "\x1b[{n}{}", dir.final_byte())
}

/// Move the cursor to column `col` of the current row (CHA).
#[inline]
pub fn cursor_to_column(w: &mut impl Write, col: u16) -> io::Result<()> {
    write!(w, "\x1b[{col}G")
}

/// Save the cursor position (SCOSC).
#[inline]
pub fn save_cursor(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[s")
}

/// Restore the cursor position saved by [`save_cursor`] (SCORC).
#[inline]
pub fn restore_cursor(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[u")
}

// ─── Scrolling ───────────────────────────────────────────────────────────────

/// Restrict scrolling to rows `top..=bottom` (DECSTBM).
#[inline]
pub fn set_scroll_region(w: &mut impl Write, top: u16, bottom: u16) -> io::Result<()> {
    write!(w, "\x1b[{top};{bottom}r")
}

/// Reset the scroll region to the full screen.
#[inline]
pub fn reset_scroll_region(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[r")
}

/// Scroll the region up by `n` lines (SU).
#[inline]
pub fn scroll_up(w: &mut impl Write, n: usize) -> io::Result<()> {
    write!(w, "\x1b[{n}S")
}

/// Scroll the region down by `n` lines (SD).
#[inline]
pub fn scroll_down(w: &mut impl Write, n: usize) -> io::Result<()> {
    write!(w, "\x1b[{n}T")
}

/// Delete `n` lines at the cursor row (DL).
#[inline]
pub fn delete_lines(w: &mut impl Write, n: usize) -> io::Result<()> {
    write!(w, "\x1b[{n}M")
}

// ─── Modes ───────────────────────────────────────────────────────────────────

/// Switch to (`true`) or away from (`false`) the alternate screen buffer.
///
/// Uses DEC private mode 1047, which swaps buffers without the implicit
/// save/restore of the cursor that 1049 performs. The probe manages the
/// cursor itself so the terminal's handling of the plain switch is visible.
#[inline]
pub fn alt_screen(w: &mut impl Write, on: bool) -> io::Result<()> {
    w.write_all(if on { b"\x1b[?1047h" } else { b"\x1b[?1047l" })
}

/// Enable or disable automatic wrap at the right margin (DECAWM).
#[inline]
pub fn autowrap(w: &mut impl Write, on: bool) -> io::Result<()> {
    w.write_all(if on { b"\x1b[?7h" } else { b"\x1b[?7l" })
}

/// Enable or disable insert/replace mode (IRM).
#[inline]
pub fn insert_mode(w: &mut impl Write, on: bool) -> io::Result<()> {
    w.write_all(if on { b"\x1b[4h" } else { b"\x1b[4l" })
}

/// Enable or disable all-motion mouse reporting (DEC 1003).
#[inline]
pub fn mouse_report(w: &mut impl Write, on: bool) -> io::Result<()> {
    w.write_all(if on { b"\x1b[?1003h" } else { b"\x1b[?1003l" })
}

// ─── Window Title ────────────────────────────────────────────────────────────

/// Push the window title onto the terminal's title stack (XTWINOPS 22;2).
#[inline]
pub fn push_title(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[22;2t")
}

/// Pop the window title from the terminal's title stack (XTWINOPS 23;2).
#[inline]
pub fn pop_title(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[23;2t")
}

/// Set the window title (OSC 2, BEL-terminated).
///
/// `text` must not contain control characters; a stray BEL or ESC would end
/// the string early and leak the remainder onto the screen.
#[inline]
pub fn set_title(w: &mut impl Write, text: &str) -> io::Result<()> {
    debug_assert!(!text.chars().any(char::is_control));
    write!(w, "\x1b]2;{text}\x07")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
