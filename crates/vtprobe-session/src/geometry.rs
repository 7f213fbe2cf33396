//! Terminal geometry and the static fixed-text layout.
//!
//! The screen is split into three bands:
//!
//! ```text
//! row 1               ┐ top margin      "main: Non-Scrolled Top 1 ..."
//! row top_margin      ┘
//! row top_margin + 1  ┐ scroll region   "line 3 line 3 ..."
//! ...                 │
//! row rows - bottom   ┘
//! ...                 ┐ bottom margin   "main: Non-Scrolled Bottom 22 ..."
//! row rows            ┘ (prompt row)    ":" command line / status
//! ```
//!
//! Geometry is replaced wholesale when the terminal reports a new size.
//! Nothing here writes to the terminal; the session turns rows into output.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vtprobe_term::terminal::Size;

/// Which screen buffer is showing. Only affects layout labels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Main,
    Alt,
}

impl Screen {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Alt => "alt",
        }
    }

    #[must_use]
    pub const fn is_alt(self) -> bool {
        matches!(self, Self::Alt)
    }

    #[must_use]
    pub const fn from_alt(alt: bool) -> Self {
        if alt { Self::Alt } else { Self::Main }
    }
}

/// Rows × columns plus the fixed non-scrolling margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    size: Size,
    top_margin: u16,
    bottom_margin: u16,
}

impl Geometry {
    #[must_use]
    pub const fn new(size: Size, top_margin: u16, bottom_margin: u16) -> Self {
        Self {
            size,
            top_margin,
            bottom_margin,
        }
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.size.rows
    }

    #[inline]
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.size.cols
    }

    /// Take a new terminal size. Margins are fixed for the session.
    pub const fn update(&mut self, size: Size) {
        self.size = size;
    }

    /// The scroll region as `(top, bottom)`, 1-indexed and inclusive.
    ///
    /// Falls back to the whole screen when the margins leave no room.
    #[must_use]
    pub const fn scroll_region(&self) -> (u16, u16) {
        let top = self.top_margin.saturating_add(1);
        let bottom = self.size.rows.saturating_sub(self.bottom_margin);
        if top <= bottom {
            (top, bottom)
        } else {
            (1, self.size.rows)
        }
    }

    /// The last row, where the command line and status results go.
    #[inline]
    #[must_use]
    pub const fn prompt_row(&self) -> u16 {
        self.size.rows
    }

    /// Clamp `row` into the scroll region.
    #[must_use]
    pub fn clamp_row(&self, row: u16) -> u16 {
        let (top, bottom) = self.scroll_region();
        row.clamp(top, bottom.max(top))
    }

    /// The unfilled label for `row`, or `None` for the prompt row when it
    /// lies outside the scroll region.
    #[must_use]
    pub fn row_label(&self, screen: Screen, row: u16) -> Option<String> {
        let (top, bottom) = self.scroll_region();
        let name = screen.label();
        if row < top {
            Some(format!("{name}: Non-Scrolled Top {row}"))
        } else if row <= bottom {
            Some(format!("line {row}"))
        } else if row < self.prompt_row() {
            Some(format!("{name}: Non-Scrolled Bottom {row}"))
        } else {
            None
        }
    }

    /// Every row of the static layout, filled to the terminal width.
    /// The prompt row comes out blank.
    pub fn layout(&self, screen: Screen) -> impl Iterator<Item = (u16, String)> + '_ {
        let cols = usize::from(self.cols());
        (1..=self.rows()).map(move |row| {
            let text = self
                .row_label(screen, row)
                .map_or_else(|| " ".repeat(cols), |label| fill_row(&label, cols));
            (row, text)
        })
    }
}

// ---------------------------------------------------------------------------
// Text fitting
// ---------------------------------------------------------------------------

/// Repeat `text` separated by single spaces as many whole times as fit in
/// `cols` display columns, then pad with spaces to exactly `cols`.
///
/// Text wider than the row is truncated instead.
#[must_use]
pub fn fill_row(text: &str, cols: usize) -> String {
    let unit = text.width();
    if unit == 0 || unit > cols {
        return fit(text, cols);
    }

    let mut out = String::with_capacity(cols);
    out.push_str(text);
    let mut used = unit;
    while used + 1 + unit <= cols {
        out.push(' ');
        out.push_str(text);
        used += 1 + unit;
    }
    pad(&mut out, cols - used);
    out
}

/// Truncate or pad `text` to exactly `cols` display columns.
///
/// A wide character that would straddle the edge is dropped.
#[must_use]
pub fn fit(text: &str, cols: usize) -> String {
    let mut out = String::with_capacity(cols);
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > cols {
            break;
        }
        out.push(ch);
        used += w;
    }
    pad(&mut out, cols - used);
    out
}

fn pad(out: &mut String, n: usize) {
    out.extend(std::iter::repeat_n(' ', n));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
