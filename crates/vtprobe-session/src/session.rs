//! The modal command dispatcher.
//!
//! A [`Session`] owns all interpreter state (mode, pending repeat count,
//! command line, screen label, geometry) and the [`Control`] channel it
//! drives. It sees one key token at a time and finishes everything that
//! token causes before returning, so the caller only needs to flush after
//! each call.
//!
//! # Transitions
//!
//! ```text
//!            i                       :
//!   INSERT ◀──── NORMAL ──────────────────▶ COMMAND
//!     │            ▲  ▲                        │
//!     └── Esc ─────┘  └──── Enter / Esc ───────┘
//! ```
//!
//! Every other bound normal-mode key runs its action with the pending count
//! and lands back in NORMAL. Unbound keys are ignored in every mode; only
//! `q` (or `:q`) ends the session.
//!
//! Resizes go through [`Session::resize`], which touches geometry and the
//! scroll region and nothing else.

use std::io::{self, Write};

use unicode_width::UnicodeWidthChar;
use vtprobe_term::ansi::Direction;
use vtprobe_term::control::Control;
use vtprobe_term::event_loop::{Action, App};
use vtprobe_term::input::{KeyEvent, NamedKey, RawKey};
use vtprobe_term::terminal::Size;

use crate::command::{CommandLine, Invocation};
use crate::config::SessionConfig;
use crate::count::RepeatCount;
use crate::geometry::{Geometry, Screen, fit};
use crate::keymap::{Keymap, NormalAction};
use crate::mode::Mode;

/// One interactive probe session over an output sink.
pub struct Session<W: Write> {
    control: Control<W>,
    geometry: Geometry,
    keymap: Keymap,
    start_row: u16,

    mode: Mode,
    count: RepeatCount,
    /// `Some` exactly while `mode == Mode::Command`.
    cmdline: Option<CommandLine>,
    screen: Screen,
    running: bool,
    last_status: Option<String>,
}

impl<W: Write> Session<W> {
    /// Create a session. Nothing is written until [`start`](Self::start).
    pub fn new(control: Control<W>, config: SessionConfig, size: Size) -> Self {
        Self {
            control,
            geometry: Geometry::new(size, config.top_margin, config.bottom_margin),
            keymap: Keymap::new(),
            start_row: config.start_row,
            mode: Mode::Normal,
            count: RepeatCount::new(),
            cmdline: None,
            screen: Screen::Main,
            running: true,
            last_status: None,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// The pending repeat count, if digits have been typed.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> Option<usize> {
        self.count.peek()
    }

    /// The command line being typed, while in command mode.
    #[must_use]
    pub fn command_line(&self) -> Option<&str> {
        self.cmdline.as_ref().map(CommandLine::input)
    }

    #[inline]
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The status text shown after the last command line ran.
    #[must_use]
    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Set the scroll region, draw the static layout and park the cursor on
    /// the start row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn start(&mut self) -> io::Result<()> {
        let (top, bottom) = self.geometry.scroll_region();
        tracing::info!(
            cols = self.geometry.cols(),
            rows = self.geometry.rows(),
            top,
            bottom,
            "session start"
        );
        self.apply_scroll_region()?;
        self.draw_layout()?;
        let row = self.geometry.clamp_row(self.start_row);
        self.control.move_to(1, row)
    }

    /// Take a new terminal size and re-issue the scroll region.
    ///
    /// Mode, repeat count and command line are left exactly as they were.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn resize(&mut self, size: Size) -> io::Result<()> {
        self.geometry.update(size);
        tracing::debug!(cols = size.cols, rows = size.rows, "geometry updated");
        self.apply_scroll_region()
    }

    /// Interpret one key token in the current mode.
    ///
    /// Returns [`Action::Quit`] once the quit action has run.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn handle_key(&mut self, key: &RawKey) -> io::Result<Action> {
        match self.mode {
            Mode::Normal => self.normal_key(key)?,
            Mode::Insert => self.insert_key(key)?,
            Mode::Command => self.command_key(key)?,
        }
        Ok(if self.running {
            Action::Continue
        } else {
            Action::Quit
        })
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "mode");
            self.mode = mode;
        }
    }

    // ── Normal mode ─────────────────────────────────────────────────

    fn normal_key(&mut self, key: &RawKey) -> io::Result<()> {
        let Some(event) = key.classify() else {
            tracing::trace!(key = %key, "unrecognized sequence");
            return Ok(());
        };

        if let KeyEvent::Digit(d) = event {
            self.count.push_digit(d);
            return Ok(());
        }

        let Some(action) = self.keymap.lookup(&event) else {
            return Ok(());
        };

        let count = self.count.take();
        tracing::debug!(?action, count, "normal action");
        self.run_action(action, count)?;

        // Only the explicit mode switches may leave normal mode.
        if !matches!(action, NormalAction::EnterInsert | NormalAction::EnterCommand) {
            self.set_mode(Mode::Normal);
        }
        Ok(())
    }

    fn run_action(&mut self, action: NormalAction, count: usize) -> io::Result<()> {
        match action {
            NormalAction::ScrollUp => self.control.scroll_up(count),
            NormalAction::ScrollDown => self.control.scroll_down(count),
            NormalAction::DeleteLines => self.control.delete_lines(count),
            NormalAction::ToggleScreen => self.toggle_screen(),
            NormalAction::Redraw => {
                self.control.save_cursor()?;
                self.draw_layout()?;
                self.control.restore_cursor()
            }
            NormalAction::Quit => {
                self.running = false;
                Ok(())
            }
            NormalAction::EnterInsert => {
                self.set_mode(Mode::Insert);
                Ok(())
            }
            NormalAction::EnterCommand => self.enter_command(),
            NormalAction::Cursor(dir) => self.control.move_cursor(dir, count),
            NormalAction::LineEnd => self.control.move_to_column(self.geometry.cols()),
            NormalAction::LineStart => self.control.move_to_column(1),
            NormalAction::SaveCursor => self.control.save_cursor(),
            NormalAction::RestoreCursor => self.control.restore_cursor(),
        }
    }

    fn toggle_screen(&mut self) -> io::Result<()> {
        let alt = !self.screen.is_alt();
        self.control.set_alt_screen(alt)?;
        self.screen = Screen::from_alt(alt);
        self.apply_scroll_region()
    }

    // ── Insert mode ─────────────────────────────────────────────────

    fn insert_key(&mut self, key: &RawKey) -> io::Result<()> {
        if key.is_bare_escape() {
            self.set_mode(Mode::Normal);
            return Ok(());
        }
        self.control.write_text(key.as_str())
    }

    // ── Command mode ────────────────────────────────────────────────

    fn enter_command(&mut self) -> io::Result<()> {
        self.set_mode(Mode::Command);
        self.cmdline = Some(CommandLine::new());
        self.control.save_cursor()?;
        self.write_prompt_row(":")?;
        self.control.move_to_column(2)
    }

    fn command_key(&mut self, key: &RawKey) -> io::Result<()> {
        match key.classify() {
            Some(KeyEvent::Named(NamedKey::Escape)) => self.abort_command(),
            Some(KeyEvent::Named(NamedKey::Newline)) => self.submit_command(),
            Some(KeyEvent::Named(NamedKey::Backspace)) => self.erase_char(),
            Some(KeyEvent::Printable(ch) | KeyEvent::Digit(ch)) if !ch.is_control() => {
                let Some(line) = self.cmdline.as_mut() else {
                    return Ok(());
                };
                line.push(ch);
                let mut buf = [0; 4];
                self.control.write_text(ch.encode_utf8(&mut buf))
            }
            _ => Ok(()),
        }
    }

    fn erase_char(&mut self) -> io::Result<()> {
        let Some(ch) = self.cmdline.as_mut().and_then(CommandLine::backspace) else {
            return Ok(());
        };
        let width = ch.width().unwrap_or(0).max(1);
        self.control.move_cursor(Direction::Left, width)?;
        self.control.write_text(&" ".repeat(width))?;
        self.control.move_cursor(Direction::Left, width)
    }

    fn abort_command(&mut self) -> io::Result<()> {
        self.cmdline = None;
        self.set_mode(Mode::Normal);
        self.write_prompt_row("")?;
        self.control.restore_cursor()
    }

    fn submit_command(&mut self) -> io::Result<()> {
        let line = self.cmdline.take().unwrap_or_default();
        self.set_mode(Mode::Normal);

        let status = match line.parse() {
            Ok(invocation) => {
                self.execute(&invocation)?;
                invocation.status()
            }
            Err(err) => err.to_string(),
        };
        tracing::debug!(line = line.input(), status = %status, "command");

        self.write_prompt_row(&status)?;
        self.control.restore_cursor()?;
        self.last_status = Some(status);
        Ok(())
    }

    fn execute(&mut self, invocation: &Invocation) -> io::Result<()> {
        match invocation {
            Invocation::SetTitle(title) => self.control.set_title(title),
            Invocation::PushTitle => self.control.push_title(),
            Invocation::PopTitle => self.control.pop_title(),
            Invocation::InsertMode(on) => self.control.set_insert_mode(*on),
            Invocation::MouseReport(on) => self.control.set_mouse_report(*on),
            Invocation::Autowrap(on) => self.control.set_autowrap(*on),
            Invocation::AltScreen(on) => {
                self.control.set_alt_screen(*on)?;
                self.screen = Screen::from_alt(*on);
                Ok(())
            }
            Invocation::Quit => {
                self.running = false;
                Ok(())
            }
        }
    }

    // ── Drawing ─────────────────────────────────────────────────────

    fn apply_scroll_region(&mut self) -> io::Result<()> {
        let (top, bottom) = self.geometry.scroll_region();
        self.control.set_scroll_region(top, bottom)
    }

    fn draw_layout(&mut self) -> io::Result<()> {
        for (row, text) in self.geometry.layout(self.screen) {
            self.control.move_to(1, row)?;
            self.control.write_text(&text)?;
        }
        Ok(())
    }

    /// Overwrite the prompt row with `text`, fitted to the width.
    fn write_prompt_row(&mut self, text: &str) -> io::Result<()> {
        let row = self.geometry.prompt_row();
        let line = fit(text, usize::from(self.geometry.cols()));
        self.control.move_to(1, row)?;
        self.control.write_text(&line)
    }
}

// ─── Event loop glue ────────────────────────────────────────────────────────

impl<W: Write> App for Session<W> {
    fn on_start(&mut self, size: Size) -> io::Result<()> {
        self.geometry.update(size);
        self.start()
    }

    fn on_key(&mut self, key: &RawKey) -> io::Result<Action> {
        self.handle_key(key)
    }

    fn on_resize(&mut self, size: Size) -> io::Result<()> {
        self.resize(size)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.control.flush()
    }

    /// Undo every mode the session switched, then leave the cursor on the
    /// last row so the shell prompt lands below the layout.
    fn on_exit(&mut self) -> io::Result<()> {
        tracing::info!(modes = ?self.control.modes(), "session end");
        self.control.reset_modes()?;
        self.control.move_to(1, self.geometry.prompt_row())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vtprobe_term::input::Tokenizer;

    const COLS: u16 = 80;
    const ROWS: u16 = 24;

    fn session() -> Session<Vec<u8>> {
        Session::new(
            Control::new(Vec::new()),
            SessionConfig::default(),
            Size {
                cols: COLS,
                rows: ROWS,
            },
        )
    }

    /// Feed `bytes` as one read, the way the event loop does.
    fn feed(s: &mut Session<Vec<u8>>, bytes: &str) -> Action {
        let mut action = Action::Continue;
        for key in Tokenizer::new().advance(bytes.as_bytes()) {
            action = s.handle_key(&key).unwrap();
            if action == Action::Quit {
                break;
            }
        }
        action
    }

    /// Like `feed`, for reads that are not valid UTF-8.
    fn feed_bytes(s: &mut Session<Vec<u8>>, bytes: &[u8]) {
        for key in Tokenizer::new().advance(bytes) {
            s.handle_key(&key).unwrap();
        }
    }

    /// Drain everything written so far.
    fn output(s: &mut Session<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(s.control.get_mut())).unwrap()
    }

    fn blank_prompt() -> String {
        format!("\x1b[{ROWS};1H{}", " ".repeat(usize::from(COLS)))
    }

    // ── Startup ──────────────────────────────────────────────────────────

    #[test]
    fn start_sets_region_draws_layout_and_parks_cursor() {
        let mut s = session();
        s.start().unwrap();
        let out = output(&mut s);

        assert!(out.starts_with("\x1b[3;21r\x1b[1;1Hmain: Non-Scrolled Top 1 "));
        assert!(out.contains("\x1b[3;1Hline 3 line 3 "));
        assert!(out.contains("\x1b[22;1Hmain: Non-Scrolled Bottom 22 "));
        assert!(out.ends_with("\x1b[10;1H"));
    }

    #[test]
    fn start_row_is_clamped_into_region() {
        let mut s = Session::new(
            Control::new(Vec::new()),
            SessionConfig {
                start_row: 99,
                ..SessionConfig::default()
            },
            Size { cols: 40, rows: 12 },
        );
        s.start().unwrap();
        assert!(output(&mut s).ends_with("\x1b[9;1H"));
    }

    // ── Repeat counts ────────────────────────────────────────────────────

    #[test]
    fn count_prefix_reaches_action() {
        let mut s = session();
        feed(&mut s, "10d");
        assert_eq!(output(&mut s), "\x1b[10T");
    }

    #[test]
    fn no_count_means_one() {
        let mut s = session();
        feed(&mut s, "d");
        assert_eq!(output(&mut s), "\x1b[1T");
    }

    #[test]
    fn count_resets_after_action() {
        let mut s = session();
        feed(&mut s, "5u");
        assert_eq!(s.pending_count(), None);
        feed(&mut s, "u");
        assert_eq!(output(&mut s), "\x1b[5S\x1b[1S");
    }

    #[test]
    fn zero_count_is_one() {
        let mut s = session();
        feed(&mut s, "00x");
        assert_eq!(output(&mut s), "\x1b[1M");
    }

    #[test]
    fn count_survives_unbound_key() {
        let mut s = session();
        feed(&mut s, "3z");
        assert_eq!(s.pending_count(), Some(3));
        feed(&mut s, "j");
        assert_eq!(output(&mut s), "\x1b[3B");
    }

    #[test]
    fn arrows_take_counts_like_letters() {
        let mut s = session();
        feed(&mut s, "4\x1b[C");
        feed(&mut s, "4l");
        assert_eq!(output(&mut s), "\x1b[4C\x1b[4C");
    }

    #[test]
    fn line_end_and_start() {
        let mut s = session();
        feed(&mut s, "$^");
        assert_eq!(output(&mut s), "\x1b[80G\x1b[1G");
    }

    #[test]
    fn count_does_not_carry_into_insert() {
        let mut s = session();
        feed(&mut s, "5i");
        assert_eq!(s.mode(), Mode::Insert);
        assert_eq!(s.pending_count(), None);
    }

    // ── Normal mode misc ─────────────────────────────────────────────────

    #[test]
    fn unbound_and_unrecognized_keys_are_silent() {
        let mut s = session();
        assert_eq!(feed(&mut s, "z\x1bx\x1b[Z"), Action::Continue);
        assert_eq!(output(&mut s), "");
        assert_eq!(s.mode(), Mode::Normal);
    }

    #[test]
    fn toggle_screen_flips_buffer_and_reissues_region() {
        let mut s = session();
        feed(&mut s, "s");
        assert_eq!(output(&mut s), "\x1b[?1047h\x1b[3;21r");
        assert_eq!(s.screen(), Screen::Alt);
        feed(&mut s, "s");
        assert_eq!(output(&mut s), "\x1b[?1047l\x1b[3;21r");
        assert_eq!(s.screen(), Screen::Main);
    }

    #[test]
    fn redraw_uses_current_screen_label() {
        let mut s = session();
        feed(&mut s, "s");
        output(&mut s);
        feed(&mut s, "r");
        let out = output(&mut s);
        assert!(out.starts_with("\x1b[s\x1b[1;1Halt: Non-Scrolled Top 1"));
        assert!(out.ends_with("\x1b[u"));
    }

    #[test]
    fn quit_key() {
        let mut s = session();
        assert_eq!(feed(&mut s, "q"), Action::Quit);
        assert!(!s.is_running());
    }

    #[test]
    fn quit_discards_rest_of_read() {
        let mut s = session();
        assert_eq!(feed(&mut s, "qd"), Action::Quit);
        assert_eq!(output(&mut s), "");
    }

    // ── Command mode ─────────────────────────────────────────────────────

    #[test]
    fn enter_command_draws_prompt() {
        let mut s = session();
        feed(&mut s, ":");
        let expected = format!("\x1b[s\x1b[{ROWS};1H:{}\x1b[2G", " ".repeat(79));
        assert_eq!(output(&mut s), expected);
        assert_eq!(s.mode(), Mode::Command);
        assert_eq!(s.command_line(), Some(""));
    }

    #[test]
    fn command_escape_restores_cursor_and_emits_nothing_else() {
        let mut s = session();
        feed(&mut s, ":altscreen=on");
        output(&mut s);

        feed(&mut s, "\x1b");
        assert_eq!(output(&mut s), format!("{}\x1b[u", blank_prompt()));
        assert_eq!(s.mode(), Mode::Normal);
        assert_eq!(s.command_line(), None);
        assert_eq!(s.screen(), Screen::Main);
    }

    #[test]
    fn command_keys_are_echoed_not_run() {
        let mut s = session();
        feed(&mut s, ":");
        output(&mut s);
        feed(&mut s, "q5d");
        assert_eq!(output(&mut s), "q5d");
        assert!(s.is_running());
        assert_eq!(s.command_line(), Some("q5d"));
    }

    #[test]
    fn altscreen_on_emits_switch_once() {
        let mut s = session();
        feed(&mut s, ":altscreen=on\n");
        let out = output(&mut s);

        assert_eq!(out.matches("\x1b[?1047h").count(), 1);
        assert_eq!(s.last_status(), Some("altscreen on"));
        assert_eq!(s.screen(), Screen::Alt);
        assert_eq!(s.mode(), Mode::Normal);
        assert!(out.ends_with("\x1b[u"));
    }

    #[test]
    fn altscreen_bad_value_emits_nothing() {
        let mut s = session();
        feed(&mut s, ":altscreen=bogus\n");
        let out = output(&mut s);

        assert!(!out.contains("\x1b[?1047"));
        assert_eq!(s.last_status(), Some("bad value for altscreen"));
        assert_eq!(s.screen(), Screen::Main);
        assert_eq!(s.mode(), Mode::Normal);
    }

    #[test]
    fn status_is_written_on_prompt_row() {
        let mut s = session();
        feed(&mut s, ":autowrap=off");
        output(&mut s);
        feed(&mut s, "\n");
        let status = format!("autowrap off{}", " ".repeat(68));
        assert_eq!(
            output(&mut s),
            format!("\x1b[?7l\x1b[{ROWS};1H{status}\x1b[u")
        );
    }

    #[test]
    fn unknown_command_status() {
        let mut s = session();
        feed(&mut s, ":frobnicate\n");
        assert_eq!(s.last_status(), Some("unknown command"));
        feed(&mut s, ":\n");
        assert_eq!(s.last_status(), Some("unknown command"));
    }

    #[test]
    fn backspace_on_empty_line_is_noop() {
        let mut s = session();
        feed(&mut s, ":");
        output(&mut s);

        feed(&mut s, "\x7f");
        assert_eq!(output(&mut s), "");
        assert_eq!(s.mode(), Mode::Command);
        assert_eq!(s.command_line(), Some(""));
    }

    #[test]
    fn backspace_erases_last_char() {
        let mut s = session();
        feed(&mut s, ":ab");
        output(&mut s);

        feed(&mut s, "\x7f");
        assert_eq!(output(&mut s), "\x1b[1D \x1b[1D");
        assert_eq!(s.command_line(), Some("a"));
    }

    #[test]
    fn backspace_erases_wide_char_by_width() {
        let mut s = session();
        feed(&mut s, ":日");
        output(&mut s);

        feed(&mut s, "\x7f");
        assert_eq!(output(&mut s), "\x1b[2D  \x1b[2D");
    }

    #[test]
    fn control_characters_are_not_appended_or_echoed() {
        let mut s = session();
        feed(&mut s, ":a");
        output(&mut s);

        feed(&mut s, "\t");
        assert_eq!(output(&mut s), "");
        assert_eq!(s.command_line(), Some("a"));
        assert_eq!(s.mode(), Mode::Command);
    }

    #[test]
    fn escape_with_bad_byte_does_not_abort_command_line() {
        let mut s = session();
        feed(&mut s, ":a");
        feed_bytes(&mut s, b"\x1b\xffb");
        assert_eq!(s.mode(), Mode::Command);
        assert_eq!(s.command_line(), Some("ab"));
    }

    #[test]
    fn arrows_are_ignored_in_command_line() {
        let mut s = session();
        feed(&mut s, ":a\x1b[D");
        assert_eq!(s.command_line(), Some("a"));
    }

    #[test]
    fn title_round_trip_emits_each_sequence_once() {
        let mut s = session();
        feed(&mut s, ":set-title=foo\n");
        feed(&mut s, ":push-title\n");
        feed(&mut s, ":pop-title\n");
        let out = output(&mut s);

        for seq in ["\x1b]2;foo\x07", "\x1b[22;2t", "\x1b[23;2t"] {
            assert_eq!(out.matches(seq).count(), 1, "{seq:?}");
        }
        assert_eq!(out.matches("\x1b]2;").count(), 1);

        let set = out.find("\x1b]2;foo\x07").unwrap();
        let push = out.find("\x1b[22;2t").unwrap();
        let pop = out.find("\x1b[23;2t").unwrap();
        assert!(set < push && push < pop);
        assert_eq!(s.last_status(), Some("title popped"));
    }

    #[test]
    fn quit_command() {
        let mut s = session();
        assert_eq!(feed(&mut s, ":q\n"), Action::Quit);
        assert!(!s.is_running());
    }

    // ── Insert mode ──────────────────────────────────────────────────────

    #[test]
    fn insert_echoes_everything_literally() {
        let mut s = session();
        feed(&mut s, "i");
        feed(&mut s, "10dq:\x1b[A");
        assert_eq!(output(&mut s), "10dq:\x1b[A");
        assert_eq!(s.mode(), Mode::Insert);
        assert!(s.is_running());
    }

    #[test]
    fn bare_escape_leaves_insert() {
        let mut s = session();
        feed(&mut s, "ix");
        feed(&mut s, "\x1b");
        assert_eq!(s.mode(), Mode::Normal);
        feed(&mut s, "d");
        assert_eq!(output(&mut s), "x\x1b[1T");
    }

    #[test]
    fn escape_with_bad_byte_stays_in_insert() {
        let mut s = session();
        feed(&mut s, "i");
        feed_bytes(&mut s, b"\x1b\xffabc");
        assert_eq!(s.mode(), Mode::Insert);
        assert_eq!(output(&mut s), "\x1b\u{fffd}abc");
    }

    // ── Resize ───────────────────────────────────────────────────────────

    #[test]
    fn resize_only_touches_geometry() {
        let mut s = session();
        feed(&mut s, "12");
        s.resize(Size { cols: 100, rows: 40 }).unwrap();

        assert_eq!(output(&mut s), "\x1b[3;37r");
        assert_eq!(s.pending_count(), Some(12));
        assert_eq!(s.mode(), Mode::Normal);

        feed(&mut s, "d");
        assert_eq!(output(&mut s), "\x1b[12T");
    }

    #[test]
    fn resize_mid_command_keeps_command_line() {
        let mut s = session();
        feed(&mut s, ":alt");
        s.resize(Size { cols: 60, rows: 20 }).unwrap();

        assert_eq!(s.mode(), Mode::Command);
        assert_eq!(s.command_line(), Some("alt"));

        feed(&mut s, "screen=on\n");
        assert_eq!(s.last_status(), Some("altscreen on"));
        assert_eq!(s.geometry().prompt_row(), 20);
    }

    // ── Exit ─────────────────────────────────────────────────────────────

    #[test]
    fn exit_undoes_switched_modes() {
        let mut s = session();
        s.start().unwrap();
        feed(&mut s, ":mouse-report=on\n");
        feed(&mut s, "s");
        output(&mut s);

        s.on_exit().unwrap();
        assert_eq!(
            output(&mut s),
            format!("\x1b[?1003l\x1b[r\x1b[?1047l\x1b[{ROWS};1H")
        );
    }

    #[test]
    fn exit_after_nothing_changed_only_moves_cursor() {
        let mut s = session();
        s.on_exit().unwrap();
        assert_eq!(output(&mut s), format!("\x1b[{ROWS};1H"));
    }
}
