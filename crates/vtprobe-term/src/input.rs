// SPDX-License-Identifier: MIT
//
// Key input — splitting raw stdin bytes into key tokens and classifying them.
//
// Two stages, kept separate so each is trivially testable:
//
//   Tokenizer — stateful. Takes whatever bytes one `read()` returned and cuts
//   them into `RawKey` tokens: one character each, except that an ESC claims
//   the bytes that may follow it (`ESC [ x` or `ESC x`). The only thing it
//   ever holds back between reads is an incomplete UTF-8 character.
//
//   classify — pure. Maps one token to at most one `KeyEvent`.
//
// # The ESC ambiguity
//
// A lone ESC at the end of a read is the Escape key, immediately; there is
// no timeout and no look-ahead across reads. An ESC followed by more bytes in
// the same read is always treated as the start of a sequence: `ESC [ A..D`
// are the arrows, anything else is swallowed as an unrecognized sequence.
// So "Escape then `x` typed fast enough to share a read" loses both keys, and
// an arrow split across two reads degrades to Escape plus two printables.
// This is deliberate: the probe reports what the terminal sent, and does not
// guess at what the user meant.

use std::fmt;

const ESC: u8 = 0x1B;
const DEL: u8 = 0x7F;

// ─── Key Events ─────────────────────────────────────────────────────────────

/// The fixed set of named, non-printable keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Newline,
    Backspace,
}

impl NamedKey {
    /// Stable token name, used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ArrowUp => "arrow-up",
            Self::ArrowDown => "arrow-down",
            Self::ArrowLeft => "arrow-left",
            Self::ArrowRight => "arrow-right",
            Self::Escape => "escape",
            Self::Newline => "newline",
            Self::Backspace => "backspace",
        }
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classified key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// Any single character that is not a digit or a named key. Doubles as a
    /// literal command key in the normal-mode keymap.
    Printable(char),
    /// An ASCII digit `0`–`9`.
    Digit(char),
    /// A named key.
    Named(NamedKey),
}

// ─── Raw Key Tokens ─────────────────────────────────────────────────────────

/// One key token exactly as it arrived: a single character, or an
/// ESC-introduced sequence of up to three characters.
///
/// Insert mode echoes the token text verbatim; every other mode goes
/// through [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawKey(String);

impl RawKey {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The token text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for a bare ESC with nothing following it in the same read.
    #[inline]
    #[must_use]
    pub fn is_bare_escape(&self) -> bool {
        self.0.as_bytes() == [ESC]
    }

    /// Classify this token. See [`classify`].
    #[inline]
    #[must_use]
    pub fn classify(&self) -> Option<KeyEvent> {
        classify(&self.0)
    }
}

impl From<&str> for RawKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RawKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.escape_debug().to_string())
    }
}

// ─── Classifier ─────────────────────────────────────────────────────────────

/// Classify one raw token into at most one key event.
///
/// - bare ESC → `Named(Escape)`
/// - `ESC [ A|B|C|D` → arrow up / down / right / left
/// - any other ESC-introduced token → `None`
/// - `\n` → `Named(Newline)`, `0x7F` → `Named(Backspace)`
/// - an ASCII digit → `Digit`
/// - any other single character → `Printable`
/// - any other multi-character token → `None`
#[must_use]
pub fn classify(token: &str) -> Option<KeyEvent> {
    let mut chars = token.chars();
    let first = chars.next()?;

    if first == char::from(ESC) {
        return match (chars.next(), chars.next(), chars.next()) {
            (None, _, _) => Some(KeyEvent::Named(NamedKey::Escape)),
            (Some('['), Some(dir), None) => arrow(dir).map(KeyEvent::Named),
            _ => None,
        };
    }

    if chars.next().is_some() {
        return None;
    }

    Some(match first {
        '\n' => KeyEvent::Named(NamedKey::Newline),
        c if c == char::from(DEL) => KeyEvent::Named(NamedKey::Backspace),
        c if c.is_ascii_digit() => KeyEvent::Digit(c),
        c => KeyEvent::Printable(c),
    })
}

const fn arrow(final_char: char) -> Option<NamedKey> {
    match final_char {
        'A' => Some(NamedKey::ArrowUp),
        'B' => Some(NamedKey::ArrowDown),
        'C' => Some(NamedKey::ArrowRight),
        'D' => Some(NamedKey::ArrowLeft),
        _ => None,
    }
}

// ─── Tokenizer ──────────────────────────────────────────────────────────────

/// Splits raw stdin chunks into key tokens.
///
/// Feed each chunk to [`advance`](Self::advance) as it arrives. A UTF-8
/// character split across two reads is held back and completed by the next
/// chunk; nothing else is ever buffered.
#[derive(Debug, Default)]
pub struct Tokenizer {
    pending: Vec<u8>,
}

impl Tokenizer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Are there bytes of an incomplete character waiting for more input?
    #[inline]
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Cut `data` (prefixed by any pending bytes) into tokens.
    pub fn advance(&mut self, data: &[u8]) -> Vec<RawKey> {
        self.pending.extend_from_slice(data);
        let buf = std::mem::take(&mut self.pending);

        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < buf.len() {
            if buf[pos] == ESC {
                let (key, consumed) = escape_token(&buf[pos..]);
                keys.push(key);
                pos += consumed;
                continue;
            }

            match decode_char(&buf[pos..]) {
                Decoded::Char(ch, len) => {
                    keys.push(RawKey(ch.to_string()));
                    pos += len;
                }
                Decoded::Incomplete => {
                    self.pending.extend_from_slice(&buf[pos..]);
                    break;
                }
                Decoded::Invalid => {
                    keys.push(RawKey(char::REPLACEMENT_CHARACTER.to_string()));
                    pos += 1;
                }
            }
        }

        keys
    }
}

/// Build the token starting at an ESC byte: the ESC plus up to two following
/// characters (`ESC [ x`), or one (`ESC x`), or none (bare).
fn escape_token(buf: &[u8]) -> (RawKey, usize) {
    debug_assert_eq!(buf.first(), Some(&ESC));

    let mut text = String::from(char::from(ESC));
    let mut pos = 1;
    let claim = if buf.get(1) == Some(&b'[') { 2 } else { 1 };

    for _ in 0..claim {
        match buf.get(pos) {
            Some(&b) if b == ESC => break,
            Some(_) => match decode_char(&buf[pos..]) {
                Decoded::Char(ch, len) => {
                    text.push(ch);
                    pos += len;
                }
                Decoded::Incomplete | Decoded::Invalid => {
                    // The bad byte ends the sequence but stays in it, so the
                    // token can never pass for a bare ESC.
                    text.push(char::REPLACEMENT_CHARACTER);
                    pos += 1;
                    break;
                }
            },
            None => break,
        }
    }

    (RawKey(text), pos)
}

enum Decoded {
    Char(char, usize),
    Incomplete,
    Invalid,
}

fn decode_char(buf: &[u8]) -> Decoded {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Decoded::Invalid;
    }
    if buf.len() < expected {
        return Decoded::Incomplete;
    }
    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Decoded::Invalid, |ch| Decoded::Char(ch, expected))
}

/// Expected UTF-8 sequence length from the lead byte, 0 if invalid.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
