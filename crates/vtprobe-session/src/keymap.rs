//! Normal-mode key bindings.
//!
//! The bindings are a fixed table from [`KeyEvent`] to [`NormalAction`]. The
//! table is built once and never changes; [`NormalAction::ALL`] plus the
//! tests guarantee that every action is reachable from at least one key.
//!
//! | Key             | Action                        | Uses count |
//! |-----------------|-------------------------------|------------|
//! | `u` / `d`       | scroll region up / down       | yes        |
//! | `x`             | delete lines                  | yes        |
//! | `h` `j` `k` `l` | cursor left / down / up / right | yes      |
//! | arrows          | same as `h` `j` `k` `l`       | yes        |
//! | `$` / `^`       | cursor to end / start of line | no         |
//! | `S` / `R`       | save / restore cursor         | no         |
//! | `s`             | toggle main / alt screen      | no         |
//! | `r`             | redraw the static layout      | no         |
//! | `i`             | enter insert mode             | no         |
//! | `:`             | enter command mode            | no         |
//! | `q`             | quit                          | no         |

use vtprobe_term::ansi::Direction;
use vtprobe_term::input::{KeyEvent, NamedKey};

/// Everything a normal-mode key can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalAction {
    ScrollUp,
    ScrollDown,
    DeleteLines,
    ToggleScreen,
    Redraw,
    Quit,
    EnterInsert,
    EnterCommand,
    Cursor(Direction),
    LineEnd,
    LineStart,
    SaveCursor,
    RestoreCursor,
}

impl NormalAction {
    /// Every action, for exhaustiveness checks.
    pub const ALL: [Self; 16] = [
        Self::ScrollUp,
        Self::ScrollDown,
        Self::DeleteLines,
        Self::ToggleScreen,
        Self::Redraw,
        Self::Quit,
        Self::EnterInsert,
        Self::EnterCommand,
        Self::Cursor(Direction::Up),
        Self::Cursor(Direction::Down),
        Self::Cursor(Direction::Left),
        Self::Cursor(Direction::Right),
        Self::LineEnd,
        Self::LineStart,
        Self::SaveCursor,
        Self::RestoreCursor,
    ];
}

const fn key(c: char) -> KeyEvent {
    KeyEvent::Printable(c)
}

const fn named(k: NamedKey) -> KeyEvent {
    KeyEvent::Named(k)
}

#[rustfmt::skip]
const DEFAULT_BINDINGS: &[(KeyEvent, NormalAction)] = &[
    (key('u'), NormalAction::ScrollUp),
    (key('d'), NormalAction::ScrollDown),
    (key('x'), NormalAction::DeleteLines),
    (key('s'), NormalAction::ToggleScreen),
    (key('r'), NormalAction::Redraw),
    (key('q'), NormalAction::Quit),
    (key('i'), NormalAction::EnterInsert),
    (key(':'), NormalAction::EnterCommand),
    (key('h'), NormalAction::Cursor(Direction::Left)),
    (key('j'), NormalAction::Cursor(Direction::Down)),
    (key('k'), NormalAction::Cursor(Direction::Up)),
    (key('l'), NormalAction::Cursor(Direction::Right)),
    (key('$'), NormalAction::LineEnd),
    (key('^'), NormalAction::LineStart),
    (key('S'), NormalAction::SaveCursor),
    (key('R'), NormalAction::RestoreCursor),
    (named(NamedKey::ArrowLeft),  NormalAction::Cursor(Direction::Left)),
    (named(NamedKey::ArrowDown),  NormalAction::Cursor(Direction::Down)),
    (named(NamedKey::ArrowUp),    NormalAction::Cursor(Direction::Up)),
    (named(NamedKey::ArrowRight), NormalAction::Cursor(Direction::Right)),
];

/// Immutable normal-mode key table.
#[derive(Debug, Clone, Copy)]
pub struct Keymap {
    bindings: &'static [(KeyEvent, NormalAction)],
}

impl Keymap {
    /// The built-in bindings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS,
        }
    }

    /// The action bound to `event`, if any. Digits are never bound.
    #[must_use]
    pub fn lookup(&self, event: &KeyEvent) -> Option<NormalAction> {
        self.bindings
            .iter()
            .find(|(k, _)| k == event)
            .map(|&(_, action)| action)
    }

    /// All bindings in table order.
    pub fn iter(&self) -> impl Iterator<Item = &(KeyEvent, NormalAction)> {
        self.bindings.iter()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_action_is_bound() {
        let km = Keymap::new();
        for action in NormalAction::ALL {
            assert!(
                km.iter().any(|&(_, a)| a == action),
                "{action:?} has no key"
            );
        }
    }

    #[test]
    fn no_key_is_bound_twice() {
        let mut seen = HashSet::new();
        for (k, _) in Keymap::new().iter() {
            assert!(seen.insert(*k), "{k:?} bound twice");
        }
    }

    #[test]
    fn letters_and_arrows_agree() {
        let km = Keymap::new();
        let pairs = [
            ('h', NamedKey::ArrowLeft),
            ('j', NamedKey::ArrowDown),
            ('k', NamedKey::ArrowUp),
            ('l', NamedKey::ArrowRight),
        ];
        for (letter, arrow) in pairs {
            assert_eq!(
                km.lookup(&KeyEvent::Printable(letter)),
                km.lookup(&KeyEvent::Named(arrow))
            );
        }
    }

    #[test]
    fn lookup_known_keys() {
        let km = Keymap::new();
        assert_eq!(
            km.lookup(&KeyEvent::Printable('d')),
            Some(NormalAction::ScrollDown)
        );
        assert_eq!(
            km.lookup(&KeyEvent::Printable(':')),
            Some(NormalAction::EnterCommand)
        );
        assert_eq!(
            km.lookup(&KeyEvent::Printable('S')),
            Some(NormalAction::SaveCursor)
        );
    }

    #[test]
    fn unbound_keys() {
        let km = Keymap::new();
        assert_eq!(km.lookup(&KeyEvent::Printable('z')), None);
        assert_eq!(km.lookup(&KeyEvent::Digit('1')), None);
        assert_eq!(km.lookup(&KeyEvent::Named(NamedKey::Escape)), None);
        assert_eq!(km.lookup(&KeyEvent::Named(NamedKey::Newline)), None);
    }
}
