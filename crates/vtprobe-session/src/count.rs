//! Repeat-count accumulator for normal mode.
//!
//! Digits typed before a bound key build a decimal number left to right
//! (`1`, `0` → 10). The next action consumes it with [`RepeatCount::take`],
//! which always yields a positive value: no digits, or only zeros, mean 1.

/// Pending numeric prefix.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepeatCount {
    /// `None` until the first digit arrives.
    value: Option<usize>,
}

impl RepeatCount {
    #[must_use]
    pub const fn new() -> Self {
        Self { value: None }
    }

    /// Append one decimal digit. Non-digits are ignored. Saturates instead
    /// of overflowing when someone leans on the keyboard.
    pub fn push_digit(&mut self, digit: char) {
        let Some(d) = digit.to_digit(10) else {
            return;
        };
        let current = self.value.unwrap_or(0);
        self.value = Some(current.saturating_mul(10).saturating_add(d as usize));
    }

    /// The effective count without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<usize> {
        self.value.filter(|&n| n > 0)
    }

    /// Consume the count, defaulting to 1.
    pub fn take(&mut self) -> usize {
        self.value.take().filter(|&n| n > 0).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(digits: &str) -> RepeatCount {
        let mut c = RepeatCount::new();
        for d in digits.chars() {
            c.push_digit(d);
        }
        c
    }

    #[test]
    fn empty_defaults_to_one() {
        let mut c = RepeatCount::new();
        assert_eq!(c.peek(), None);
        assert_eq!(c.take(), 1);
    }

    #[test]
    fn digits_concatenate() {
        assert_eq!(typed("10").take(), 10);
        assert_eq!(typed("123").take(), 123);
    }

    #[test]
    fn take_resets() {
        let mut c = typed("7");
        assert_eq!(c.take(), 7);
        assert_eq!(c.peek(), None);
        assert_eq!(c.take(), 1);
    }

    #[test]
    fn zero_is_never_a_count() {
        assert_eq!(typed("0").take(), 1);
        assert_eq!(typed("000").take(), 1);
        assert_eq!(typed("0").peek(), None);
    }

    #[test]
    fn leading_zero_is_harmless() {
        assert_eq!(typed("05").take(), 5);
    }

    #[test]
    fn saturates() {
        let mut c = typed(&"9".repeat(40));
        assert_eq!(c.take(), usize::MAX);
    }

    #[test]
    fn non_digit_ignored() {
        assert_eq!(typed("1x2").take(), 12);
    }
}
