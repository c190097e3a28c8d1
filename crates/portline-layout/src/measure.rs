#![forbid(unsafe_code)]

//! Text measurement seam.
//!
//! Shaping and font metrics live outside this crate. Layout asks a
//! [`Measurer`] for the box a piece of text occupies and never looks at
//! glyphs itself.

use portline_core::geometry::{Metrics, Twips};
use unicode_width::UnicodeWidthStr;

/// Maps text to its measured box.
pub trait Measurer {
    /// Measure `text` as one unbroken run.
    fn measure(&self, text: &str) -> Metrics;

    /// Advance of a single blank.
    fn blank_width(&self) -> Twips {
        self.measure(" ").width
    }
}

impl<M: Measurer + ?Sized> Measurer for &M {
    fn measure(&self, text: &str) -> Metrics {
        (**self).measure(text)
    }

    fn blank_width(&self) -> Twips {
        (**self).blank_width()
    }
}

/// Fixed-pitch measurement: every terminal cell gets the same advance.
///
/// Wide (CJK, emoji) characters take two cells and combining marks none,
/// following `unicode-width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMeasurer {
    /// Advance per cell.
    pub advance: Twips,
    /// Line height.
    pub height: Twips,
    /// Baseline offset from the top.
    pub ascent: Twips,
}

impl MonospaceMeasurer {
    /// Create a measurer with explicit metrics.
    #[must_use]
    pub const fn new(advance: Twips, height: Twips, ascent: Twips) -> Self {
        Self {
            advance,
            height,
            ascent,
        }
    }

    /// Cells occupied by `text`.
    #[must_use]
    pub fn cells(text: &str) -> usize {
        if text.is_ascii() {
            return text.bytes().filter(|b| !b.is_ascii_control()).count();
        }
        text.width()
    }
}

impl Default for MonospaceMeasurer {
    /// 10pt fixed pitch: 6pt advance on a 12pt line.
    fn default() -> Self {
        Self::new(120, 240, 190)
    }
}

impl Measurer for MonospaceMeasurer {
    fn measure(&self, text: &str) -> Metrics {
        let cells = Twips::try_from(Self::cells(text)).unwrap_or(Twips::MAX);
        Metrics::new(cells.saturating_mul(self.advance), self.height, self.ascent)
    }

    fn blank_width(&self) -> Twips {
        self.advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_one_cell_per_char() {
        let m = MonospaceMeasurer::new(10, 20, 15);
        assert_eq!(m.measure("hello").width, 50);
        assert_eq!(m.measure("").width, 0);
        assert_eq!(m.measure("ab").height, 20);
        assert_eq!(m.measure("ab").ascent, 15);
    }

    #[test]
    fn wide_chars_take_two_cells() {
        let m = MonospaceMeasurer::new(10, 20, 15);
        assert_eq!(m.measure("\u{4E2D}\u{6587}").width, 40);
    }

    #[test]
    fn combining_marks_take_no_cell() {
        assert_eq!(MonospaceMeasurer::cells("e\u{0301}"), 1);
    }

    #[test]
    fn blank_width_is_one_advance() {
        let m = MonospaceMeasurer::default();
        assert_eq!(m.blank_width(), 120);
        assert_eq!((&m).blank_width(), 120);
    }
}
