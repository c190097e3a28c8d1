#![forbid(unsafe_code)]

//! Layout units and measured sizes.

/// Device-independent layout unit (1/1440 inch).
///
/// Signed because paint cursors move backwards in counter-flow and
/// bottom-to-top layouts.
pub type Twips = i32;

/// Number of source characters consumed by a fragment.
pub type TextLen = usize;

/// Width and height of a laid-out fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PortionSize {
    /// Horizontal extent in twips.
    pub width: Twips,
    /// Vertical extent in twips.
    pub height: Twips,
}

impl PortionSize {
    /// Zero size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: Twips, height: Twips) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero or negative.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// Vertical metrics reported by a measurement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Metrics {
    /// Advance width.
    pub width: Twips,
    /// Line height.
    pub height: Twips,
    /// Distance from the top of the line box to the baseline.
    pub ascent: Twips,
}

impl Metrics {
    /// All-zero metrics.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Create new metrics.
    #[inline]
    pub const fn new(width: Twips, height: Twips, ascent: Twips) -> Self {
        Self {
            width,
            height,
            ascent,
        }
    }

    /// The width/height pair.
    #[inline]
    pub const fn size(&self) -> PortionSize {
        PortionSize::new(self.width, self.height)
    }
}
