#![forbid(unsafe_code)]

//! Writing and paint directions.
//!
//! A frame has a base writing direction (left-to-right or right-to-left).
//! Painting walks a line in one of four quadrant directions. When the frame
//! and paint directions disagree horizontally the paint cursor runs against
//! the frame ("counter-flow") and moves towards smaller x.

/// Resolved text direction of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextDirection {
    /// Left-to-right.
    #[default]
    Ltr,
    /// Right-to-left.
    Rtl,
}

impl TextDirection {
    /// Whether this is right-to-left.
    #[inline]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Requested frame direction, possibly left to auto-detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameDirection {
    /// Detect from the first strong directional character.
    #[default]
    Auto,
    /// Force left-to-right.
    Ltr,
    /// Force right-to-left.
    Rtl,
}

impl FrameDirection {
    /// Parse a configuration value (`auto`, `ltr`, `rtl`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" | "a" => Some(Self::Auto),
            "ltr" | "l" | "left-to-right" => Some(Self::Ltr),
            "rtl" | "r" | "right-to-left" => Some(Self::Rtl),
            _ => None,
        }
    }

    /// The forced direction, if any.
    #[inline]
    pub const fn forced(self) -> Option<TextDirection> {
        match self {
            Self::Auto => None,
            Self::Ltr => Some(TextDirection::Ltr),
            Self::Rtl => Some(TextDirection::Rtl),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

/// Direction in which a line is painted, as a quadrant angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaintDirection {
    /// 0 degrees.
    #[default]
    LeftToRight,
    /// 90 degrees.
    BottomToTop,
    /// 180 degrees.
    RightToLeft,
    /// 270 degrees.
    TopToBottom,
}

impl PaintDirection {
    /// Map an angle in degrees to a quadrant direction.
    ///
    /// Angles are normalised into `0..360`; anything that is not a multiple
    /// of 90 is rejected.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::LeftToRight),
            90 => Some(Self::BottomToTop),
            180 => Some(Self::RightToLeft),
            270 => Some(Self::TopToBottom),
            _ => None,
        }
    }

    /// Quadrant angle in degrees.
    #[inline]
    pub const fn degrees(self) -> i32 {
        match self {
            Self::LeftToRight => 0,
            Self::BottomToTop => 90,
            Self::RightToLeft => 180,
            Self::TopToBottom => 270,
        }
    }

    /// Vertical text layout: the cursor moves along y.
    #[inline]
    pub const fn is_rotated(self) -> bool {
        matches!(self, Self::BottomToTop | Self::TopToBottom)
    }

    /// Parse a configuration value (`ltr`, `rtl`, `btt`, `ttb` or an angle).
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        match value.as_str() {
            "ltr" | "left-to-right" => Some(Self::LeftToRight),
            "btt" | "bottom-to-top" => Some(Self::BottomToTop),
            "rtl" | "right-to-left" => Some(Self::RightToLeft),
            "ttb" | "top-to-bottom" => Some(Self::TopToBottom),
            other => other.parse::<i32>().ok().and_then(Self::from_degrees),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeftToRight => "ltr",
            Self::BottomToTop => "btt",
            Self::RightToLeft => "rtl",
            Self::TopToBottom => "ttb",
        }
    }

    /// Paint direction that follows a frame's natural flow.
    #[inline]
    pub const fn natural(frame: TextDirection) -> Self {
        match frame {
            TextDirection::Ltr => Self::LeftToRight,
            TextDirection::Rtl => Self::RightToLeft,
        }
    }
}

/// Whether painting in `paint` runs against a frame of direction `frame`.
///
/// Only the horizontal directions can be counter-flow; rotated painting is
/// handled on the y axis.
#[inline]
pub const fn is_counter_flow(frame: TextDirection, paint: PaintDirection) -> bool {
    match (frame, paint) {
        (TextDirection::Ltr, PaintDirection::RightToLeft) => true,
        (TextDirection::Rtl, PaintDirection::LeftToRight) => true,
        _ => false,
    }
}
