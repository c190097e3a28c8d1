#![forbid(unsafe_code)]

//! Line portions: the fragments one visual line is made of.
//!
//! A [`Portion`] consumes a run of source characters (its length) and
//! occupies a measured box (width, height, ascent). What it represents is a
//! closed set of [`PortionKind`]s; behavior that differs between kinds is a
//! `match` on the kind rather than a trait object.

use bitflags::bitflags;
use portline_core::geometry::{Metrics, PortionSize, TextLen, Twips};
use smallvec::SmallVec;

use crate::chain::PortionChain;

bitflags! {
    /// Rendering flags shared by all portion kinds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PortionFlags: u8 {
        /// Merge the left border with the previous portion's.
        const JOIN_BORDER_WITH_PREV = 1 << 0;
        /// Merge the right border with the next portion's.
        const JOIN_BORDER_WITH_NEXT = 1 << 1;
    }
}

/// What a portion represents.
#[derive(Debug, Clone, PartialEq)]
pub enum PortionKind {
    /// Ordinary text. `blanks` counts the stretchable inter-word blanks
    /// inside the portion.
    Text { blanks: u16 },
    /// Trailing blanks absorbed at the end of a line. Zero width.
    Hole,
    /// Tabulator advancing to `stop`.
    Tab { stop: Twips },
    /// Fixed margin or indent.
    Margin,
    /// Fixed-size inline object.
    Fly,
    /// Kerning adjustment. Never breaks a line on its own.
    Kern,
    /// Zero-length anchor (bookmark, comment).
    Marker,
    /// Hard line break.
    Break,
    /// Container laying out several rows inside one portion.
    Multi(Box<MultiPortion>),
}

impl PortionKind {
    /// Short lowercase name, used in dumps and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Hole => "hole",
            Self::Tab { .. } => "tab",
            Self::Margin => "margin",
            Self::Fly => "fly",
            Self::Kern => "kern",
            Self::Marker => "marker",
            Self::Break => "break",
            Self::Multi(_) => "multi",
        }
    }
}

/// Rows of a multi-line container portion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPortion {
    rows: SmallVec<[PortionChain; 2]>,
    has_tabulator: bool,
}

impl MultiPortion {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row.
    #[must_use]
    pub fn with_row(mut self, row: PortionChain) -> Self {
        self.rows.push(row);
        self
    }

    /// Mark that one of the rows contains a tab stop.
    #[must_use]
    pub fn with_tabulator(mut self, has_tabulator: bool) -> Self {
        self.has_tabulator = has_tabulator;
        self
    }

    /// Rows in top-to-bottom order.
    pub fn rows(&self) -> &[PortionChain] {
        &self.rows
    }

    /// Whether a row carries a tab stop.
    pub fn has_tabulator(&self) -> bool {
        self.has_tabulator
    }

    /// Characters consumed by all rows together.
    pub fn text_len(&self) -> TextLen {
        self.rows.iter().map(PortionChain::text_len).sum()
    }

    /// Total stretchable blanks in all rows.
    pub fn blanks(&self) -> u32 {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|(_, portion)| portion.blanks())
            .sum()
    }

    /// Size of the container: the widest row by the stacked row heights.
    /// The ascent is that of the first row.
    pub fn calc_size(&self) -> Metrics {
        let mut metrics = Metrics::ZERO;
        for (i, row) in self.rows.iter().enumerate() {
            let (height, ascent) = row
                .iter()
                .fold((0, 0), |(h, a), (_, p)| (h.max(p.height()), a.max(p.ascent())));
            metrics.width = metrics.width.max(row.width());
            metrics.height = metrics.height.saturating_add(height);
            if i == 0 {
                metrics.ascent = ascent;
            }
        }
        metrics
    }
}

/// One fragment of a visual line.
#[derive(Debug, Clone, PartialEq)]
pub struct Portion {
    len: TextLen,
    size: PortionSize,
    ascent: Twips,
    kind: PortionKind,
    flags: PortionFlags,
}

impl Portion {
    /// Create an unmeasured portion.
    #[must_use]
    pub fn new(kind: PortionKind, len: TextLen) -> Self {
        Self {
            len,
            size: PortionSize::ZERO,
            ascent: 0,
            kind,
            flags: PortionFlags::empty(),
        }
    }

    /// Text portion of `len` characters containing `blanks` stretchable blanks.
    #[must_use]
    pub fn text(len: TextLen, blanks: u16) -> Self {
        Self::new(PortionKind::Text { blanks }, len)
    }

    /// Hole absorbing `len` trailing blanks.
    #[must_use]
    pub fn hole(len: TextLen) -> Self {
        Self::new(PortionKind::Hole, len)
    }

    /// Tabulator consuming one character and ending at `stop`.
    #[must_use]
    pub fn tab(stop: Twips) -> Self {
        Self::new(PortionKind::Tab { stop }, 1)
    }

    /// Margin of the given width.
    #[must_use]
    pub fn margin(width: Twips) -> Self {
        Self::new(PortionKind::Margin, 0).with_width(width)
    }

    /// Inline object anchored at one character.
    #[must_use]
    pub fn fly(metrics: Metrics) -> Self {
        Self::new(PortionKind::Fly, 1).with_metrics(metrics)
    }

    /// Kerning adjustment of the given width.
    #[must_use]
    pub fn kern(width: Twips) -> Self {
        Self::new(PortionKind::Kern, 0).with_width(width)
    }

    /// Zero-length marker.
    #[must_use]
    pub fn marker() -> Self {
        Self::new(PortionKind::Marker, 0)
    }

    /// Hard line break consuming one character.
    #[must_use]
    pub fn line_break() -> Self {
        Self::new(PortionKind::Break, 1)
    }

    /// Multi-line container, sized from its rows.
    #[must_use]
    pub fn multi(multi: MultiPortion) -> Self {
        let len = multi.text_len();
        let metrics = multi.calc_size();
        Self::new(PortionKind::Multi(Box::new(multi)), len).with_metrics(metrics)
    }

    /// Set measured metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.set_metrics(metrics);
        self
    }

    /// Set the width only.
    #[must_use]
    pub fn with_width(mut self, width: Twips) -> Self {
        self.size.width = width;
        self
    }

    /// Set rendering flags.
    #[must_use]
    pub fn with_flags(mut self, flags: PortionFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Characters consumed.
    #[inline]
    pub fn len(&self) -> TextLen {
        self.len
    }

    /// Whether no characters are consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resize the consumed character range.
    pub fn set_len(&mut self, len: TextLen) {
        self.len = len;
    }

    /// Measured box.
    #[inline]
    pub fn size(&self) -> PortionSize {
        self.size
    }

    /// Width of the measured box.
    #[inline]
    pub fn width(&self) -> Twips {
        self.size.width
    }

    /// Width as printed. Same as [`width`](Self::width); the formatter shrinks
    /// it when a portion is clipped at the line end.
    #[inline]
    pub fn print_width(&self) -> Twips {
        self.size.width
    }

    /// Overwrite the printed width.
    pub fn set_print_width(&mut self, width: Twips) {
        self.size.width = width;
    }

    #[inline]
    pub fn height(&self) -> Twips {
        self.size.height
    }

    pub fn set_height(&mut self, height: Twips) {
        self.size.height = height;
    }

    #[inline]
    pub fn ascent(&self) -> Twips {
        self.ascent
    }

    pub fn set_ascent(&mut self, ascent: Twips) {
        self.ascent = ascent;
    }

    /// Measured metrics.
    pub fn metrics(&self) -> Metrics {
        Metrics::new(self.size.width, self.size.height, self.ascent)
    }

    /// Replace all measured metrics.
    pub fn set_metrics(&mut self, metrics: Metrics) {
        self.size = metrics.size();
        self.ascent = metrics.ascent;
    }

    #[inline]
    pub fn kind(&self) -> &PortionKind {
        &self.kind
    }

    /// Mutable access to the kind's payload. The variant itself is fixed.
    pub fn multi_mut(&mut self) -> Option<&mut MultiPortion> {
        match &mut self.kind {
            PortionKind::Multi(multi) => Some(multi),
            _ => None,
        }
    }

    #[inline]
    pub fn flags(&self) -> PortionFlags {
        self.flags
    }

    pub fn join_border_with_prev(&self) -> bool {
        self.flags.contains(PortionFlags::JOIN_BORDER_WITH_PREV)
    }

    pub fn set_join_border_with_prev(&mut self, join: bool) {
        self.flags.set(PortionFlags::JOIN_BORDER_WITH_PREV, join);
    }

    pub fn join_border_with_next(&self) -> bool {
        self.flags.contains(PortionFlags::JOIN_BORDER_WITH_NEXT)
    }

    pub fn set_join_border_with_next(&mut self, join: bool) {
        self.flags.set(PortionFlags::JOIN_BORDER_WITH_NEXT, join);
    }

    /// Stretchable blanks for justification.
    pub fn blanks(&self) -> u32 {
        match &self.kind {
            PortionKind::Text { blanks } => u32::from(*blanks),
            PortionKind::Multi(multi) => multi.blanks(),
            _ => 0,
        }
    }

    pub fn in_text_group(&self) -> bool {
        matches!(self.kind, PortionKind::Text { .. } | PortionKind::Hole)
    }

    /// Takes part in distributing justification space.
    pub fn in_space_group(&self) -> bool {
        matches!(self.kind, PortionKind::Text { .. } | PortionKind::Multi(_))
    }

    /// Fixed-width glue: tabs, margins and inline objects.
    pub fn in_fix_margin_group(&self) -> bool {
        matches!(
            self.kind,
            PortionKind::Tab { .. } | PortionKind::Margin | PortionKind::Fly
        )
    }

    pub fn is_margin(&self) -> bool {
        matches!(self.kind, PortionKind::Margin)
    }

    pub fn is_kern(&self) -> bool {
        matches!(self.kind, PortionKind::Kern)
    }

    pub fn is_multi(&self) -> bool {
        matches!(self.kind, PortionKind::Multi(_))
    }

    pub fn is_hole(&self) -> bool {
        matches!(self.kind, PortionKind::Hole)
    }

    pub fn is_break(&self) -> bool {
        matches!(self.kind, PortionKind::Break)
    }

    pub fn is_tab(&self) -> bool {
        matches!(self.kind, PortionKind::Tab { .. })
    }

    /// Multi portion whose rows carry a tab stop.
    pub fn has_tabulator(&self) -> bool {
        match &self.kind {
            PortionKind::Multi(multi) => multi.has_tabulator(),
            _ => false,
        }
    }

    /// Kinds without glyph metrics of their own take height and ascent from
    /// the previously formatted portion.
    pub fn inherits_line_metrics(&self) -> bool {
        match self.kind {
            PortionKind::Text { .. } | PortionKind::Fly | PortionKind::Multi(_) => {
                self.size.height == 0
            }
            _ => true,
        }
    }

    /// Degenerate portions consume nothing and occupy nothing.
    pub fn is_prunable(&self) -> bool {
        self.len == 0 && self.size.width == 0
    }
}
