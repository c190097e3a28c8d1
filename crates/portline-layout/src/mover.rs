#![forbid(unsafe_code)]

//! Moving a paint cursor across a formatted line.
//!
//! Nothing is drawn here. [`advance`] steps a [`PaintInfo`] past one
//! portion: along x for horizontal text, along y for rotated text, and
//! backwards when painting runs against the frame direction or bottom to
//! top. The character index always moves forward by the portion length.

use portline_chain::{ChainError, Portion, PortionChain, PortionId};
use portline_core::direction::{PaintDirection, TextDirection, is_counter_flow};
use portline_core::geometry::{TextLen, Twips};

use crate::spacing::calc_spacing;

/// Paint cursor state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintInfo {
    pub x: Twips,
    pub y: Twips,
    /// Character index in the source text.
    pub idx: TextLen,
    /// Justification stretch per blank.
    pub space_add: Twips,
    /// Counts fixed-margin portions and tabbed multi portions passed.
    pub space_idx: usize,
    /// Counts fixed-margin portions passed, for kana compression tables.
    pub kana_idx: usize,
    /// Direction the line is painted in.
    pub direction: PaintDirection,
    /// Base direction of the frame holding the line.
    pub frame: TextDirection,
}

impl PaintInfo {
    /// Cursor at the origin.
    #[must_use]
    pub const fn new(direction: PaintDirection, frame: TextDirection) -> Self {
        Self {
            x: 0,
            y: 0,
            idx: 0,
            space_add: 0,
            space_idx: 0,
            kana_idx: 0,
            direction,
            frame,
        }
    }

    /// Move the cursor origin.
    #[must_use]
    pub const fn at(mut self, x: Twips, y: Twips) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Start at a character index.
    #[must_use]
    pub const fn with_idx(mut self, idx: TextLen) -> Self {
        self.idx = idx;
        self
    }

    /// Set the justification stretch per blank.
    #[must_use]
    pub const fn with_space_add(mut self, space_add: Twips) -> Self {
        self.space_add = space_add;
        self
    }

    /// Whether the cursor moves against the frame direction.
    #[inline]
    pub const fn is_counter_flow(&self) -> bool {
        is_counter_flow(self.frame, self.direction)
    }
}

/// Step `info` past `portion`.
pub fn advance(portion: &Portion, info: &mut PaintInfo) {
    let step = if portion.in_space_group() && info.space_add != 0 {
        portion
            .print_width()
            .saturating_add(calc_spacing(portion, info.space_add))
    } else {
        if portion.in_fix_margin_group() && !portion.is_margin() {
            info.space_idx += 1;
            info.kana_idx += 1;
        }
        portion.print_width()
    };

    if info.direction.is_rotated() {
        if info.direction == PaintDirection::BottomToTop {
            info.y = info.y.saturating_sub(step);
        } else {
            info.y = info.y.saturating_add(step);
        }
    } else if info.is_counter_flow() {
        info.x = info.x.saturating_sub(step);
    } else {
        info.x = info.x.saturating_add(step);
    }

    if portion.is_multi() && portion.has_tabulator() {
        info.space_idx += 1;
    }

    info.idx += portion.len();
}

/// Where a portion starts when a line is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedPortion {
    pub id: PortionId,
    pub x: Twips,
    pub y: Twips,
    /// Character index of the portion's first character.
    pub idx: TextLen,
    /// Advance taken by the portion, including justification stretch.
    pub advance: Twips,
}

/// Fold [`advance`] over the whole chain, recording each start position.
pub fn place_line(chain: &PortionChain, info: &mut PaintInfo) -> Vec<PlacedPortion> {
    let mut placed = Vec::with_capacity(chain.portion_count());
    for (id, portion) in chain {
        let (x, y, idx) = (info.x, info.y, info.idx);
        advance(portion, info);
        let advance = (info.x - x).abs().max((info.y - y).abs());
        placed.push(PlacedPortion {
            id,
            x,
            y,
            idx,
            advance,
        });
    }
    portline_core::trace!(portions = placed.len(), x = info.x, y = info.y, "placed line");
    placed
}

/// Paint position of the character at `idx`'s portion start, if the line
/// covers it. Zero-length portions cover no character.
pub fn position_of(
    chain: &PortionChain,
    info: &PaintInfo,
    idx: TextLen,
) -> Result<Option<PlacedPortion>, ChainError> {
    let mut cursor = info.clone();
    for placed in place_line(chain, &mut cursor) {
        let len = chain.portion(placed.id)?.len();
        if len > 0 && idx >= placed.idx && idx < placed.idx + len {
            return Ok(Some(placed));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portline_chain::MultiPortion;
    use portline_core::Metrics;

    fn word(len: usize, blanks: u16, width: Twips) -> Portion {
        Portion::text(len, blanks).with_metrics(Metrics::new(width, 240, 190))
    }

    fn info(direction: PaintDirection, frame: TextDirection) -> PaintInfo {
        PaintInfo::new(direction, frame).at(1000, 1000)
    }

    #[test]
    fn rtl_frame_with_ltr_paint_moves_left() {
        let mut paint = info(PaintDirection::LeftToRight, TextDirection::Rtl);
        advance(&word(3, 0, 40), &mut paint);
        assert_eq!(paint.x, 960);
        assert_eq!(paint.y, 1000);
    }

    #[test]
    fn rtl_frame_with_rtl_paint_moves_right() {
        let mut paint = info(PaintDirection::RightToLeft, TextDirection::Rtl);
        advance(&word(3, 0, 40), &mut paint);
        assert_eq!(paint.x, 1040);
    }

    #[test]
    fn ltr_frame_with_rtl_paint_moves_left() {
        let mut paint = info(PaintDirection::RightToLeft, TextDirection::Ltr);
        advance(&word(3, 0, 40), &mut paint);
        assert_eq!(paint.x, 960);
    }

    #[test]
    fn rotated_moves_along_y() {
        let mut down = info(PaintDirection::TopToBottom, TextDirection::Ltr);
        advance(&word(3, 0, 40), &mut down);
        assert_eq!((down.x, down.y), (1000, 1040));

        let mut up = info(PaintDirection::BottomToTop, TextDirection::Rtl);
        advance(&word(3, 0, 40), &mut up);
        assert_eq!((up.x, up.y), (1000, 960));
    }

    #[test]
    fn justified_text_adds_spacing() {
        let mut paint = info(PaintDirection::LeftToRight, TextDirection::Ltr).with_space_add(5);
        advance(&word(6, 2, 60), &mut paint);
        assert_eq!(paint.x, 1070);

        let mut counter = info(PaintDirection::LeftToRight, TextDirection::Rtl).with_space_add(5);
        advance(&word(6, 2, 60), &mut counter);
        assert_eq!(counter.x, 930);
    }

    #[test]
    fn glue_ignores_space_add_and_bumps_counters() {
        let mut paint = info(PaintDirection::LeftToRight, TextDirection::Ltr).with_space_add(5);
        advance(&Portion::tab(500).with_width(80), &mut paint);
        assert_eq!(paint.x, 1080);
        assert_eq!(paint.space_idx, 1);
        assert_eq!(paint.kana_idx, 1);

        advance(&Portion::margin(30), &mut paint);
        assert_eq!(paint.x, 1110);
        assert_eq!(paint.space_idx, 1);
    }

    #[test]
    fn tabbed_multi_bumps_space_idx() {
        let multi = MultiPortion::new()
            .with_row(PortionChain::new(word(2, 0, 20)))
            .with_tabulator(true);
        let mut paint = info(PaintDirection::LeftToRight, TextDirection::Ltr);
        advance(&Portion::multi(multi), &mut paint);
        assert_eq!(paint.space_idx, 1);
        assert_eq!(paint.kana_idx, 0);
        assert_eq!(paint.idx, 2);
    }

    #[test]
    fn idx_advances_regardless_of_direction() {
        for direction in [
            PaintDirection::LeftToRight,
            PaintDirection::BottomToTop,
            PaintDirection::RightToLeft,
            PaintDirection::TopToBottom,
        ] {
            let mut paint = PaintInfo::new(direction, TextDirection::Rtl).with_idx(10);
            advance(&word(7, 0, 0), &mut paint);
            assert_eq!(paint.idx, 17);
        }
    }

    #[test]
    fn place_line_records_starts() {
        let chain = PortionChain::from_portions(word(2, 0, 20), [word(3, 0, 30), word(1, 0, 10)]);
        let mut paint = PaintInfo::new(PaintDirection::LeftToRight, TextDirection::Ltr);
        let placed = place_line(&chain, &mut paint);
        let starts: Vec<_> = placed.iter().map(|p| (p.x, p.idx, p.advance)).collect();
        assert_eq!(starts, vec![(0, 0, 20), (20, 2, 30), (50, 5, 10)]);
        assert_eq!(paint.x, 60);
        assert_eq!(paint.idx, 6);
    }

    #[test]
    fn position_of_finds_covering_portion() {
        let chain = PortionChain::from_portions(word(2, 0, 20), [word(3, 0, 30)]);
        let paint = PaintInfo::new(PaintDirection::LeftToRight, TextDirection::Ltr);
        let hit = position_of(&chain, &paint, 3).unwrap().unwrap();
        assert_eq!((hit.x, hit.idx), (20, 2));
        assert_eq!(position_of(&chain, &paint, 9).unwrap(), None);
    }

    #[test]
    fn position_of_skips_zero_length_portions() {
        let chain = PortionChain::from_portions(Portion::marker(), [word(2, 0, 20)]);
        let text = chain.next_of(chain.head()).unwrap().unwrap();
        let paint = PaintInfo::new(PaintDirection::LeftToRight, TextDirection::Ltr);
        let hit = position_of(&chain, &paint, 0).unwrap().unwrap();
        assert_eq!(hit.id, text);
        assert_eq!(position_of(&chain, &paint, 2).unwrap(), None);
    }
}
