//! Property-based invariant tests for formatting, moving and composing.
//!
//! 1. Without kerning, `format_line` never leaves the cursor past the
//!    line budget.
//! 2. After a closed line, the closing portion is the chain tail.
//! 3. Zero-width and kerning portions never close a line.
//! 4. Moving across a line advances `idx` by exactly its text length.
//! 5. Horizontal moves cover the painted width, whatever the direction.
//! 6. Composed lines cover every source character, in order.
//! 7. Composed lines never exceed the configured width.
//! 8. Justified lines never overshoot the configured width.

use portline_chain::{Portion, PortionChain};
use portline_core::{LayoutConfig, Metrics, PaintDirection, TextDirection};
use portline_layout::{
    FormatInfo, FormatOutcome, LineComposer, MonospaceMeasurer, NoopLineEnd, PaintInfo,
    advance, calc_spacing, format_line, format_portion, place_line,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn word(len: usize, blanks: u16, width: i32) -> Portion {
    Portion::text(len, blanks).with_metrics(Metrics::new(width, 240, 190))
}

/// Portions that close a line once they reach the budget.
fn breaking_portion_strategy() -> impl Strategy<Value = Portion> + Clone {
    prop_oneof![
        6 => (1usize..12, 0u16..3, 0i32..400).prop_map(|(len, blanks, w)| word(len, blanks, w)),
        1 => (0i32..200).prop_map(Portion::margin),
        1 => Just(Portion::marker()),
        1 => (0i32..400).prop_map(|w| Portion::tab(w).with_width(w)),
    ]
}

fn portion_strategy() -> impl Strategy<Value = Portion> + Clone {
    prop_oneof![
        9 => breaking_portion_strategy(),
        1 => (0i32..200).prop_map(Portion::kern),
    ]
}

fn chain_of<S>(portion: S) -> impl Strategy<Value = PortionChain>
where
    S: Strategy<Value = Portion> + Clone,
{
    (portion.clone(), prop::collection::vec(portion, 0..24))
        .prop_map(|(head, rest)| PortionChain::from_portions(head, rest))
}

fn chain_strategy() -> impl Strategy<Value = PortionChain> {
    chain_of(portion_strategy())
}

fn direction_strategy() -> impl Strategy<Value = PaintDirection> {
    prop_oneof![
        Just(PaintDirection::LeftToRight),
        Just(PaintDirection::BottomToTop),
        Just(PaintDirection::RightToLeft),
        Just(PaintDirection::TopToBottom),
    ]
}

fn frame_strategy() -> impl Strategy<Value = TextDirection> {
    prop_oneof![Just(TextDirection::Ltr), Just(TextDirection::Rtl)]
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            8 => "[a-z]{1,9}",
            3 => Just(" ".to_string()),
            1 => Just("  ".to_string()),
            1 => Just("\t".to_string()),
            1 => Just("\n".to_string()),
            1 => Just("\u{4E2D}\u{6587}".to_string()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

fn composer(max_width: i32, justify: bool) -> LineComposer<MonospaceMeasurer> {
    LineComposer::new(
        MonospaceMeasurer::new(10, 20, 15),
        LayoutConfig::new(max_width)
            .tab_stop(80)
            .justify(justify)
            .verify_chains(true),
    )
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Formatter
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn format_line_respects_budget(
        mut chain in chain_of(breaking_portion_strategy()),
        max_width in 1i32..2000,
    ) {
        let mut info = FormatInfo::new(max_width);
        format_line(&mut chain, &mut info, &mut NoopLineEnd).unwrap();
        prop_assert!(info.x <= max_width);
        prop_assert!(chain.width() <= max_width);
        chain.verify().unwrap();
    }

    #[test]
    fn closed_line_ends_at_closing_portion(mut chain in chain_strategy(), max_width in 1i32..2000) {
        let mut info = FormatInfo::new(max_width);
        let outcome = format_line(&mut chain, &mut info, &mut NoopLineEnd).unwrap();
        if outcome == FormatOutcome::LineFull {
            let last = info.last().unwrap();
            prop_assert_eq!(chain.next_of(last).unwrap(), None);
            prop_assert_eq!(chain.find_last(chain.head()).unwrap(), last);
        }
    }

    #[test]
    fn zero_width_and_kern_never_close(
        kern in prop::bool::ANY,
        width in 0i32..500,
        x in 0i32..1000,
    ) {
        let portion = if kern { Portion::kern(width) } else { Portion::marker() };
        let mut chain = PortionChain::from_portions(portion, [word(1, 0, 10)]);
        let head = chain.head();
        let mut info = FormatInfo::new(1000).at(x);
        let outcome = format_portion(&mut chain, head, &mut info, &mut NoopLineEnd).unwrap();
        prop_assert_eq!(outcome, FormatOutcome::Fits);
        prop_assert_eq!(chain.portion_count(), 2);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Mover
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn idx_advances_by_text_len(
        chain in chain_strategy(),
        direction in direction_strategy(),
        frame in frame_strategy(),
        start in 0usize..10_000,
        space_add in 0i32..50,
    ) {
        let mut info = PaintInfo::new(direction, frame).with_idx(start).with_space_add(space_add);
        let placed = place_line(&chain, &mut info);
        prop_assert_eq!(info.idx, start + chain.text_len());
        prop_assert_eq!(placed.len(), chain.portion_count());
        prop_assert!(placed.windows(2).all(|w| w[0].idx <= w[1].idx));
    }

    #[test]
    fn horizontal_moves_cover_painted_width(
        chain in chain_strategy(),
        direction in prop_oneof![Just(PaintDirection::LeftToRight), Just(PaintDirection::RightToLeft)],
        frame in frame_strategy(),
        space_add in 0i32..50,
    ) {
        let mut info = PaintInfo::new(direction, frame).with_space_add(space_add);
        for (_, portion) in &chain {
            advance(portion, &mut info);
        }
        let stretch: i32 = chain.iter().map(|(_, p)| calc_spacing(p, space_add)).sum();
        prop_assert_eq!(info.x.abs(), chain.width() + stretch);
        prop_assert_eq!(info.y, 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6-8. Composer
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn composed_lines_cover_text(text in text_strategy(), max_width in 20i32..400) {
        let para = composer(max_width, false).compose(&text).unwrap();
        prop_assert_eq!(para.text_len(), text.chars().count());
        let mut expected = 0;
        for line in para.lines() {
            prop_assert_eq!(line.start, expected);
            prop_assert_eq!(line.text_len, line.chain.text_len());
            expected += line.text_len;
        }
    }

    #[test]
    fn composed_lines_fit(text in text_strategy(), max_width in 20i32..400) {
        let para = composer(max_width, false).compose(&text).unwrap();
        for line in para.lines() {
            prop_assert!(line.width <= max_width, "width {} > {}", line.width, max_width);
        }
    }

    #[test]
    fn justified_lines_do_not_overshoot(text in text_strategy(), max_width in 20i32..400) {
        let para = composer(max_width, true).compose(&text).unwrap();
        let last = para.lines().len() - 1;
        for (i, line) in para.lines().iter().enumerate() {
            prop_assert!(line.painted_width() <= max_width);
            if i == last || line.hard_break {
                prop_assert_eq!(line.space_add, 0);
            }
        }
    }
}
