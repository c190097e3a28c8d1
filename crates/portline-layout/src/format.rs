#![forbid(unsafe_code)]

//! Fitting portions onto a line.
//!
//! A line-layout driver hands portions to [`format_portion`] one at a time
//! together with a running [`FormatInfo`]. Each call answers whether the
//! portion fits, fills the line, or could not be placed at all:
//!
//! - [`FormatOutcome::Fits`]: keep going with the next portion.
//! - [`FormatOutcome::LineFull`]: the portion is the last one on the line.
//!   Anything after it has been truncated, and it was shrunk to the
//!   remaining budget if it overflowed.
//! - [`FormatOutcome::Underflow`]: the cursor was already past the limit;
//!   the portion must be re-flowed onto the next line.
//!
//! Zero-width portions and kerning portions never end a line on their own,
//! which keeps markers at the boundary from producing empty lines.

use portline_chain::{ChainError, PortionChain, PortionId};
use portline_core::geometry::Twips;

/// Result of formatting one portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The portion fits; continue with the next one.
    Fits,
    /// The line is full and ends with this portion.
    LineFull,
    /// The portion could not be placed on this line.
    Underflow,
}

impl FormatOutcome {
    /// Whether the line ends here.
    #[inline]
    pub const fn ends_line(self) -> bool {
        !matches!(self, Self::Fits)
    }
}

/// Running state of one line being formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    /// Horizontal cursor: width used so far.
    pub x: Twips,
    /// Available width.
    pub max_width: Twips,
    last: Option<PortionId>,
    underflow: Option<PortionId>,
}

impl FormatInfo {
    /// Start a line with an empty cursor.
    #[must_use]
    pub const fn new(max_width: Twips) -> Self {
        Self {
            x: 0,
            max_width,
            last: None,
            underflow: None,
        }
    }

    /// Start a line with the cursor already at `x` (indents, carried width).
    #[must_use]
    pub const fn at(mut self, x: Twips) -> Self {
        self.x = x;
        self
    }

    /// The previously formatted portion.
    pub const fn last(&self) -> Option<PortionId> {
        self.last
    }

    pub fn set_last(&mut self, last: Option<PortionId>) {
        self.last = last;
    }

    /// The portion that underflowed, if any.
    pub const fn underflow(&self) -> Option<PortionId> {
        self.underflow
    }

    /// Forget a recorded underflow (after the driver re-flowed it).
    pub fn clear_underflow(&mut self) {
        self.underflow = None;
    }

    /// Remaining budget, never negative.
    pub fn remaining(&self) -> Twips {
        self.max_width.saturating_sub(self.x).max(0)
    }

    /// Account for a placed portion: advance the cursor by its print width
    /// and make it the last formatted portion.
    pub fn commit(&mut self, chain: &PortionChain, id: PortionId) -> Result<(), ChainError> {
        let width = chain.portion(id)?.print_width();
        self.x = self.x.saturating_add(width);
        self.last = Some(id);
        Ok(())
    }
}

/// Called when a line is closed.
///
/// Receives the portion that was formatted before the one that closed the
/// line (or the closing portion itself if it was the first). Drivers use it
/// to finish the line and set up the next one.
pub trait LineEndHook {
    fn end_of_line(
        &mut self,
        chain: &mut PortionChain,
        last: PortionId,
        info: &FormatInfo,
    ) -> Result<(), ChainError>;
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLineEnd;

impl LineEndHook for NoopLineEnd {
    fn end_of_line(
        &mut self,
        _chain: &mut PortionChain,
        _last: PortionId,
        _info: &FormatInfo,
    ) -> Result<(), ChainError> {
        Ok(())
    }
}

impl<F> LineEndHook for F
where
    F: FnMut(&mut PortionChain, PortionId, &FormatInfo) -> Result<(), ChainError>,
{
    fn end_of_line(
        &mut self,
        chain: &mut PortionChain,
        last: PortionId,
        info: &FormatInfo,
    ) -> Result<(), ChainError> {
        self(chain, last, info)
    }
}

/// Decide whether portion `id` fits at `info.x`.
///
/// Height and ascent are first seeded from the previously formatted portion
/// for kinds without metrics of their own. The cursor is not advanced; call
/// [`FormatInfo::commit`] for portions that stay on the line.
pub fn format_portion<H>(
    chain: &mut PortionChain,
    id: PortionId,
    info: &mut FormatInfo,
    hook: &mut H,
) -> Result<FormatOutcome, ChainError>
where
    H: LineEndHook + ?Sized,
{
    if let Some(last) = info.last
        && last != id
    {
        let seed = chain.portion(last)?;
        let (height, ascent) = (seed.height(), seed.ascent());
        let portion = chain.portion_mut(id)?;
        if portion.inherits_line_metrics() {
            portion.set_height(height);
            portion.set_ascent(ascent);
        }
    }

    if info.x > info.max_width {
        chain.truncate(id)?;
        info.underflow = Some(id);
        portline_core::debug!(portion = %id, x = info.x, max_width = info.max_width, "underflow");
        return Ok(FormatOutcome::Underflow);
    }

    let portion = chain.portion(id)?;
    let print_width = portion.print_width();
    let new_width = info.x.saturating_add(print_width);
    if info.max_width <= new_width && print_width > 0 && !portion.is_kern() {
        chain.truncate(id)?;
        if new_width > info.max_width {
            chain.portion_mut(id)?.set_print_width(info.max_width - info.x);
        }
        let last = info.last.unwrap_or(id);
        hook.end_of_line(chain, last, info)?;
        portline_core::debug!(
            portion = %id,
            x = info.x,
            overflow = new_width - info.max_width,
            "line full"
        );
        return Ok(FormatOutcome::LineFull);
    }

    portline_core::trace!(portion = %id, x = info.x, width = print_width, "fits");
    Ok(FormatOutcome::Fits)
}

/// Format a whole chain from its head, committing every placed portion.
///
/// Stops at the first outcome that ends the line and returns it; returns
/// [`FormatOutcome::Fits`] if the whole chain fit.
pub fn format_line<H>(
    chain: &mut PortionChain,
    info: &mut FormatInfo,
    hook: &mut H,
) -> Result<FormatOutcome, ChainError>
where
    H: LineEndHook + ?Sized,
{
    let mut cursor = Some(chain.head());
    while let Some(id) = cursor {
        let outcome = format_portion(chain, id, info, hook)?;
        match outcome {
            FormatOutcome::Fits => {
                info.commit(chain, id)?;
                cursor = chain.next_of(id)?;
            }
            FormatOutcome::LineFull => {
                info.commit(chain, id)?;
                return Ok(outcome);
            }
            FormatOutcome::Underflow => return Ok(outcome),
        }
    }
    Ok(FormatOutcome::Fits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portline_chain::Portion;
    use portline_core::Metrics;
    use tracing_test::traced_test;

    fn boxed(width: Twips) -> Portion {
        Portion::fly(Metrics::new(width, 240, 190))
    }

    #[test]
    fn three_forties_fill_a_hundred() {
        let mut chain = PortionChain::from_portions(boxed(40), [boxed(40), boxed(40)]);
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(100);

        assert_eq!(
            format_portion(&mut chain, ids[0], &mut info, &mut NoopLineEnd),
            Ok(FormatOutcome::Fits)
        );
        info.commit(&chain, ids[0]).unwrap();
        assert_eq!(info.x, 40);

        assert_eq!(
            format_portion(&mut chain, ids[1], &mut info, &mut NoopLineEnd),
            Ok(FormatOutcome::Fits)
        );
        info.commit(&chain, ids[1]).unwrap();
        assert_eq!(info.x, 80);

        assert_eq!(
            format_portion(&mut chain, ids[2], &mut info, &mut NoopLineEnd),
            Ok(FormatOutcome::LineFull)
        );
        assert_eq!(chain.portion(ids[2]).unwrap().print_width(), 20);
        assert_eq!(chain.next_of(ids[2]), Ok(None));
    }

    #[test]
    fn zero_width_kern_at_boundary_never_breaks() {
        let mut chain = PortionChain::from_portions(boxed(100), [Portion::kern(0), boxed(10)]);
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(100).at(100);
        info.set_last(Some(ids[0]));

        let outcome = format_portion(&mut chain, ids[1], &mut info, &mut NoopLineEnd).unwrap();
        assert_eq!(outcome, FormatOutcome::Fits);
        assert_eq!(chain.next_of(ids[1]), Ok(Some(ids[2])));
    }

    #[test]
    fn positive_kern_at_boundary_still_fits() {
        let mut chain = PortionChain::from_portions(boxed(90), [Portion::kern(20)]);
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(100).at(90);
        let outcome = format_portion(&mut chain, ids[1], &mut info, &mut NoopLineEnd).unwrap();
        assert_eq!(outcome, FormatOutcome::Fits);
    }

    #[test]
    fn marker_exactly_at_limit_fits() {
        let mut chain = PortionChain::from_portions(boxed(100), [Portion::marker()]);
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(100).at(100);
        let outcome = format_portion(&mut chain, ids[1], &mut info, &mut NoopLineEnd).unwrap();
        assert_eq!(outcome, FormatOutcome::Fits);
    }

    #[test]
    fn exact_fit_ends_line_without_shrinking() {
        let mut chain = PortionChain::from_portions(boxed(60), [boxed(40), boxed(5)]);
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(100).at(60);
        info.set_last(Some(ids[0]));

        let outcome = format_portion(&mut chain, ids[1], &mut info, &mut NoopLineEnd).unwrap();
        assert_eq!(outcome, FormatOutcome::LineFull);
        assert_eq!(chain.portion(ids[1]).unwrap().print_width(), 40);
        assert!(!chain.contains(ids[2]));
    }

    #[test]
    fn cursor_past_limit_underflows() {
        let mut chain = PortionChain::from_portions(boxed(10), [boxed(10), boxed(10)]);
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(100).at(101);

        let outcome = format_portion(&mut chain, ids[1], &mut info, &mut NoopLineEnd).unwrap();
        assert_eq!(outcome, FormatOutcome::Underflow);
        assert_eq!(info.underflow(), Some(ids[1]));
        assert_eq!(chain.next_of(ids[1]), Ok(None));
        assert_eq!(chain.portion(ids[1]).unwrap().print_width(), 10);

        info.clear_underflow();
        assert_eq!(info.underflow(), None);
    }

    #[test]
    fn hook_receives_previous_portion() {
        let mut chain = PortionChain::from_portions(boxed(70), [boxed(70)]);
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(100);
        let mut seen = Vec::new();
        let mut hook = |_: &mut PortionChain,
                        last: PortionId,
                        info: &FormatInfo|
         -> Result<(), ChainError> {
            seen.push((last, info.x));
            Ok(())
        };

        let outcome = format_line(&mut chain, &mut info, &mut hook).unwrap();
        assert_eq!(outcome, FormatOutcome::LineFull);
        assert_eq!(seen, vec![(ids[0], 70)]);
        assert_eq!(info.x, 100);
        assert_eq!(info.last(), Some(ids[1]));
    }

    #[test]
    fn hook_gets_closing_portion_when_first() {
        let mut chain = PortionChain::new(boxed(250));
        let head = chain.head();
        let mut info = FormatInfo::new(100);
        let mut seen = None;
        let mut hook = |_: &mut PortionChain,
                        last: PortionId,
                        _: &FormatInfo|
         -> Result<(), ChainError> {
            seen = Some(last);
            Ok(())
        };
        format_line(&mut chain, &mut info, &mut hook).unwrap();
        assert_eq!(seen, Some(head));
        assert_eq!(chain.portion(head).unwrap().print_width(), 100);
    }

    #[test]
    fn glue_portions_inherit_line_metrics() {
        let mut chain = PortionChain::from_portions(
            Portion::text(3, 0).with_metrics(Metrics::new(30, 300, 220)),
            [Portion::tab(100).with_width(20)],
        );
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(1000);
        format_line(&mut chain, &mut info, &mut NoopLineEnd).unwrap();

        let tab = chain.portion(ids[1]).unwrap();
        assert_eq!(tab.height(), 300);
        assert_eq!(tab.ascent(), 220);
    }

    #[test]
    fn measured_text_keeps_own_metrics() {
        let mut chain = PortionChain::from_portions(
            Portion::text(3, 0).with_metrics(Metrics::new(30, 300, 220)),
            [Portion::text(2, 0).with_metrics(Metrics::new(20, 200, 150))],
        );
        let ids: Vec<_> = chain.ids().collect();
        let mut info = FormatInfo::new(1000);
        format_line(&mut chain, &mut info, &mut NoopLineEnd).unwrap();
        assert_eq!(chain.portion(ids[1]).unwrap().height(), 200);
    }

    #[test]
    fn whole_chain_fits() {
        let mut chain = PortionChain::from_portions(boxed(10), [boxed(20), boxed(30)]);
        let mut info = FormatInfo::new(100);
        let outcome = format_line(&mut chain, &mut info, &mut NoopLineEnd).unwrap();
        assert_eq!(outcome, FormatOutcome::Fits);
        assert!(!outcome.ends_line());
        assert_eq!(info.x, 60);
        assert_eq!(info.remaining(), 40);
    }

    #[test]
    fn stale_portion_is_reported() {
        let mut chain = PortionChain::from_portions(boxed(10), [boxed(20)]);
        let head = chain.head();
        let second = chain.next_of(head).unwrap().unwrap();
        chain.truncate(head).unwrap();
        let mut info = FormatInfo::new(100);
        assert_eq!(
            format_portion(&mut chain, second, &mut info, &mut NoopLineEnd),
            Err(ChainError::StalePortion { id: second })
        );
    }

    #[traced_test]
    #[test]
    fn line_break_is_logged() {
        let mut chain = PortionChain::from_portions(boxed(80), [boxed(40)]);
        let mut info = FormatInfo::new(100);
        format_line(&mut chain, &mut info, &mut NoopLineEnd).unwrap();
        assert!(logs_contain("line full"));
        assert!(logs_contain("overflow=20"));
    }

    #[traced_test]
    #[test]
    fn underflow_is_logged() {
        let mut chain = PortionChain::new(boxed(10));
        let head = chain.head();
        let mut info = FormatInfo::new(50).at(60);
        format_portion(&mut chain, head, &mut info, &mut NoopLineEnd).unwrap();
        assert!(logs_contain("underflow"));
    }
}
