#![forbid(unsafe_code)]

//! Justification: distributing free line width over blanks.

use portline_chain::{Portion, PortionChain};
use portline_core::geometry::Twips;

/// Extra advance a portion receives when every blank on the line is
/// stretched by `space_add`.
pub fn calc_spacing(portion: &Portion, space_add: Twips) -> Twips {
    if !portion.in_space_group() {
        return 0;
    }
    let blanks = Twips::try_from(portion.blanks()).unwrap_or(Twips::MAX);
    blanks.saturating_mul(space_add)
}

/// Stretchable blanks on the whole line.
pub fn line_blanks(chain: &PortionChain) -> u32 {
    chain
        .iter()
        .filter(|(_, p)| p.in_space_group())
        .map(|(_, p)| p.blanks())
        .sum()
}

/// Per-blank stretch that makes `chain` fill `available`.
///
/// Integer division: the remainder is left at the line end. Returns 0 when
/// the line has no blanks or no free width.
pub fn space_add_for(chain: &PortionChain, available: Twips) -> Twips {
    let free = available.saturating_sub(chain.width());
    let blanks = line_blanks(chain);
    if free <= 0 || blanks == 0 {
        return 0;
    }
    let blanks = Twips::try_from(blanks).unwrap_or(Twips::MAX);
    let space_add = free / blanks;
    portline_core::trace!(free, blanks, space_add, "justify line");
    space_add
}
