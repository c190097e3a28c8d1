#![forbid(unsafe_code)]

//! Line layout over portion chains.
//!
//! - [`format`] - fitting portions onto a line ([`format_portion`])
//! - [`spacing`] - justification stretch over blanks
//! - [`mover`] - advancing a paint cursor across a line
//! - [`measure`] - the [`Measurer`] seam and a fixed-pitch implementation
//! - [`compose`] - a reference composer breaking paragraphs into lines
//!
//! # Example
//! ```
//! use portline_chain::{Portion, PortionChain};
//! use portline_core::Metrics;
//! use portline_layout::{FormatInfo, FormatOutcome, NoopLineEnd, format_line};
//!
//! let word = |w| Portion::text(3, 0).with_metrics(Metrics::new(w, 240, 190));
//! let mut line = PortionChain::from_portions(word(40), [word(40), word(40)]);
//! let mut info = FormatInfo::new(100);
//!
//! let outcome = format_line(&mut line, &mut info, &mut NoopLineEnd).unwrap();
//! assert_eq!(outcome, FormatOutcome::LineFull);
//! assert_eq!(line.width(), 100);
//! ```

pub mod compose;
pub mod format;
pub mod measure;
pub mod mover;
pub mod spacing;

pub use compose::{ComposedLine, ComposedParagraph, LineComposer, resolve_frame};
pub use format::{
    FormatInfo, FormatOutcome, LineEndHook, NoopLineEnd, format_line, format_portion,
};
pub use measure::{Measurer, MonospaceMeasurer};
pub use mover::{PaintInfo, PlacedPortion, advance, place_line, position_of};
pub use spacing::{calc_spacing, line_blanks, space_add_for};
