#![forbid(unsafe_code)]

//! Portion chains for line layout.
//!
//! - [`Portion`] - one fragment of a visual line with its length, measured
//!   box and [`PortionKind`]
//! - [`PortionChain`] - the ordered, acyclic sequence of portions forming a
//!   line, stored in a generational arena
//! - [`ChainError`] - precondition violations reported by chain operations
//!
//! # Example
//! ```
//! use portline_chain::{Portion, PortionChain};
//! use portline_core::Metrics;
//!
//! let word = |len| Portion::text(len, 0).with_metrics(Metrics::new(40, 240, 190));
//! let mut line = PortionChain::from_portions(word(3), [word(4), Portion::marker()]);
//!
//! assert_eq!(line.width(), 80);
//! assert_eq!(line.prune_degenerate(), 1);
//! assert_eq!(line.text_len(), 7);
//! ```

pub mod chain;
pub mod error;
pub mod portion;

pub use chain::{Iter, PortionChain, PortionId};
pub use error::ChainError;
pub use portion::{MultiPortion, Portion, PortionFlags, PortionKind};
