#![forbid(unsafe_code)]

//! portline public facade crate.
//!
//! Re-exports the common types of the internal crates and offers a
//! prelude for day-to-day use.
//!
//! # Example
//! ```
//! use portline::prelude::*;
//!
//! fn lines(text: &str) -> Result<usize> {
//!     let config = LayoutConfig::new(100);
//!     config.validate()?;
//!     let composer = LineComposer::new(MonospaceMeasurer::new(10, 20, 15), config);
//!     Ok(composer.compose(text)?.lines().len())
//! }
//!
//! assert_eq!(lines("aaaa bbbb cccc").unwrap(), 2);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use portline_core::{
    ConfigError, FrameDirection, LayoutConfig, Metrics, PaintDirection, PortionSize, TextDirection,
    TextLen, Twips, is_counter_flow,
};

// --- Chain re-exports ------------------------------------------------------

pub use portline_chain::{
    ChainError, MultiPortion, Portion, PortionChain, PortionFlags, PortionId, PortionKind,
};

// --- Layout re-exports -----------------------------------------------------

pub use portline_layout::{
    ComposedLine, ComposedParagraph, FormatInfo, FormatOutcome, LineComposer, LineEndHook,
    Measurer, MonospaceMeasurer, NoopLineEnd, PaintInfo, PlacedPortion, advance, calc_spacing,
    format_line, format_portion, place_line, space_add_for,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for portline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A chain operation was called with a broken precondition.
    Chain(ChainError),
    /// Configuration failed validation.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(err) => write!(f, "portion chain: {err}"),
            Self::Config(err) => write!(f, "config: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Chain(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ChainError> for Error {
    fn from(err: ChainError) -> Self {
        Self::Chain(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for portline APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ChainError, ComposedParagraph, Error, FormatInfo, FormatOutcome, LayoutConfig,
        LineComposer, Measurer, Metrics, MonospaceMeasurer, PaintDirection, Portion, PortionChain,
        PortionId, PortionKind, Result, TextDirection, Twips,
    };

    pub use crate::{chain, core, layout};
}

pub use portline_chain as chain;
pub use portline_core as core;
pub use portline_layout as layout;
