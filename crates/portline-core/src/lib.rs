#![forbid(unsafe_code)]

//! Core: layout units, writing/paint directions, configuration and logging.

pub mod config;
pub mod direction;
pub mod geometry;
pub mod logging;

pub use config::{ConfigError, LayoutConfig};
pub use direction::{FrameDirection, PaintDirection, TextDirection, is_counter_flow};
pub use geometry::{Metrics, PortionSize, TextLen, Twips};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
