#![forbid(unsafe_code)]

//! Chain precondition errors.

use std::fmt;

use crate::chain::PortionId;

/// A chain operation was called with arguments that break its
/// preconditions. The chain is left unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// The id refers to a slot that was freed (or never belonged here).
    StalePortion { id: PortionId },
    /// `target` cannot be reached by following links from `from`.
    NotReachable { from: PortionId, target: PortionId },
    /// Following links from the head revisited a portion.
    CycleDetected { at: PortionId },
    /// The head portion anchors the chain and cannot be cut.
    CannotCutHead { head: PortionId },
    /// An append through a cached tail found that the tail has a successor.
    NotTail { id: PortionId, next: PortionId },
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StalePortion { id } => write!(f, "portion {id} is not live in this chain"),
            Self::NotReachable { from, target } => {
                write!(f, "portion {target} is not downstream of portion {from}")
            }
            Self::CycleDetected { at } => write!(f, "portion chain revisits portion {at}"),
            Self::CannotCutHead { head } => write!(f, "cannot cut head portion {head}"),
            Self::NotTail { id, next } => {
                write!(f, "portion {id} is not the tail (next is {next})")
            }
        }
    }
}

impl std::error::Error for ChainError {}
