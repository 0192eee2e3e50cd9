//! Error types for the Corridors MCTS engine.
//!
//! Follows the hand-rolled `Debug` + manual `Display`/`Error` pattern used
//! elsewhere in this codebase (see the endgame-tablebase error type) rather
//! than pulling in a derive-macro crate.

use std::fmt;

/// Every caller-visible failure mode the engine, board, and session can raise.
#[derive(Debug, Clone, PartialEq)]
pub enum CorridorsError {
    /// Move text that didn't parse, or parsed but isn't legal at the point it
    /// was applied. Carries the raw offending string.
    InvalidMove { input: String, reason: String },
    /// An operation needed an external evaluator (for priors or leaf value)
    /// that wasn't attached to the engine.
    MissingEvaluator { operation: String },
    /// Construction-time options were contradictory or out of range.
    InvalidConfiguration { reason: String },
    /// An operation was attempted on an object in a state that makes the
    /// operation undefined (e.g. `terminal_value()` on a non-terminal board).
    /// This signals a bug in the caller, not a user-correctable error.
    PreconditionViolation { reason: String },
}

impl fmt::Display for CorridorsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorridorsError::InvalidMove { input, reason } => {
                write!(f, "invalid move {:?}: {}", input, reason)
            }
            CorridorsError::MissingEvaluator { operation } => {
                write!(f, "missing evaluator required by {}", operation)
            }
            CorridorsError::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {}", reason)
            }
            CorridorsError::PreconditionViolation { reason } => {
                write!(f, "precondition violation: {}", reason)
            }
        }
    }
}

impl std::error::Error for CorridorsError {}

pub type Result<T> = std::result::Result<T, CorridorsError>;
