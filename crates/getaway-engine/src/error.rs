//! Error types for the game service.
//!
//! Every variant is a typed, recoverable result the caller can inspect
//! and react to; nothing here is fatal to the process. Policy violations
//! (`PhaseClosed`, `AlreadySpunToday`, quota and duplicate eliminations)
//! mean the caller must re-query state before retrying.

use getaway_core::{EliminationError, ValidationError};
use getaway_store::StoreError;
use getaway_types::Phase;

/// Errors that can occur in the game service.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The persistence collaborator failed; propagated upward without
    /// internal retries.
    #[error("storage unavailable: {0}")]
    Storage(#[from] StoreError),

    /// The submission was malformed or collides with the other
    /// participant's stored submission.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The elimination was rejected (unknown candidate, duplicate, or
    /// quota exhausted).
    #[error(transparent)]
    Elimination(#[from] EliminationError),

    /// The operation is not available in the current phase.
    #[error("phase closed: requires {required:?}, currently {actual:?}")]
    PhaseClosed {
        /// The phase the operation requires.
        required: Phase,
        /// The phase derived from the current instant.
        actual: Phase,
    },

    /// Submissions are frozen once the pool has been combined.
    #[error("the candidate pool is already combined")]
    PoolAlreadyCombined,

    /// The participant already performed today's spin.
    #[error("already spun today")]
    AlreadySpunToday,

    /// There are no surviving candidates to draw from.
    #[error("no surviving candidates to spin on")]
    NothingToSpinOn,

    /// A tie-break spin was requested without an established finalist
    /// pair, or after the winner was locked.
    #[error("no tie-break is pending")]
    TieBreakNotPending,
}
