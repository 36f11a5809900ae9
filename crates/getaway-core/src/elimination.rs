//! Elimination ("strike") tracking.
//!
//! Eliminations are append-only and irrevocable by contract: there is no
//! API to remove a record, and a candidate eliminated on any day stays
//! eliminated for the rest of the game. Each participant has a per-day
//! quota looked up from the [`Schedule`].

use chrono::NaiveDate;
use getaway_types::{CandidateEntry, CandidateKey, EliminationRecord, MergedPool, Participant};

use crate::schedule::Schedule;

/// Errors rejecting an elimination attempt.
///
/// All variants are recoverable policy violations: the caller re-queries
/// state before retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EliminationError {
    /// The candidate key is not in the merged pool.
    #[error("unknown candidate: {key}")]
    UnknownCandidate {
        /// The offending key.
        key: CandidateKey,
    },

    /// The candidate is already in the elimination log. Duplicate attempts
    /// are rejected, never silently merged.
    #[error("candidate already eliminated: {key}")]
    AlreadyEliminated {
        /// The already-eliminated key.
        key: CandidateKey,
    },

    /// The participant has used up the day's strike quota.
    #[error("strike quota exceeded: {used} of {quota} used")]
    QuotaExceeded {
        /// Strikes already recorded by this participant on this date.
        used: u32,
        /// The day's quota.
        quota: u32,
    },
}

/// Count the strikes a participant has recorded on a date.
pub fn strikes_used(participant: Participant, date: NaiveDate, log: &[EliminationRecord]) -> u32 {
    let count = log
        .iter()
        .filter(|r| r.eliminated_by == participant && r.date == date)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Whether a participant still has strike quota left on a date.
pub fn can_eliminate(
    participant: Participant,
    date: NaiveDate,
    log: &[EliminationRecord],
    schedule: &Schedule,
) -> bool {
    strikes_used(participant, date, log) < schedule.strike_quota_for(date)
}

/// Check whether an elimination would be valid, without recording it.
///
/// The caller appends the record only after this passes; a benign write
/// race between the two clients is resolved by the next re-read of the
/// log, which rejects the duplicate.
///
/// # Errors
///
/// Returns [`EliminationError::UnknownCandidate`] if the key is not in
/// the pool, [`EliminationError::AlreadyEliminated`] if it is already in
/// the log, or [`EliminationError::QuotaExceeded`] if the participant has
/// no quota left on `date`.
pub fn check_elimination(
    pool: &MergedPool,
    log: &[EliminationRecord],
    key: &CandidateKey,
    participant: Participant,
    date: NaiveDate,
    schedule: &Schedule,
) -> Result<(), EliminationError> {
    if !pool.contains_key(key) {
        return Err(EliminationError::UnknownCandidate { key: key.clone() });
    }
    if log.iter().any(|r| &r.candidate == key) {
        return Err(EliminationError::AlreadyEliminated { key: key.clone() });
    }
    let used = strikes_used(participant, date, log);
    let quota = schedule.strike_quota_for(date);
    if used >= quota {
        return Err(EliminationError::QuotaExceeded { used, quota });
    }
    Ok(())
}

/// The candidates still in contention: pool minus every eliminated key,
/// irrespective of date. Recomputed on demand, never stored.
pub fn surviving_set(pool: &MergedPool, log: &[EliminationRecord]) -> Vec<CandidateEntry> {
    pool.entries
        .iter()
        .filter(|e| {
            let key = e.key();
            !log.iter().any(|r| r.candidate == key)
        })
        .cloned()
        .collect()
}
