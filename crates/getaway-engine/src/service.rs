//! The storage-backed game service.
//!
//! [`GameService`] wires the pure core logic to the persistence layer.
//! Every operation takes an explicit [`Namespace`] so live, demo, and
//! preview games never share state. Reads are pure recomputation over a
//! fetched snapshot; writes are at-most-once per logical action:
//!
//! - submissions and eliminations are check-then-write with a benign
//!   race (the duplicate loser is rejected on the next re-read);
//! - the winner lock is the single safety-critical compare-and-set --
//!   the config is re-read immediately before and after writing, and a
//!   concurrently locked value always wins over our own computation.
//!
//! Phase gates apply to the live namespace only; demo and preview games
//! are walkthroughs that run at any time of day.

use chrono::{DateTime, Utc};
use rand::Rng;

use getaway_core::{elimination, roster, schedule::Schedule, scoring, winner};
use getaway_store::{Namespace, Store};
use getaway_types::{
    CandidateEntry, CandidateKey, EliminationRecord, GameConfig, MergedPool, Participant, Phase,
    SpinId, SpinMode, SpinOutcome, SpinRecord, StrikeId, Submission, WinnerResult,
};

use crate::error::EngineError;

/// Points awarded per scored reel.
const SPIN_POINTS: u32 = 1;

/// The game service: core logic over a configured storage backend.
pub struct GameService {
    store: Store,
    schedule: Schedule,
    spin_mode: SpinMode,
}

impl GameService {
    /// Create a service over a store with the production schedule and
    /// the default spin mode.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            schedule: Schedule::standard(),
            spin_mode: SpinMode::default(),
        }
    }

    /// Replace the schedule (tests, hypothetical reruns).
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Set the spin scoring convention.
    #[must_use]
    pub const fn with_spin_mode(mut self, spin_mode: SpinMode) -> Self {
        self.spin_mode = spin_mode;
        self
    }

    /// The event schedule in use.
    pub const fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The underlying store.
    pub const fn store(&self) -> &Store {
        &self.store
    }

    // =======================================================================
    // Phase
    // =======================================================================

    /// The current phase, honoring a stored phase override.
    pub async fn phase(&self, ns: Namespace, now: DateTime<Utc>) -> Result<Phase, EngineError> {
        let config = self.config(ns).await?;
        Ok(self
            .schedule
            .phase_with_override(config.phase_override.as_deref(), now))
    }

    /// Require a phase for a write operation. Demo and preview games are
    /// not gated.
    async fn ensure_phase(
        &self,
        ns: Namespace,
        now: DateTime<Utc>,
        required: Phase,
    ) -> Result<(), EngineError> {
        if ns != Namespace::Live {
            return Ok(());
        }
        let actual = self.phase(ns, now).await?;
        if actual == required {
            Ok(())
        } else {
            Err(EngineError::PhaseClosed { required, actual })
        }
    }

    // =======================================================================
    // Submissions and the merged pool
    // =======================================================================

    /// One participant's stored submission, if any.
    pub async fn submission(
        &self,
        ns: Namespace,
        participant: Participant,
    ) -> Result<Option<Submission>, EngineError> {
        Ok(self
            .store
            .get_json(&ns.submission_key(participant))
            .await?)
    }

    /// Whether both participants have submitted.
    pub async fn has_both_submitted(&self, ns: Namespace) -> Result<bool, EngineError> {
        let one = self.submission(ns, Participant::PlayerOne).await?;
        let two = self.submission(ns, Participant::PlayerTwo).await?;
        Ok(roster::has_both_submitted(one.as_ref(), two.as_ref()))
    }

    /// Accept a participant's candidate submission.
    ///
    /// Validates against the currently stored other-submission, persists,
    /// and -- once both submissions exist -- combines and persists the
    /// merged pool exactly once. Entries are re-attributed to the
    /// submitting participant regardless of what the caller sent.
    ///
    /// # Errors
    ///
    /// [`EngineError::Validation`] on malformed or colliding entries,
    /// [`EngineError::PoolAlreadyCombined`] after the pool is frozen,
    /// [`EngineError::PhaseClosed`] outside submission day.
    pub async fn submit(
        &self,
        ns: Namespace,
        participant: Participant,
        entries: Vec<CandidateEntry>,
        now: DateTime<Utc>,
    ) -> Result<Submission, EngineError> {
        self.ensure_phase(ns, now, Phase::SubmissionOpen).await?;

        if self.store.get(&ns.pool_key()).await?.is_some() {
            return Err(EngineError::PoolAlreadyCombined);
        }

        let entries: Vec<CandidateEntry> = entries
            .into_iter()
            .map(|e| CandidateEntry {
                submitted_by: participant,
                ..e
            })
            .collect();

        let other = self.submission(ns, participant.other()).await?;
        roster::validate_submission(&entries, other.as_ref())?;

        let submission = Submission {
            participant,
            entries,
            submitted_at: now,
        };
        self.store
            .set_json(&ns.submission_key(participant), &submission)
            .await?;
        tracing::info!(%participant, "submission accepted");

        if other.is_some() {
            self.merged_pool(ns).await?;
        }
        Ok(submission)
    }

    /// The merged candidate pool.
    ///
    /// Returns the stored pool if it exists (idempotent read -- repeated
    /// merges must never reorder it). Combines and persists on first
    /// demand once both submissions exist; an empty pool before that.
    /// A concurrent first combine is benign: both clients derive the
    /// same deterministic pool, so last-write-wins cannot diverge.
    pub async fn merged_pool(&self, ns: Namespace) -> Result<MergedPool, EngineError> {
        if let Some(pool) = self.store.get_json::<MergedPool>(&ns.pool_key()).await? {
            return Ok(pool);
        }
        let one = self.submission(ns, Participant::PlayerOne).await?;
        let two = self.submission(ns, Participant::PlayerTwo).await?;
        let (Some(one), Some(two)) = (one, two) else {
            return Ok(MergedPool::default());
        };
        let pool = roster::merge(&one, &two);
        self.store.set_json(&ns.pool_key(), &pool).await?;
        tracing::info!(candidates = pool.len(), "candidate pool combined");
        Ok(pool)
    }

    // =======================================================================
    // Eliminations
    // =======================================================================

    /// The elimination log, in insertion order.
    pub async fn eliminations(&self, ns: Namespace) -> Result<Vec<EliminationRecord>, EngineError> {
        Ok(self.store.read_log_json(&ns.eliminations_key()).await?)
    }

    /// Permanently eliminate a candidate.
    ///
    /// Re-reads the log, applies the core checks, and appends the record.
    /// Irrevocable by contract: no API removes an elimination record.
    ///
    /// # Errors
    ///
    /// [`EngineError::Elimination`] for unknown candidates, duplicates,
    /// or an exhausted daily quota; [`EngineError::PhaseClosed`] outside
    /// the elimination days.
    pub async fn eliminate(
        &self,
        ns: Namespace,
        key: &CandidateKey,
        participant: Participant,
        now: DateTime<Utc>,
    ) -> Result<EliminationRecord, EngineError> {
        self.ensure_phase(ns, now, Phase::Elimination).await?;

        let date = Schedule::local_date(now);
        let pool = self.merged_pool(ns).await?;
        let log = self.eliminations(ns).await?;
        elimination::check_elimination(&pool, &log, key, participant, date, &self.schedule)?;

        // The entry exists: check_elimination verified pool membership.
        let entry = pool.entry(key).cloned().ok_or_else(|| {
            getaway_core::EliminationError::UnknownCandidate { key: key.clone() }
        })?;

        let record = EliminationRecord {
            id: StrikeId::new(),
            candidate: key.clone(),
            name: entry.name,
            region: entry.region,
            eliminated_by: participant,
            date,
            recorded_at: now,
        };
        self.store
            .append_json(&ns.eliminations_key(), &record)
            .await?;
        tracing::info!(candidate = %record.candidate, %participant, "candidate eliminated");
        Ok(record)
    }

    /// The candidates still in contention.
    pub async fn surviving(&self, ns: Namespace) -> Result<Vec<CandidateEntry>, EngineError> {
        let pool = self.merged_pool(ns).await?;
        let log = self.eliminations(ns).await?;
        Ok(elimination::surviving_set(&pool, &log))
    }

    // =======================================================================
    // Spins
    // =======================================================================

    /// The spin log, in insertion order.
    pub async fn spins(&self, ns: Namespace) -> Result<Vec<SpinRecord>, EngineError> {
        Ok(self.store.read_log_json(&ns.spins_key()).await?)
    }

    /// Whether a participant has already performed today's spin.
    pub async fn has_spun_today(
        &self,
        ns: Namespace,
        participant: Participant,
        now: DateTime<Utc>,
    ) -> Result<bool, EngineError> {
        let spins = self.spins(ns).await?;
        Ok(scoring::has_spun_today(
            participant,
            Schedule::local_date(now),
            &spins,
        ))
    }

    /// Perform a participant's daily spin.
    ///
    /// Draws three reel outcomes uniformly from the surviving set and
    /// records the scored reels per the configured [`SpinMode`].
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadySpunToday`] on a second spin the same day,
    /// [`EngineError::NothingToSpinOn`] with an empty surviving set,
    /// [`EngineError::PhaseClosed`] outside the daily spin window.
    pub async fn spin(
        &self,
        ns: Namespace,
        participant: Participant,
        now: DateTime<Utc>,
    ) -> Result<SpinOutcome, EngineError> {
        self.ensure_phase(ns, now, Phase::SpinOpen).await?;

        if self.has_spun_today(ns, participant, now).await? {
            return Err(EngineError::AlreadySpunToday);
        }

        let alive = self.surviving(ns).await?;
        let reels = draw_reels(&alive)?;
        self.record_spin_outcomes(ns, participant, now, &reels).await
    }

    /// Record the scored reels of a spin with known outcomes.
    ///
    /// Split out from [`Self::spin`] so the draw can be replayed with
    /// fixed reels (tests, audits). Performs no gating.
    pub async fn record_spin_outcomes(
        &self,
        ns: Namespace,
        participant: Participant,
        now: DateTime<Utc>,
        reels: &[CandidateEntry; 3],
    ) -> Result<SpinOutcome, EngineError> {
        let date = Schedule::local_date(now);
        let scored: Vec<&CandidateEntry> = match self.spin_mode {
            SpinMode::MiddleCounts => {
                let [_, middle, _] = reels;
                vec![middle]
            }
            SpinMode::AllThreeCount => {
                let [first, middle, last] = reels;
                vec![first, middle, last]
            }
        };

        let mut records = Vec::with_capacity(scored.len());
        for entry in scored {
            let record = SpinRecord {
                id: SpinId::new(),
                participant,
                candidate: entry.key(),
                name: entry.name.clone(),
                date,
                points: SPIN_POINTS,
                occurred_at: now,
                is_tie_break: false,
            };
            self.store.append_json(&ns.spins_key(), &record).await?;
            records.push(record);
        }
        tracing::info!(%participant, scored = records.len(), "spin recorded");

        let [first, middle, last] = reels;
        Ok(SpinOutcome {
            reels: [first.key(), middle.key(), last.key()],
            records,
        })
    }

    /// Main-tally standings over the surviving set, sorted.
    pub async fn standings(
        &self,
        ns: Namespace,
    ) -> Result<Vec<(CandidateKey, u64)>, EngineError> {
        let alive = self.surviving(ns).await?;
        let spins = self.spins(ns).await?;
        Ok(scoring::standings(&scoring::tally(&alive, &spins)))
    }

    // =======================================================================
    // Winner resolution
    // =======================================================================

    /// The game config singleton (defaults when absent).
    pub async fn config(&self, ns: Namespace) -> Result<GameConfig, EngineError> {
        Ok(self
            .store
            .get_json(&ns.config_key())
            .await?
            .unwrap_or_default())
    }

    /// Run the winner-resolution state machine.
    ///
    /// Before the finale instant (live namespace) this is always
    /// [`WinnerResult::Pending`]. Afterwards: a locked config is returned
    /// unconditionally; a strict leader is locked; a natural tie persists
    /// the finalist pair and reports the pending tie-break; recorded
    /// tie-break outcomes lock their majority winner. All lock writes go
    /// through the compare-and-set path.
    pub async fn resolve_winner(
        &self,
        ns: Namespace,
        now: DateTime<Utc>,
    ) -> Result<WinnerResult, EngineError> {
        if ns == Namespace::Live && self.phase(ns, now).await? != Phase::Finale {
            return Ok(WinnerResult::Pending);
        }

        let config = self.config(ns).await?;
        let alive = self.surviving(ns).await?;
        let spins = self.spins(ns).await?;

        match winner::resolve(&alive, &spins, &config) {
            winner::Resolution::Locked(key) => Ok(WinnerResult::Resolved { winner: key }),
            winner::Resolution::NoContest => Ok(WinnerResult::Pending),
            winner::Resolution::Leader(key) | winner::Resolution::TieBreakDecided(key) => {
                let locked = self.lock_winner(ns, key).await?;
                Ok(WinnerResult::Resolved { winner: locked })
            }
            winner::Resolution::TieBetween(pair) => {
                let finalists = self.persist_finalists(ns, pair).await?;
                Ok(WinnerResult::TieBreakPending { finalists })
            }
        }
    }

    /// Perform the deciding tie-break spin.
    ///
    /// Draws three outcomes restricted to the established finalist pair,
    /// appends them flagged `is_tie_break` (they never re-enter the main
    /// tally), and resolves the majority winner through the same lock
    /// path.
    ///
    /// # Errors
    ///
    /// [`EngineError::TieBreakNotPending`] without a stored pair or once
    /// the winner is locked.
    pub async fn tie_break_spin(
        &self,
        ns: Namespace,
        participant: Participant,
        now: DateTime<Utc>,
    ) -> Result<(SpinOutcome, WinnerResult), EngineError> {
        let config = self.config(ns).await?;
        if config.winner_locked {
            return Err(EngineError::TieBreakNotPending);
        }
        let Some(pair) = config.finalist_pair else {
            return Err(EngineError::TieBreakNotPending);
        };

        let pool = self.merged_pool(ns).await?;
        let finalists: Vec<CandidateEntry> =
            pair.iter().filter_map(|k| pool.entry(k).cloned()).collect();
        if finalists.len() != 2 {
            return Err(EngineError::TieBreakNotPending);
        }

        let reels = draw_reels(&finalists)?;
        let outcome = self
            .record_tie_break_outcomes(ns, participant, now, &reels)
            .await?;
        let result = self.resolve_winner(ns, now).await?;
        Ok((outcome, result))
    }

    /// Record three tie-break outcomes with known reels.
    ///
    /// Split out from [`Self::tie_break_spin`] so tests can force the
    /// reels. Performs no gating.
    pub async fn record_tie_break_outcomes(
        &self,
        ns: Namespace,
        participant: Participant,
        now: DateTime<Utc>,
        reels: &[CandidateEntry; 3],
    ) -> Result<SpinOutcome, EngineError> {
        let date = Schedule::local_date(now);
        let mut records = Vec::with_capacity(reels.len());
        for entry in reels {
            let record = SpinRecord {
                id: SpinId::new(),
                participant,
                candidate: entry.key(),
                name: entry.name.clone(),
                date,
                points: SPIN_POINTS,
                occurred_at: now,
                is_tie_break: true,
            };
            self.store.append_json(&ns.spins_key(), &record).await?;
            records.push(record);
        }
        tracing::info!(%participant, "tie-break spin recorded");

        let [first, middle, last] = reels;
        Ok(SpinOutcome {
            reels: [first.key(), middle.key(), last.key()],
            records,
        })
    }

    /// Lock a winner, compare-and-set style.
    ///
    /// Re-reads the config immediately before writing and adopts any
    /// concurrently locked value instead of overwriting it; re-reads
    /// after writing and again adopts the stored value if another writer
    /// won the race. Returns the winner that actually ended up locked.
    async fn lock_winner(
        &self,
        ns: Namespace,
        candidate: CandidateKey,
    ) -> Result<CandidateKey, EngineError> {
        let mut config = self.config(ns).await?;
        if config.winner_locked {
            if let Some(stored) = config.winner {
                tracing::info!(winner = %stored, "winner already locked, adopting");
                return Ok(stored);
            }
        }

        config.winner_locked = true;
        config.winner = Some(candidate.clone());
        self.store.set_json(&ns.config_key(), &config).await?;

        let stored = self.config(ns).await?;
        if stored.winner_locked {
            if let Some(winner) = stored.winner {
                if winner != candidate {
                    tracing::warn!(
                        ours = %candidate,
                        theirs = %winner,
                        "lost the winner-lock race, adopting the stored value"
                    );
                }
                return Ok(winner);
            }
        }
        Ok(candidate)
    }

    /// Persist the finalist pair, adopting an existing pair if another
    /// writer stored one first.
    async fn persist_finalists(
        &self,
        ns: Namespace,
        pair: [CandidateKey; 2],
    ) -> Result<[CandidateKey; 2], EngineError> {
        let mut config = self.config(ns).await?;
        if let Some(stored) = config.finalist_pair {
            return Ok(stored);
        }

        config.finalist_pair = Some(pair.clone());
        self.store.set_json(&ns.config_key(), &config).await?;

        let stored = self.config(ns).await?;
        Ok(stored.finalist_pair.unwrap_or(pair))
    }
}

/// Draw three reels from a candidate list with a fresh thread-local rng.
///
/// The rng lives in this scope only so service futures stay `Send`.
fn draw_reels(candidates: &[CandidateEntry]) -> Result<[CandidateEntry; 3], EngineError> {
    let mut rng = rand::rng();
    draw_reels_with(candidates, &mut rng)
}

/// Draw three reels from a candidate list with a caller-provided rng.
fn draw_reels_with(
    candidates: &[CandidateEntry],
    rng: &mut impl Rng,
) -> Result<[CandidateEntry; 3], EngineError> {
    let [first, middle, last] =
        winner::draw_three(candidates, rng).ok_or(EngineError::NothingToSpinOn)?;
    Ok([first.clone(), middle.clone(), last.clone()])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn entries(names: &[&str]) -> Vec<CandidateEntry> {
        names
            .iter()
            .map(|n| CandidateEntry::new(*n, None, Participant::PlayerOne))
            .collect()
    }

    #[test]
    fn draw_reels_come_from_the_list() {
        let alive = entries(&["Malta", "Gdansk", "Porto"]);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let reels = draw_reels_with(&alive, &mut rng).unwrap();
            for reel in &reels {
                assert!(alive.iter().any(|e| e.key() == reel.key()));
            }
        }
    }

    #[test]
    fn draw_reels_on_empty_set_fails() {
        let mut rng = SmallRng::seed_from_u64(11);
        let result = draw_reels_with(&[], &mut rng);
        assert!(matches!(result, Err(EngineError::NothingToSpinOn)));
    }
}
