//! Core entity structs for the Getaway destination game.
//!
//! Covers candidate entries and submissions, the merged pool, the two
//! append-only logs (eliminations and spins), and the game config
//! singleton that holds the winner lock.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Participant;
use crate::ids::{SpinId, StrikeId};
use crate::keys::CandidateKey;

/// Number of candidate entries in one participant's submission.
pub const SUBMISSION_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// CandidateEntry
// ---------------------------------------------------------------------------

/// A destination proposed by one participant.
///
/// Entries are immutable once accepted; they are destroyed only by a full
/// game reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CandidateEntry {
    /// Destination city name, as entered.
    pub name: String,
    /// Optional region or country, as entered.
    pub region: Option<String>,
    /// Which participant proposed this destination.
    pub submitted_by: Participant,
}

impl CandidateEntry {
    /// Create a new candidate entry.
    pub fn new(name: impl Into<String>, region: Option<String>, submitted_by: Participant) -> Self {
        Self {
            name: name.into(),
            region,
            submitted_by,
        }
    }

    /// Derive the identity key for deduplication and the logs.
    pub fn key(&self) -> CandidateKey {
        CandidateKey::new(&self.name, self.region.as_deref())
    }

    /// Human-readable label ("Porto, Portugal" or just "Porto").
    pub fn display_name(&self) -> String {
        match &self.region {
            Some(region) if !region.trim().is_empty() => format!("{}, {}", self.name, region),
            _ => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// One participant's accepted list of exactly five candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Submission {
    /// The submitting participant. All entries carry the same attribution.
    pub participant: Participant,
    /// The ordered candidate entries.
    pub entries: Vec<CandidateEntry>,
    /// When the submission was accepted.
    pub submitted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// MergedPool
// ---------------------------------------------------------------------------

/// The deduplicated union of both submissions.
///
/// Order is first-seen: player one's entries before player two's, original
/// submission order preserved inside each. Persisted once and treated as
/// an idempotent read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MergedPool {
    /// The pooled candidate entries.
    pub entries: Vec<CandidateEntry>,
}

impl MergedPool {
    /// Number of candidates in the pool.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool is empty (neither participant has submitted).
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the pool contains a candidate with the given key.
    pub fn contains_key(&self, key: &CandidateKey) -> bool {
        self.entries.iter().any(|e| &e.key() == key)
    }

    /// Look up the entry for a candidate key.
    pub fn entry(&self, key: &CandidateKey) -> Option<&CandidateEntry> {
        self.entries.iter().find(|e| &e.key() == key)
    }
}

// ---------------------------------------------------------------------------
// EliminationRecord
// ---------------------------------------------------------------------------

/// A permanent "strike" removing one candidate from contention.
///
/// Append-only: once written there is no API to remove it. The surrounding
/// UI asks for explicit confirmation precisely because there is no undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EliminationRecord {
    /// Record identifier (time-ordered).
    pub id: StrikeId,
    /// Identity key of the eliminated candidate.
    pub candidate: CandidateKey,
    /// Display name, carried so the record renders without a pool lookup.
    pub name: String,
    /// Display region, if any.
    pub region: Option<String>,
    /// Which participant struck the candidate.
    pub eliminated_by: Participant,
    /// Local calendar date the strike counts against (quota accounting).
    pub date: NaiveDate,
    /// When the record was written.
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// SpinRecord
// ---------------------------------------------------------------------------

/// A scoring event awarding points to one surviving candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SpinRecord {
    /// Record identifier (time-ordered).
    pub id: SpinId,
    /// Which participant spun.
    pub participant: Participant,
    /// The scored candidate.
    pub candidate: CandidateKey,
    /// Display name of the scored candidate.
    pub name: String,
    /// Local calendar date of the spin (daily-gate accounting).
    pub date: NaiveDate,
    /// Points awarded, at least 1.
    pub points: u32,
    /// When the record was written.
    pub occurred_at: DateTime<Utc>,
    /// Tie-break spins are scored separately and never enter the main tally.
    #[serde(default)]
    pub is_tie_break: bool,
}

// ---------------------------------------------------------------------------
// SpinOutcome
// ---------------------------------------------------------------------------

/// The result of one spin action: three displayed reels plus the records
/// that were actually scored (which reels score depends on the spin mode).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SpinOutcome {
    /// The three reel results, in display order.
    pub reels: [CandidateKey; 3],
    /// The scored records appended to the spin log.
    pub records: Vec<SpinRecord>,
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// The game config singleton.
///
/// Mutated only by the winner resolver. Once `winner_locked` is true the
/// stored value is immutable truth: readers must return it as-is and never
/// recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameConfig {
    /// Whether the winner is permanently locked.
    #[serde(default)]
    pub winner_locked: bool,
    /// The locked winner, present iff `winner_locked`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<CandidateKey>,
    /// The two finalists of an established tie, if the resolver reached
    /// the tie-break sub-state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalist_pair: Option<[CandidateKey; 2]>,
    /// Optional phase override (testing aid); unparseable values are
    /// ignored in favor of the date-derived phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_override: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(name: &str, region: Option<&str>, by: Participant) -> CandidateEntry {
        CandidateEntry::new(name, region.map(str::to_owned), by)
    }

    #[test]
    fn display_name_includes_region_when_present() {
        let e = entry("Porto", Some("Portugal"), Participant::PlayerOne);
        assert_eq!(e.display_name(), "Porto, Portugal");
        let e = entry("Malta", None, Participant::PlayerOne);
        assert_eq!(e.display_name(), "Malta");
        let e = entry("Malta", Some("  "), Participant::PlayerOne);
        assert_eq!(e.display_name(), "Malta");
    }

    #[test]
    fn pool_lookup_is_key_based() {
        let pool = MergedPool {
            entries: vec![
                entry("Malta", None, Participant::PlayerOne),
                entry("Gdansk", Some("Poland"), Participant::PlayerTwo),
            ],
        };
        assert_eq!(pool.len(), 2);
        assert!(pool.contains_key(&CandidateKey::new("malta", None)));
        assert!(pool.contains_key(&CandidateKey::new("GDANSK", Some("poland"))));
        assert!(!pool.contains_key(&CandidateKey::new("Gdansk", None)));
        let found = pool.entry(&CandidateKey::new("Malta", None)).unwrap();
        assert_eq!(found.name, "Malta");
    }

    #[test]
    fn game_config_defaults_to_unlocked() {
        let cfg = GameConfig::default();
        assert!(!cfg.winner_locked);
        assert!(cfg.winner.is_none());
        assert!(cfg.finalist_pair.is_none());
    }

    #[test]
    fn game_config_tolerates_missing_fields_on_the_wire() {
        let cfg: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn spin_record_round_trips_through_json() {
        let record = SpinRecord {
            id: SpinId::new(),
            participant: Participant::PlayerTwo,
            candidate: CandidateKey::new("Malta", None),
            name: "Malta".to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(),
            points: 1,
            occurred_at: Utc::now(),
            is_tie_break: false,
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: SpinRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
