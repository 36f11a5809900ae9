//! Enumeration types for the Getaway destination game.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::keys::CandidateKey;

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// One of the two fixed players.
///
/// The game is built for exactly two participants known at compile time.
/// Every submission, elimination, and spin is attributed to one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    /// The first player.
    PlayerOne,
    /// The second player.
    PlayerTwo,
}

impl Participant {
    /// Both participants, in canonical order.
    pub const BOTH: [Self; 2] = [Self::PlayerOne, Self::PlayerTwo];

    /// Return the opposing participant.
    pub const fn other(self) -> Self {
        match self {
            Self::PlayerOne => Self::PlayerTwo,
            Self::PlayerTwo => Self::PlayerOne,
        }
    }

    /// Stable slug used in storage keys and URL path segments.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::PlayerOne => "player-one",
            Self::PlayerTwo => "player-two",
        }
    }

    /// Parse a slug back into a participant. Accepts both kebab-case and
    /// snake_case spellings.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "player-one" | "player_one" => Some(Self::PlayerOne),
            "player-two" | "player_two" => Some(Self::PlayerTwo),
            _ => None,
        }
    }
}

impl core::fmt::Display for Participant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.slug())
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The named phases of the game, derived from wall-clock time.
///
/// Phases form a strictly ordered sequence; the schedule maps any instant
/// to exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before the event starts: nothing to do but wait.
    Countdown,
    /// Submission day: each participant enters their five candidates.
    SubmissionOpen,
    /// Elimination days: participants strike cities under a daily quota.
    Elimination,
    /// A spin-window day before the daily opening time.
    CountdownToSpin,
    /// A spin-window day after the daily opening time: one spin each.
    SpinOpen,
    /// The finale instant has passed: the winner may be resolved.
    Finale,
}

impl Phase {
    /// Parse a lenient phase name, as used by the override mechanism.
    ///
    /// Accepts kebab-case and snake_case. Returns `None` for anything
    /// unrecognized; callers fall back to date-derived computation.
    pub fn parse_override(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "countdown" => Some(Self::Countdown),
            "submission-open" | "submission_open" => Some(Self::SubmissionOpen),
            "elimination" => Some(Self::Elimination),
            "countdown-to-spin" | "countdown_to_spin" => Some(Self::CountdownToSpin),
            "spin-open" | "spin_open" => Some(Self::SpinOpen),
            "finale" => Some(Self::Finale),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SpinMode
// ---------------------------------------------------------------------------

/// Which of the three displayed reel outcomes of a spin are scored.
///
/// The scoring accumulator simply sums whatever records it is given;
/// this convention is a configuration concern of the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum SpinMode {
    /// Only the middle reel scores, one point per spin.
    #[default]
    MiddleCounts,
    /// All three reels score, one point each.
    AllThreeCount,
}

// ---------------------------------------------------------------------------
// WinnerResult
// ---------------------------------------------------------------------------

/// Outcome of a winner-resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WinnerResult {
    /// No winner can be determined yet; the next caller retries.
    Pending,
    /// The top standings are tied; a deciding spin between the two
    /// finalists is required.
    TieBreakPending {
        /// The two candidates tied for the lead.
        finalists: [CandidateKey; 2],
    },
    /// The winner is locked; this value never changes again.
    Resolved {
        /// The winning candidate.
        winner: CandidateKey,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_flips_between_the_two_players() {
        assert_eq!(Participant::PlayerOne.other(), Participant::PlayerTwo);
        assert_eq!(Participant::PlayerTwo.other(), Participant::PlayerOne);
    }

    #[test]
    fn slug_round_trips() {
        for p in Participant::BOTH {
            assert_eq!(Participant::from_slug(p.slug()), Some(p));
        }
        assert_eq!(Participant::from_slug("player_one"), Some(Participant::PlayerOne));
        assert_eq!(Participant::from_slug("nobody"), None);
    }

    #[test]
    fn phase_override_parses_leniently() {
        assert_eq!(Phase::parse_override("spin-open"), Some(Phase::SpinOpen));
        assert_eq!(Phase::parse_override("SPIN_OPEN"), Some(Phase::SpinOpen));
        assert_eq!(Phase::parse_override(" finale "), Some(Phase::Finale));
        assert_eq!(Phase::parse_override("warmup"), None);
    }

    #[test]
    fn phases_are_ordered() {
        assert!(Phase::Countdown < Phase::SubmissionOpen);
        assert!(Phase::SubmissionOpen < Phase::Elimination);
        assert!(Phase::SpinOpen < Phase::Finale);
    }
}
