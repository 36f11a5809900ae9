//! Winner resolution and the tie-break protocol.
//!
//! Resolution is a small state machine over the surviving set, the spin
//! log, and the config singleton. The only persisted transitions are
//! selecting the finalist pair and locking the winner; both belong to the
//! engine layer, which must apply them compare-and-set style. Everything
//! here is pure.
//!
//! The tie-break intentionally reuses the same uniform three-reel draw as
//! ordinary spins and then counts the majority mechanically: every draw
//! is auditable from the persisted spin log, which is what the fairness
//! argument rests on. No separate coin-flip mechanism exists.

use rand::Rng;

use getaway_types::{CandidateEntry, CandidateKey, GameConfig, SpinRecord};

use crate::scoring::{standings, tally, tie_break_outcomes};

/// Outcome of a pure resolution pass.
///
/// `Leader` and `TieBetween` require a persisted follow-up (locking the
/// winner, storing the finalist pair); the engine performs those writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The config already holds a locked winner; terminal, never recompute.
    Locked(CandidateKey),
    /// No winner can be determined yet (fewer than two survivors, or no
    /// points on the board). Not an error; the next caller retries.
    NoContest,
    /// A strict leader exists and should be locked as the winner.
    Leader(CandidateKey),
    /// The top standings are tied; the pair should be persisted and a
    /// tie-break spin performed.
    TieBetween([CandidateKey; 2]),
    /// The recorded tie-break outcomes decide this winner; it should be
    /// locked.
    TieBreakDecided(CandidateKey),
}

/// Run one pure resolution pass.
///
/// State machine, in order:
/// 1. a locked config wins unconditionally;
/// 2. fewer than two survivors, or a scoreless board, is no contest;
/// 3. an established finalist pair with three recorded tie-break outcomes
///    resolves by majority; with fewer outcomes the tie-break is still
///    pending;
/// 4. otherwise the main standings decide: strict leader, or a fresh tie
///    between the top two.
pub fn resolve(
    surviving: &[CandidateEntry],
    spin_log: &[SpinRecord],
    config: &GameConfig,
) -> Resolution {
    if config.winner_locked {
        if let Some(winner) = &config.winner {
            return Resolution::Locked(winner.clone());
        }
    }

    if surviving.len() < 2 {
        return Resolution::NoContest;
    }

    if let Some(pair) = &config.finalist_pair {
        let outcomes = tie_break_outcomes(pair, spin_log);
        let keys: Vec<CandidateKey> = outcomes.iter().map(|r| r.candidate.clone()).collect();
        // A double-fired tie-break (benign race) may have appended more
        // than three records; the latest three decide.
        if keys.len() >= 3 {
            let last_three: Vec<CandidateKey> =
                keys.iter().rev().take(3).rev().cloned().collect();
            let winner = tie_break_winner(pair, &last_three);
            tracing::debug!(%winner, "tie-break outcomes decide the winner");
            return Resolution::TieBreakDecided(winner);
        }
        return Resolution::TieBetween(pair.clone());
    }

    let rows = standings(&tally(surviving, spin_log));
    let Some((leader, top_points)) = rows.first().cloned() else {
        return Resolution::NoContest;
    };
    if top_points == 0 {
        // Nothing on the board yet; standings of all zeroes never
        // produce a winner.
        return Resolution::NoContest;
    }
    let runner_up_points = rows.get(1).map_or(0, |(_, p)| *p);
    if top_points > runner_up_points {
        return Resolution::Leader(leader);
    }

    select_finalists(&rows).map_or(Resolution::NoContest, Resolution::TieBetween)
}

/// Select the finalist pair from sorted standings.
///
/// Exactly the top two by points; when more than two tie for the lead,
/// the pair is the two with the alphabetically lowest keys, for
/// determinism. Returns `None` when there is a strict leader or fewer
/// than two rows.
pub fn select_finalists(rows: &[(CandidateKey, u64)]) -> Option<[CandidateKey; 2]> {
    let (_, top_points) = rows.first()?;
    let mut tied = rows.iter().filter(|(_, p)| p == top_points);
    let first = tied.next()?;
    let second = tied.next()?;
    // Standings sort key-ascending within equal points, so the first two
    // tied rows are already the alphabetically lowest.
    Some([first.0.clone(), second.0.clone()])
}

/// Decide the tie-break by majority over three outcomes.
///
/// With two finalists and three outcomes a majority (at least 2 of 3)
/// always exists, so this always terminates in one round. Outcomes not
/// matching either finalist are ignored.
pub fn tie_break_winner(pair: &[CandidateKey; 2], outcomes: &[CandidateKey]) -> CandidateKey {
    let [first, second] = pair;
    let first_count = outcomes.iter().filter(|k| *k == first).count();
    let second_count = outcomes.iter().filter(|k| *k == second).count();
    if first_count >= second_count {
        first.clone()
    } else {
        second.clone()
    }
}

/// Draw three reel outcomes uniformly from a candidate list.
///
/// The same draw backs ordinary spins and the tie-break spin. Returns
/// `None` for an empty list. Repeats are expected and meaningful -- the
/// tie-break majority depends on them.
pub fn draw_three<'a, T>(items: &'a [T], rng: &mut impl Rng) -> Option<[&'a T; 3]> {
    if items.is_empty() {
        return None;
    }
    let mut pick = || items.get(rng.random_range(0..items.len()));
    match (pick(), pick(), pick()) {
        (Some(a), Some(b), Some(c)) => Some([a, b, c]),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use getaway_types::{Participant, SpinId};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn key(name: &str) -> CandidateKey {
        CandidateKey::new(name, None)
    }

    fn survivors(names: &[&str]) -> Vec<CandidateEntry> {
        names
            .iter()
            .map(|n| CandidateEntry::new(*n, None, Participant::PlayerOne))
            .collect()
    }

    fn spin(name: &str, points: u32, tie_break: bool) -> SpinRecord {
        SpinRecord {
            id: SpinId::new(),
            participant: Participant::PlayerOne,
            candidate: key(name),
            name: name.to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 2, 6).unwrap(),
            points,
            occurred_at: Utc::now(),
            is_tie_break: tie_break,
        }
    }

    #[test]
    fn locked_config_short_circuits_everything() {
        let config = GameConfig {
            winner_locked: true,
            winner: Some(key("Malta")),
            ..GameConfig::default()
        };
        // Contradictory spin log: Gdansk is far ahead. The lock wins.
        let log = vec![spin("Gdansk", 99, false)];
        let result = resolve(&survivors(&["Malta", "Gdansk"]), &log, &config);
        assert_eq!(result, Resolution::Locked(key("Malta")));
    }

    #[test]
    fn fewer_than_two_survivors_is_no_contest() {
        let config = GameConfig::default();
        let log = vec![spin("Malta", 5, false)];
        assert_eq!(
            resolve(&survivors(&["Malta"]), &log, &config),
            Resolution::NoContest
        );
        assert_eq!(resolve(&[], &log, &config), Resolution::NoContest);
    }

    #[test]
    fn scoreless_board_is_no_contest() {
        let config = GameConfig::default();
        assert_eq!(
            resolve(&survivors(&["Malta", "Gdansk"]), &[], &config),
            Resolution::NoContest
        );
    }

    #[test]
    fn strict_leader_wins() {
        let config = GameConfig::default();
        let log = vec![spin("Malta", 5, false), spin("Gdansk", 3, false)];
        assert_eq!(
            resolve(&survivors(&["Malta", "Gdansk", "Porto"]), &log, &config),
            Resolution::Leader(key("Malta"))
        );
    }

    #[test]
    fn natural_tie_selects_the_top_two() {
        let config = GameConfig::default();
        let log = vec![
            spin("Malta", 5, false),
            spin("Gdansk", 5, false),
            spin("Porto", 2, false),
        ];
        assert_eq!(
            resolve(&survivors(&["Malta", "Gdansk", "Porto"]), &log, &config),
            Resolution::TieBetween([key("gdansk"), key("malta")])
        );
    }

    #[test]
    fn three_way_tie_picks_the_two_lowest_keys() {
        let rows = vec![
            (key("cyprus"), 4),
            (key("malta"), 4),
            (key("porto"), 4),
            (key("gdansk"), 1),
        ];
        assert_eq!(
            select_finalists(&rows),
            Some([key("cyprus"), key("malta")])
        );
    }

    #[test]
    fn established_pair_is_adopted_verbatim() {
        // Even if the standings have since drifted, a stored pair stands.
        let config = GameConfig {
            finalist_pair: Some([key("gdansk"), key("malta")]),
            ..GameConfig::default()
        };
        let log = vec![spin("Porto", 9, false)];
        assert_eq!(
            resolve(&survivors(&["Malta", "Gdansk", "Porto"]), &log, &config),
            Resolution::TieBetween([key("gdansk"), key("malta")])
        );
    }

    #[test]
    fn tie_break_majority_two_of_three() {
        let pair = [key("malta"), key("gdansk")];
        assert_eq!(
            tie_break_winner(&pair, &[key("malta"), key("malta"), key("gdansk")]),
            key("malta")
        );
        assert_eq!(
            tie_break_winner(&pair, &[key("malta"), key("gdansk"), key("malta")]),
            key("malta")
        );
        assert_eq!(
            tie_break_winner(&pair, &[key("gdansk"), key("gdansk"), key("malta")]),
            key("gdansk")
        );
    }

    #[test]
    fn recorded_tie_break_outcomes_decide() {
        let config = GameConfig {
            finalist_pair: Some([key("gdansk"), key("malta")]),
            ..GameConfig::default()
        };
        let log = vec![
            spin("Malta", 5, false),
            spin("Gdansk", 5, false),
            spin("Malta", 1, true),
            spin("Malta", 1, true),
            spin("Gdansk", 1, true),
        ];
        assert_eq!(
            resolve(&survivors(&["Malta", "Gdansk"]), &log, &config),
            Resolution::TieBreakDecided(key("malta"))
        );
    }

    #[test]
    fn incomplete_tie_break_stays_pending() {
        let config = GameConfig {
            finalist_pair: Some([key("gdansk"), key("malta")]),
            ..GameConfig::default()
        };
        let log = vec![spin("Malta", 1, true), spin("Gdansk", 1, true)];
        assert_eq!(
            resolve(&survivors(&["Malta", "Gdansk"]), &log, &config),
            Resolution::TieBetween([key("gdansk"), key("malta")])
        );
    }

    #[test]
    fn double_fired_tie_break_resolves_on_the_latest_three() {
        let config = GameConfig {
            finalist_pair: Some([key("gdansk"), key("malta")]),
            ..GameConfig::default()
        };
        // First round: Malta majority. Second round: Gdansk majority.
        // The latest three outcomes decide.
        let log = vec![
            spin("Malta", 1, true),
            spin("Malta", 1, true),
            spin("Gdansk", 1, true),
            spin("Gdansk", 1, true),
            spin("Gdansk", 1, true),
            spin("Malta", 1, true),
        ];
        assert_eq!(
            resolve(&survivors(&["Malta", "Gdansk"]), &log, &config),
            Resolution::TieBreakDecided(key("gdansk"))
        );
    }

    #[test]
    fn draw_three_covers_the_list_and_allows_repeats() {
        let items = vec!["Malta", "Gdansk"];
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let reels = draw_three(&items, &mut rng).unwrap();
            for reel in reels {
                assert!(items.contains(reel));
            }
        }
    }

    #[test]
    fn draw_three_on_empty_is_none() {
        let items: Vec<&str> = Vec::new();
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(draw_three(&items, &mut rng).is_none());
    }
}
