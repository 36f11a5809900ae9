//! Spin-point accumulation.
//!
//! The accumulator sums whatever records it is given; whether a spin
//! scores one candidate or three is the caller's convention. Tie-break
//! spins never enter the main tally -- they are scored separately and
//! consulted only once a tie is already established.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use getaway_types::{CandidateEntry, CandidateKey, Participant, SpinRecord};

/// Sum points per surviving candidate from the spin log.
///
/// Every surviving candidate appears in the result, zero-initialized, so
/// standings can compare leaders against unscored survivors. Records for
/// eliminated candidates and records flagged `is_tie_break` are excluded.
pub fn tally(
    surviving: &[CandidateEntry],
    spin_log: &[SpinRecord],
) -> BTreeMap<CandidateKey, u64> {
    let mut points: BTreeMap<CandidateKey, u64> =
        surviving.iter().map(|e| (e.key(), 0)).collect();
    for record in spin_log {
        if record.is_tie_break {
            continue;
        }
        if let Some(total) = points.get_mut(&record.candidate) {
            *total = total.saturating_add(u64::from(record.points));
        }
    }
    points
}

/// Standings sorted by points descending, key ascending for determinism.
pub fn standings(points: &BTreeMap<CandidateKey, u64>) -> Vec<(CandidateKey, u64)> {
    let mut rows: Vec<(CandidateKey, u64)> =
        points.iter().map(|(k, p)| (k.clone(), *p)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// Whether a participant has already performed their daily spin.
///
/// At most one spin action per participant per local calendar day.
/// Tie-break spins do not consume the daily allowance.
pub fn has_spun_today(
    participant: Participant,
    date: NaiveDate,
    spin_log: &[SpinRecord],
) -> bool {
    spin_log
        .iter()
        .any(|r| !r.is_tie_break && r.participant == participant && r.date == date)
}

/// The tie-break outcomes recorded for a finalist pair, in log order.
///
/// Only records flagged `is_tie_break` whose candidate is one of the two
/// finalists count; anything else in the log is ignored.
pub fn tie_break_outcomes<'a>(
    pair: &[CandidateKey; 2],
    spin_log: &'a [SpinRecord],
) -> Vec<&'a SpinRecord> {
    spin_log
        .iter()
        .filter(|r| r.is_tie_break && pair.contains(&r.candidate))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use getaway_types::SpinId;

    fn survivors(names: &[&str]) -> Vec<CandidateEntry> {
        names
            .iter()
            .map(|n| CandidateEntry::new(*n, None, Participant::PlayerOne))
            .collect()
    }

    fn spin(name: &str, by: Participant, points: u32, tie_break: bool) -> SpinRecord {
        SpinRecord {
            id: SpinId::new(),
            participant: by,
            candidate: CandidateKey::new(name, None),
            name: name.to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 2, 5).unwrap(),
            points,
            occurred_at: Utc::now(),
            is_tie_break: tie_break,
        }
    }

    #[test]
    fn tally_sums_points_for_survivors_only() {
        let alive = survivors(&["Malta", "Gdansk"]);
        let log = vec![
            spin("Malta", Participant::PlayerOne, 1, false),
            spin("Malta", Participant::PlayerTwo, 2, false),
            // Naples was eliminated; its points must not count.
            spin("Naples", Participant::PlayerOne, 5, false),
        ];
        let points = tally(&alive, &log);
        assert_eq!(points.get(&CandidateKey::new("Malta", None)), Some(&3));
        assert_eq!(points.get(&CandidateKey::new("Gdansk", None)), Some(&0));
        assert_eq!(points.get(&CandidateKey::new("Naples", None)), None);
    }

    #[test]
    fn tie_break_records_never_enter_the_main_tally() {
        let alive = survivors(&["Malta", "Gdansk"]);
        let log = vec![
            spin("Malta", Participant::PlayerOne, 1, false),
            spin("Gdansk", Participant::PlayerOne, 1, true),
            spin("Gdansk", Participant::PlayerTwo, 1, true),
        ];
        let points = tally(&alive, &log);
        assert_eq!(points.get(&CandidateKey::new("Malta", None)), Some(&1));
        assert_eq!(points.get(&CandidateKey::new("Gdansk", None)), Some(&0));
    }

    #[test]
    fn standings_sort_by_points_then_key() {
        let alive = survivors(&["Malta", "Gdansk", "Porto"]);
        let log = vec![
            spin("Porto", Participant::PlayerOne, 2, false),
            spin("Malta", Participant::PlayerTwo, 2, false),
        ];
        let rows = standings(&tally(&alive, &log));
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        // Equal points resolve alphabetically; unscored survivors trail.
        assert_eq!(keys, vec!["malta|", "porto|", "gdansk|"]);
    }

    #[test]
    fn daily_spin_gate_is_per_participant_per_date() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        let other_date = NaiveDate::from_ymd_opt(2026, 2, 6).unwrap();
        let log = vec![spin("Malta", Participant::PlayerOne, 1, false)];

        assert!(has_spun_today(Participant::PlayerOne, date, &log));
        assert!(!has_spun_today(Participant::PlayerTwo, date, &log));
        assert!(!has_spun_today(Participant::PlayerOne, other_date, &log));
    }

    #[test]
    fn tie_break_spins_do_not_consume_the_daily_spin() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 5).unwrap();
        let log = vec![spin("Malta", Participant::PlayerOne, 1, true)];
        assert!(!has_spun_today(Participant::PlayerOne, date, &log));
    }

    #[test]
    fn tie_break_outcomes_filter_to_the_pair() {
        let pair = [
            CandidateKey::new("Malta", None),
            CandidateKey::new("Gdansk", None),
        ];
        let log = vec![
            spin("Malta", Participant::PlayerOne, 1, true),
            spin("Porto", Participant::PlayerOne, 1, true),
            spin("Gdansk", Participant::PlayerOne, 1, true),
            spin("Malta", Participant::PlayerOne, 1, false),
        ];
        let outcomes = tie_break_outcomes(&pair, &log);
        let names: Vec<&str> = outcomes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Malta", "Gdansk"]);
    }
}
