//! Event schedule and phase resolution.
//!
//! The schedule is the single source of truth for all temporal state in
//! the game. It maps wall-clock time (in the fixed event timezone) to one
//! of the named [`Phase`]s and holds the per-day elimination quotas.
//!
//! # Design Principles
//!
//! - Phase derivation is a pure function of the current instant -- never
//!   stored, always recomputed.
//! - Calendar comparisons use local dates in the event timezone; the
//!   finale transition compares full timestamps, because it is an instant
//!   (20:00 on the last day), not a date.
//! - Phase resolution never fails: an unparseable override falls back to
//!   the date-derived phase.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use getaway_types::Phase;

/// The fixed timezone all calendar boundaries are defined in.
pub const EVENT_TZ: Tz = chrono_tz::Europe::Amsterdam;

/// Errors that can occur when constructing a schedule.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Invalid schedule configuration (e.g. empty elimination days).
    #[error("invalid schedule: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// The calendar for one event instance.
///
/// Phase boundaries are hard-coded calendar dates for a single event;
/// this is not a general scheduling framework. [`Schedule::standard`]
/// returns the production instance; [`Schedule::from_parts`] exists for
/// tests and hypothetical reruns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// The day both participants enter their five candidates.
    submission_day: NaiveDate,

    /// Elimination days with their per-participant strike quotas.
    elimination_days: Vec<(NaiveDate, u32)>,

    /// First and last day (inclusive) of the spin window.
    spin_days: (NaiveDate, NaiveDate),

    /// Local time of day at which spinning opens on each spin day.
    spin_opens_at: NaiveTime,

    /// The instant from which the winner may be resolved.
    finale_at: DateTime<Utc>,

    /// The instant from which the result becomes visible.
    reveal_at: DateTime<Utc>,
}

impl Schedule {
    /// The production schedule: submission on 1 Feb 2026, eliminations on
    /// 2 Feb (quota 1) and 3 Feb (quota 2), spins 4--7 Feb opening daily
    /// at 10:00, finale at 20:00 and reveal at 20:30 on 7 Feb, all in
    /// the event timezone.
    pub fn standard() -> Self {
        Self {
            submission_day: ymd(2026, 2, 1),
            elimination_days: vec![(ymd(2026, 2, 2), 1), (ymd(2026, 2, 3), 2)],
            spin_days: (ymd(2026, 2, 4), ymd(2026, 2, 7)),
            spin_opens_at: hm(10, 0),
            finale_at: local_instant(ymd(2026, 2, 7), hm(20, 0)),
            reveal_at: local_instant(ymd(2026, 2, 7), hm(20, 30)),
        }
    }

    /// Create a schedule from explicit parts (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidConfig`] if the elimination day
    /// list is empty, the spin window is inverted, or the reveal precedes
    /// the finale.
    pub fn from_parts(
        submission_day: NaiveDate,
        elimination_days: Vec<(NaiveDate, u32)>,
        spin_days: (NaiveDate, NaiveDate),
        spin_opens_at: NaiveTime,
        finale_at: DateTime<Utc>,
        reveal_at: DateTime<Utc>,
    ) -> Result<Self, ScheduleError> {
        if elimination_days.is_empty() {
            return Err(ScheduleError::InvalidConfig {
                reason: "at least one elimination day must be configured".to_owned(),
            });
        }
        if spin_days.0 > spin_days.1 {
            return Err(ScheduleError::InvalidConfig {
                reason: "spin window start is after its end".to_owned(),
            });
        }
        if reveal_at < finale_at {
            return Err(ScheduleError::InvalidConfig {
                reason: "reveal instant precedes the finale instant".to_owned(),
            });
        }
        Ok(Self {
            submission_day,
            elimination_days,
            spin_days,
            spin_opens_at,
            finale_at,
            reveal_at,
        })
    }

    /// Derive the current phase from an instant.
    ///
    /// The finale comparison uses the full timestamp; everything else is
    /// resolved on the local calendar date. Total over all inputs -- this
    /// function never fails.
    pub fn phase_at(&self, now: DateTime<Utc>) -> Phase {
        if now >= self.finale_at {
            return Phase::Finale;
        }

        let local = now.with_timezone(&EVENT_TZ);
        let date = local.date_naive();
        let (spin_start, spin_end) = self.spin_days;

        if date > spin_end {
            // The spin window has passed but the finale instant has not
            // arrived yet; only reachable with a finale after the window.
            return Phase::Finale;
        }
        if date >= spin_start {
            return if local.time() >= self.spin_opens_at {
                Phase::SpinOpen
            } else {
                Phase::CountdownToSpin
            };
        }
        if let Some(first_strike_day) = self.elimination_days.first().map(|(d, _)| *d) {
            if date >= first_strike_day {
                return Phase::Elimination;
            }
        }
        if date == self.submission_day {
            return Phase::SubmissionOpen;
        }
        Phase::Countdown
    }

    /// Derive the current phase, honoring an optional override string.
    ///
    /// A present, parseable override wins unconditionally; anything else
    /// falls back to [`Self::phase_at`].
    pub fn phase_with_override(&self, phase_override: Option<&str>, now: DateTime<Utc>) -> Phase {
        phase_override
            .and_then(Phase::parse_override)
            .unwrap_or_else(|| self.phase_at(now))
    }

    /// Per-participant strike quota for a local calendar date.
    ///
    /// Zero outside the configured elimination days.
    pub fn strike_quota_for(&self, date: NaiveDate) -> u32 {
        self.elimination_days
            .iter()
            .find(|(d, _)| *d == date)
            .map_or(0, |(_, quota)| *quota)
    }

    /// The local calendar date of an instant in the event timezone.
    pub fn local_date(now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&EVENT_TZ).date_naive()
    }

    /// The instant spinning opens on the given day.
    pub fn spin_open_instant(&self, date: NaiveDate) -> DateTime<Utc> {
        local_instant(date, self.spin_opens_at)
    }

    /// The instant from which the winner may be resolved.
    pub const fn finale_instant(&self) -> DateTime<Utc> {
        self.finale_at
    }

    /// The instant from which the result becomes visible.
    pub const fn reveal_instant(&self) -> DateTime<Utc> {
        self.reveal_at
    }

    /// The day both participants enter their candidates.
    pub const fn submission_day(&self) -> NaiveDate {
        self.submission_day
    }

    /// First and last day (inclusive) of the spin window.
    pub const fn spin_days(&self) -> (NaiveDate, NaiveDate) {
        self.spin_days
    }

    /// The next phase-boundary instant strictly after `now`, if any.
    ///
    /// Used by countdown displays ("next: spinning opens in ...").
    pub fn next_transition(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut boundaries = Vec::new();
        boundaries.push(local_instant(self.submission_day, midnight()));
        for (date, _) in &self.elimination_days {
            boundaries.push(local_instant(*date, midnight()));
        }
        let (spin_start, spin_end) = self.spin_days;
        let mut day = spin_start;
        while day <= spin_end {
            boundaries.push(local_instant(day, midnight()));
            boundaries.push(self.spin_open_instant(day));
            day = day.succ_opt()?;
        }
        boundaries.push(self.finale_at);
        boundaries.push(self.reveal_at);

        boundaries.into_iter().filter(|b| *b > now).min()
    }
}

/// Build a local date from compile-time constants.
///
/// Falls back to [`NaiveDate::MIN`] on invalid input, which cannot happen
/// for the hard-coded production calendar.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Build a local time of day from compile-time constants.
fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Local midnight.
const fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

/// Convert a local date + time in the event timezone to a UTC instant.
///
/// `earliest()` resolves DST folds deterministically; DST gaps do not
/// occur at any boundary in the production calendar.
fn local_instant(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    EVENT_TZ
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map_or(DateTime::<Utc>::MIN_UTC, |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// An instant in the event timezone, as UTC.
    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        EVENT_TZ
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn before_the_event_is_countdown() {
        let s = Schedule::standard();
        assert_eq!(s.phase_at(at(2026, 1, 15, 12, 0, 0)), Phase::Countdown);
        assert_eq!(s.phase_at(at(2026, 1, 31, 23, 59, 59)), Phase::Countdown);
    }

    #[test]
    fn submission_day_reports_submission_open() {
        // The whole of 1 Feb is submission day, midnight to midnight.
        let s = Schedule::standard();
        assert_eq!(s.phase_at(at(2026, 2, 1, 0, 0, 0)), Phase::SubmissionOpen);
        assert_eq!(s.phase_at(at(2026, 2, 1, 12, 0, 0)), Phase::SubmissionOpen);
        assert_eq!(s.phase_at(at(2026, 2, 1, 23, 59, 59)), Phase::SubmissionOpen);
    }

    #[test]
    fn elimination_days_report_elimination() {
        let s = Schedule::standard();
        assert_eq!(s.phase_at(at(2026, 2, 2, 0, 0, 0)), Phase::Elimination);
        assert_eq!(s.phase_at(at(2026, 2, 3, 23, 59, 59)), Phase::Elimination);
    }

    #[test]
    fn strike_quotas_follow_the_calendar() {
        let s = Schedule::standard();
        assert_eq!(s.strike_quota_for(ymd(2026, 2, 2)), 1);
        assert_eq!(s.strike_quota_for(ymd(2026, 2, 3)), 2);
        assert_eq!(s.strike_quota_for(ymd(2026, 2, 1)), 0);
        assert_eq!(s.strike_quota_for(ymd(2026, 2, 4)), 0);
    }

    #[test]
    fn spin_days_open_at_ten_local() {
        let s = Schedule::standard();
        assert_eq!(s.phase_at(at(2026, 2, 4, 9, 59, 59)), Phase::CountdownToSpin);
        assert_eq!(s.phase_at(at(2026, 2, 4, 10, 0, 0)), Phase::SpinOpen);
        assert_eq!(s.phase_at(at(2026, 2, 6, 0, 0, 0)), Phase::CountdownToSpin);
        assert_eq!(s.phase_at(at(2026, 2, 6, 15, 30, 0)), Phase::SpinOpen);
    }

    #[test]
    fn finale_boundary_is_an_instant_not_a_date() {
        // One second before 20:00 local on the last spin day is still
        // SpinOpen; the finale must not swallow the whole day.
        let s = Schedule::standard();
        assert_eq!(s.phase_at(at(2026, 2, 7, 19, 59, 59)), Phase::SpinOpen);
        assert_eq!(s.phase_at(at(2026, 2, 7, 20, 0, 0)), Phase::Finale);
        assert_eq!(s.phase_at(at(2026, 2, 8, 3, 0, 0)), Phase::Finale);
        assert_eq!(s.phase_at(at(2026, 3, 1, 0, 0, 0)), Phase::Finale);
    }

    #[test]
    fn override_wins_when_parseable() {
        let s = Schedule::standard();
        let jan = at(2026, 1, 10, 12, 0, 0);
        assert_eq!(
            s.phase_with_override(Some("spin-open"), jan),
            Phase::SpinOpen
        );
        assert_eq!(
            s.phase_with_override(Some("not-a-phase"), jan),
            Phase::Countdown
        );
        assert_eq!(s.phase_with_override(None, jan), Phase::Countdown);
    }

    #[test]
    fn local_date_uses_the_event_timezone() {
        // 23:30 UTC on 1 Feb is already 2 Feb in Amsterdam (UTC+1).
        let utc = Utc.with_ymd_and_hms(2026, 2, 1, 23, 30, 0).single().unwrap();
        assert_eq!(Schedule::local_date(utc), ymd(2026, 2, 2));
    }

    #[test]
    fn next_transition_walks_the_calendar() {
        let s = Schedule::standard();
        // From mid-January the next boundary is submission-day midnight.
        let next = s.next_transition(at(2026, 1, 15, 12, 0, 0)).unwrap();
        assert_eq!(next, at(2026, 2, 1, 0, 0, 0));
        // From the morning of a spin day it is that day's 10:00 opening.
        let next = s.next_transition(at(2026, 2, 5, 8, 0, 0)).unwrap();
        assert_eq!(next, at(2026, 2, 5, 10, 0, 0));
        // From the final afternoon it is the 20:00 finale.
        let next = s.next_transition(at(2026, 2, 7, 15, 0, 0)).unwrap();
        assert_eq!(next, at(2026, 2, 7, 20, 0, 0));
        // After the reveal there is nothing left.
        assert_eq!(s.next_transition(at(2026, 2, 7, 21, 0, 0)), None);
    }

    #[test]
    fn from_parts_rejects_bad_calendars() {
        let result = Schedule::from_parts(
            ymd(2026, 2, 1),
            vec![],
            (ymd(2026, 2, 4), ymd(2026, 2, 7)),
            hm(10, 0),
            local_instant(ymd(2026, 2, 7), hm(20, 0)),
            local_instant(ymd(2026, 2, 7), hm(20, 30)),
        );
        assert!(result.is_err());

        let result = Schedule::from_parts(
            ymd(2026, 2, 1),
            vec![(ymd(2026, 2, 2), 1)],
            (ymd(2026, 2, 7), ymd(2026, 2, 4)),
            hm(10, 0),
            local_instant(ymd(2026, 2, 7), hm(20, 0)),
            local_instant(ymd(2026, 2, 7), hm(20, 30)),
        );
        assert!(result.is_err());
    }

    #[test]
    fn standard_schedule_is_internally_consistent() {
        let s = Schedule::standard();
        assert!(s.finale_instant() < s.reveal_instant());
        assert_eq!(s.submission_day(), ymd(2026, 2, 1));
        assert_eq!(s.spin_days(), (ymd(2026, 2, 4), ymd(2026, 2, 7)));
    }
}
