//! Phase schedule and pure game logic for the Getaway destination game.
//!
//! Everything in this crate is a pure function over already-fetched state:
//! no storage, no clocks, no side effects. The engine crate layers
//! persistence and the compare-and-set winner lock on top.
//!
//! # Modules
//!
//! - [`schedule`] -- Event calendar, phase derivation from wall-clock
//!   time, per-day strike quotas.
//! - [`roster`] -- Submission validation and merge/dedup into the pool.
//! - [`elimination`] -- Strike quota checks and the surviving set.
//! - [`scoring`] -- Spin-point tallies and the daily spin gate.
//! - [`winner`] -- Resolution state machine, finalist selection,
//!   tie-break majority, and the shared three-reel draw.

pub mod elimination;
pub mod roster;
pub mod schedule;
pub mod scoring;
pub mod winner;

// Re-export the primary entry points at crate root for convenience.
pub use elimination::{can_eliminate, check_elimination, surviving_set, EliminationError};
pub use roster::{has_both_submitted, merge, validate_submission, ValidationError};
pub use schedule::{Schedule, ScheduleError, EVENT_TZ};
pub use scoring::{has_spun_today, standings, tally, tie_break_outcomes};
pub use winner::{draw_three, resolve, select_finalists, tie_break_winner, Resolution};
