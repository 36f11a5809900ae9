//! Shared type definitions for the Getaway destination game.
//!
//! This crate is the single source of truth for all types used across the
//! Getaway workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the web client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for append-only record identifiers
//! - [`keys`] -- Candidate identity keys (the dedup/log identity)
//! - [`enums`] -- Participants, phases, spin modes, winner results
//! - [`structs`] -- Entries, submissions, pool, logs, game config

pub mod enums;
pub mod ids;
pub mod keys;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Participant, Phase, SpinMode, WinnerResult};
pub use ids::{SpinId, StrikeId};
pub use keys::CandidateKey;
pub use structs::{
    CandidateEntry, EliminationRecord, GameConfig, MergedPool, SpinOutcome, SpinRecord,
    Submission, SUBMISSION_SIZE,
};
