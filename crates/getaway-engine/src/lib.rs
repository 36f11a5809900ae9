//! Storage-backed game service for the Getaway destination game.
//!
//! Sits between the pure core logic and the persistence layer: accepts
//! submissions, combines the pool once, records eliminations and spins,
//! and resolves the winner under the compare-and-set lock discipline.
//! The HTTP server crate is a thin shell over [`GameService`].
//!
//! # Modules
//!
//! - [`service`] -- the [`GameService`] operations
//! - [`auth`] -- access-token validation for the two participants
//! - [`error`] -- the [`EngineError`] taxonomy

pub mod auth;
pub mod error;
pub mod service;

// Re-export primary types for convenience.
pub use auth::AccessTokens;
pub use error::EngineError;
pub use service::GameService;
