//! HTTP API server for the Getaway destination game.
//!
//! A thin Axum shell over the game service: the two clients poll the
//! read endpoints and perform their writes (submission, elimination,
//! spin, winner resolution) through token-gated POST routes.
//!
//! # Modules
//!
//! - [`router`] -- route table and middleware
//! - [`handlers`] -- endpoint handlers
//! - [`state`] -- shared application state
//! - [`server`] -- TCP bind and serve loop
//! - [`error`] -- API error responses

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
