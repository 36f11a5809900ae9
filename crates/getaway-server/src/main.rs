//! API server binary for the Getaway destination game.
//!
//! Wires the storage backend, the game service, and the Axum router
//! together from environment configuration and serves until terminated.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Select the storage backend (`DATABASE_URL` / `REDIS_URL` / memory)
//! 3. Read the access tokens and spin mode
//! 4. Build the game service and shared state
//! 5. Bind and serve
//!
//! # Environment
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `GETAWAY_PORT` | TCP port (default 8080) |
//! | `DATABASE_URL` | `PostgreSQL` backend |
//! | `REDIS_URL` | Redis backend (when no `DATABASE_URL`) |
//! | `GETAWAY_TOKEN_PLAYER_ONE` | Player one's access token |
//! | `GETAWAY_TOKEN_PLAYER_TWO` | Player two's access token |
//! | `GETAWAY_SPIN_MODE` | `middle` (default) or `all-three` |
//! | `RUST_LOG` | Log filter (default `info`) |

use std::sync::Arc;

use getaway_engine::{AccessTokens, GameService};
use getaway_server::{start_server, AppState, ServerConfig};
use getaway_store::Store;
use getaway_types::SpinMode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Default TCP port when `GETAWAY_PORT` is unset.
const DEFAULT_PORT: u16 = 8080;

/// Application entry point for the API server.
///
/// # Errors
///
/// Returns an error if the storage backend cannot be reached or the
/// listener cannot bind.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("getaway-server starting");

    // 2. Select the storage backend.
    let store = Store::from_env().await?;
    info!(backend = store.backend_label(), "Storage backend selected");

    // 3. Read tokens and the spin scoring convention.
    let tokens = AccessTokens::from_env();
    let spin_mode = match std::env::var("GETAWAY_SPIN_MODE").ok().as_deref() {
        Some("all-three" | "all_three") => SpinMode::AllThreeCount,
        _ => SpinMode::MiddleCounts,
    };
    info!(?spin_mode, "Spin mode configured");

    // 4. Build the game service and shared state.
    let service = GameService::new(store).with_spin_mode(spin_mode);
    let state = Arc::new(AppState::new(service, tokens));

    // 5. Bind and serve.
    let port = std::env::var("GETAWAY_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let config = ServerConfig {
        host: String::from("0.0.0.0"),
        port,
    };
    start_server(&config, state).await?;

    Ok(())
}
