//! REST API endpoint handlers.
//!
//! Reads are open (both clients poll each other's progress); writes are
//! gated by the per-participant access tokens. Every handler resolves the
//! storage namespace from the `mode` query parameter, so demo and preview
//! games hit the same handlers without touching live state.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Minimal HTML status page |
//! | `GET`  | `/api/phase` | Current phase + deadlines |
//! | `GET`  | `/api/submissions/{participant}` | Stored submission |
//! | `POST` | `/api/submissions/{participant}` | Submit five candidates |
//! | `GET`  | `/api/pool` | Merged pool |
//! | `GET`  | `/api/survivors` | Surviving candidates |
//! | `GET`  | `/api/eliminations` | Elimination log |
//! | `POST` | `/api/eliminations` | Eliminate a candidate |
//! | `GET`  | `/api/spins` | Spin log |
//! | `POST` | `/api/spins` | Perform today's spin |
//! | `GET`  | `/api/standings` | Main-tally standings |
//! | `POST` | `/api/winner/resolve` | Run the winner resolver |
//! | `POST` | `/api/winner/tie-break` | Perform the deciding spin |
//! | `GET`  | `/api/config` | Game config singleton |

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::{DateTime, Utc};
use getaway_store::Namespace;
use getaway_types::{
    CandidateEntry, CandidateKey, EliminationRecord, GameConfig, MergedPool, Participant, Phase,
    SpinOutcome, SpinRecord, Submission, WinnerResult,
};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query and body shapes
// ---------------------------------------------------------------------------

/// Query parameters for read endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct ModeQuery {
    /// Storage namespace: `demo`, `preview`, or absent for the live game.
    pub mode: Option<String>,
}

/// Query parameters for write endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct AuthQuery {
    /// Storage namespace: `demo`, `preview`, or absent for the live game.
    pub mode: Option<String>,
    /// The acting participant's slug.
    pub user: Option<String>,
    /// The acting participant's access token.
    pub token: Option<String>,
}

/// Request body for `POST /api/submissions/{participant}`.
#[derive(Debug, serde::Deserialize)]
pub struct SubmitRequest {
    /// The five candidate entries, in order.
    pub entries: Vec<CandidateEntry>,
}

/// Request body for `POST /api/eliminations`.
#[derive(Debug, serde::Deserialize)]
pub struct EliminateRequest {
    /// Candidate name as shown in the pool.
    pub name: String,
    /// Candidate region, if the pool entry has one.
    pub region: Option<String>,
}

/// Response shape for `GET /api/phase`.
#[derive(Debug, serde::Serialize)]
pub struct PhaseResponse {
    /// The current phase.
    pub phase: Phase,
    /// The instant the phase was computed at.
    pub now: DateTime<Utc>,
    /// The next phase-boundary instant, if any.
    pub next_transition: Option<DateTime<Utc>>,
    /// The finale instant.
    pub finale_at: DateTime<Utc>,
    /// The reveal instant.
    pub reveal_at: DateTime<Utc>,
}

/// One row of `GET /api/standings`.
#[derive(Debug, serde::Serialize)]
pub struct StandingRow {
    /// The candidate key.
    pub candidate: CandidateKey,
    /// Accumulated main-tally points.
    pub points: u64,
}

/// Response shape for the tie-break spin.
#[derive(Debug, serde::Serialize)]
pub struct TieBreakResponse {
    /// The three recorded reels.
    pub outcome: SpinOutcome,
    /// The resolution after the spin (normally `Resolved`).
    pub result: WinnerResult,
}

fn namespace(mode: Option<&str>) -> Namespace {
    Namespace::from_mode(mode)
}

fn participant_from(segment: &str) -> Result<Participant, ApiError> {
    Participant::from_slug(segment).ok_or_else(|| ApiError::UnknownParticipant(segment.to_owned()))
}

/// Authenticate a write request for the participant named in `user`.
fn authenticate(state: &AppState, query: &AuthQuery) -> Result<Participant, ApiError> {
    let user = query.user.as_deref().ok_or(ApiError::Unauthorized)?;
    state
        .tokens
        .validate(user, query.token.as_deref())
        .ok_or(ApiError::Unauthorized)
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing server status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = Utc::now();
    let phase = state
        .service
        .phase(Namespace::Live, now)
        .await
        .unwrap_or(Phase::Countdown);
    let backend = state.service.store().backend_label();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Getaway</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Getaway</h1>
    <p class="subtitle">Two players, ten cities, one destination</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Phase</div>
            <div class="value">{phase:?}</div>
        </div>
        <div class="metric">
            <div class="label">Backend</div>
            <div class="value">{backend}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/phase">/api/phase</a> -- Current phase and deadlines</li>
        <li><a href="/api/pool">/api/pool</a> -- Merged candidate pool</li>
        <li><a href="/api/survivors">/api/survivors</a> -- Surviving candidates</li>
        <li><a href="/api/eliminations">/api/eliminations</a> -- Elimination log</li>
        <li><a href="/api/spins">/api/spins</a> -- Spin log</li>
        <li><a href="/api/standings">/api/standings</a> -- Main-tally standings</li>
        <li><a href="/api/config">/api/config</a> -- Game config singleton</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// `GET /api/phase` -- the current phase and the countdown targets.
pub async fn get_phase(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<PhaseResponse>, ApiError> {
    let ns = namespace(query.mode.as_deref());
    let now = Utc::now();
    let phase = state.service.phase(ns, now).await?;
    let schedule = state.service.schedule();
    Ok(Json(PhaseResponse {
        phase,
        now,
        next_transition: schedule.next_transition(now),
        finale_at: schedule.finale_instant(),
        reveal_at: schedule.reveal_instant(),
    }))
}

// ---------------------------------------------------------------------------
// Submissions and the pool
// ---------------------------------------------------------------------------

/// `GET /api/submissions/{participant}` -- the stored submission, if any.
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<Option<Submission>>, ApiError> {
    let participant = participant_from(&segment)?;
    let ns = namespace(query.mode.as_deref());
    Ok(Json(state.service.submission(ns, participant).await?))
}

/// `POST /api/submissions/{participant}` -- submit five candidates.
pub async fn post_submission(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
    Query(query): Query<AuthQuery>,
    Json(body): Json<SubmitRequest>,
) -> Result<Json<Submission>, ApiError> {
    let participant = participant_from(&segment)?;
    let authenticated = authenticate(&state, &query)?;
    if authenticated != participant {
        return Err(ApiError::Unauthorized);
    }
    let ns = namespace(query.mode.as_deref());
    let submission = state
        .service
        .submit(ns, participant, body.entries, Utc::now())
        .await?;
    Ok(Json(submission))
}

/// `GET /api/pool` -- the merged candidate pool.
pub async fn get_pool(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<MergedPool>, ApiError> {
    let ns = namespace(query.mode.as_deref());
    Ok(Json(state.service.merged_pool(ns).await?))
}

/// `GET /api/survivors` -- the candidates still in contention.
pub async fn get_survivors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<Vec<CandidateEntry>>, ApiError> {
    let ns = namespace(query.mode.as_deref());
    Ok(Json(state.service.surviving(ns).await?))
}

// ---------------------------------------------------------------------------
// Eliminations
// ---------------------------------------------------------------------------

/// `GET /api/eliminations` -- the elimination log.
pub async fn get_eliminations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<Vec<EliminationRecord>>, ApiError> {
    let ns = namespace(query.mode.as_deref());
    Ok(Json(state.service.eliminations(ns).await?))
}

/// `POST /api/eliminations` -- permanently eliminate a candidate.
pub async fn post_elimination(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthQuery>,
    Json(body): Json<EliminateRequest>,
) -> Result<Json<EliminationRecord>, ApiError> {
    let participant = authenticate(&state, &query)?;
    let ns = namespace(query.mode.as_deref());
    let key = CandidateKey::new(&body.name, body.region.as_deref());
    let record = state
        .service
        .eliminate(ns, &key, participant, Utc::now())
        .await?;
    Ok(Json(record))
}

// ---------------------------------------------------------------------------
// Spins and standings
// ---------------------------------------------------------------------------

/// `GET /api/spins` -- the spin log.
pub async fn get_spins(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<Vec<SpinRecord>>, ApiError> {
    let ns = namespace(query.mode.as_deref());
    Ok(Json(state.service.spins(ns).await?))
}

/// `POST /api/spins` -- perform the participant's daily spin.
pub async fn post_spin(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthQuery>,
) -> Result<Json<SpinOutcome>, ApiError> {
    let participant = authenticate(&state, &query)?;
    let ns = namespace(query.mode.as_deref());
    let outcome = state.service.spin(ns, participant, Utc::now()).await?;
    Ok(Json(outcome))
}

/// `GET /api/standings` -- main-tally standings over the survivors.
pub async fn get_standings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<Vec<StandingRow>>, ApiError> {
    let ns = namespace(query.mode.as_deref());
    let rows = state
        .service
        .standings(ns)
        .await?
        .into_iter()
        .map(|(candidate, points)| StandingRow { candidate, points })
        .collect();
    Ok(Json(rows))
}

// ---------------------------------------------------------------------------
// Winner
// ---------------------------------------------------------------------------

/// `POST /api/winner/resolve` -- run the winner-resolution state machine.
pub async fn post_resolve(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<WinnerResult>, ApiError> {
    let ns = namespace(query.mode.as_deref());
    Ok(Json(state.service.resolve_winner(ns, Utc::now()).await?))
}

/// `POST /api/winner/tie-break` -- perform the deciding spin.
pub async fn post_tie_break(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthQuery>,
) -> Result<Json<TieBreakResponse>, ApiError> {
    let participant = authenticate(&state, &query)?;
    let ns = namespace(query.mode.as_deref());
    let (outcome, result) = state
        .service
        .tie_break_spin(ns, participant, Utc::now())
        .await?;
    Ok(Json(TieBreakResponse { outcome, result }))
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// `GET /api/config` -- the game config singleton.
pub async fn get_config(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
) -> Result<Json<GameConfig>, ApiError> {
    let ns = namespace(query.mode.as_deref());
    Ok(Json(state.service.config(ns).await?))
}
