use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::models::{BallRecord, TeamSide};
use crate::session::{MatchSession, SharedSession};
use crate::stats::{WinProbability, WinProbabilityStrategy};

#[derive(Clone)]
pub struct AppState {
    pub session: SharedSession,
    /// Strategy reported as the headline win probability
    pub strategy: WinProbabilityStrategy,
    /// Whether balls may be entered through the API (no feed is polling)
    pub manual_entry: bool,
}

/// Build the Axum router for the dashboard API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/match", get(match_handler))
        .route("/api/comparison", get(comparison_handler))
        .route("/api/win-probability", get(win_probability_handler))
        .route("/api/series", get(series_handler))
        .route("/api/balls", post(record_ball_handler))
        .route("/api/current-team", post(current_team_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize)]
struct Health {
    source: String,
    last_updated: Option<DateTime<Utc>>,
    balls_team_a: usize,
    balls_team_b: usize,
}

/// GET /api/health
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    let m = session.match_state();
    Json(Health {
        source: session.source().to_string(),
        last_updated: session.last_updated(),
        balls_team_a: m.team_a.innings.len(),
        balls_team_b: m.team_b.innings.len(),
    })
}

/// GET /api/match
async fn match_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(session.match_state().clone())
}

/// GET /api/comparison
async fn comparison_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(session.current_comparison())
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WinProbabilityView {
    pub ball_index: u32,
    pub strategy: WinProbabilityStrategy,
    pub headline: WinProbability,
    pub simple: WinProbability,
    pub live: WinProbability,
}

pub fn win_probability_view(
    session: &MatchSession,
    strategy: WinProbabilityStrategy,
) -> WinProbabilityView {
    WinProbabilityView {
        ball_index: session.match_state().current_ball,
        strategy,
        headline: session.win_probability(strategy),
        simple: session.win_probability(WinProbabilityStrategy::Simple),
        live: session.win_probability(WinProbabilityStrategy::Live),
    }
}

/// GET /api/win-probability
async fn win_probability_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(win_probability_view(&session, state.strategy))
}

/// GET /api/series
async fn series_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    Json(session.comparison_series())
}

#[derive(Debug, Deserialize)]
pub struct BallInput {
    pub runs: i32,
    /// Innings wicket total after this ball
    pub wickets: i32,
}

/// POST /api/balls
async fn record_ball_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<BallInput>,
) -> Result<(StatusCode, Json<BallRecord>), (StatusCode, String)> {
    if !state.manual_entry {
        return Err((
            StatusCode::CONFLICT,
            "manual entry is disabled while a feed is polling".to_string(),
        ));
    }
    let mut session = state.session.write().await;
    let record = session
        .record_ball(input.runs, input.wickets)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    info!(
        "Ball {} recorded: {}/{}",
        record.over_ball(),
        record.cumulative_runs,
        record.cumulative_wickets
    );
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
pub struct CurrentTeamInput {
    pub team: TeamSide,
}

/// POST /api/current-team
async fn current_team_handler(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CurrentTeamInput>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !state.manual_entry {
        return Err((
            StatusCode::CONFLICT,
            "manual entry is disabled while a feed is polling".to_string(),
        ));
    }
    state.session.write().await.set_current_team(input.team);
    Ok(StatusCode::NO_CONTENT)
}
