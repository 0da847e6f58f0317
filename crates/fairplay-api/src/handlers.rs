//! REST API handlers.
//!
//! Roster handlers read/write via `RosterStore`; balance handlers go through
//! the `JobStore`. Every response uses the same JSON envelope.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use fairplay_roster::RosterError;
use serde::Deserialize;
use tracing::{debug, info};

use crate::ApiState;
use crate::jobs::{JobId, JobStatus};
use crate::selection::{SelectionError, load_selection};
use crate::validate::{PlayerInput, check_rating, parse_attribute, parse_players};

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn internal(e: impl std::fmt::Display) -> axum::response::Response {
    error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
}

fn bad_request(e: impl std::fmt::Display) -> axum::response::Response {
    error_response(&e.to_string(), StatusCode::BAD_REQUEST).into_response()
}

// ── Health ─────────────────────────────────────────────────────

/// GET /healthz
pub async fn healthz() -> impl IntoResponse {
    ApiResponse::ok("ok")
}

// ── Players ────────────────────────────────────────────────────

/// GET /api/v1/players
pub async fn list_players(State(state): State<ApiState>) -> impl IntoResponse {
    match state.store.list_players() {
        Ok(players) => ApiResponse::ok(players).into_response(),
        Err(e) => internal(e),
    }
}

/// Batch of players to add.
#[derive(Deserialize)]
pub struct AddPlayersRequest {
    pub players: Vec<PlayerInput>,
}

/// POST /api/v1/players
pub async fn add_players(
    State(state): State<ApiState>,
    Json(req): Json<AddPlayersRequest>,
) -> impl IntoResponse {
    if req.players.is_empty() {
        return bad_request("no players given");
    }
    let players = match parse_players(req.players, state.balance.scheme) {
        Ok(players) => players,
        Err(e) => return bad_request(e),
    };
    match state.store.add_players(&players) {
        Ok(count) => {
            info!(count, "players added");
            (StatusCode::CREATED, ApiResponse::ok(players)).into_response()
        }
        Err(e @ RosterError::AlreadyExists(_)) => {
            error_response(&e.to_string(), StatusCode::CONFLICT).into_response()
        }
        Err(e) => internal(e),
    }
}

/// Partial update of a player. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub rating: Option<i64>,
    pub attribute: Option<String>,
    pub recurring: Option<bool>,
}

/// PUT /api/v1/players/{name}
pub async fn update_player(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Json(req): Json<UpdatePlayerRequest>,
) -> impl IntoResponse {
    let current = match state.store.get_player(&name) {
        Ok(Some(p)) => p,
        Ok(None) => return error_response("player not found", StatusCode::NOT_FOUND).into_response(),
        Err(e) => return internal(e),
    };

    let scheme = state.balance.scheme;
    let mut updated = current.clone();
    if let Some(new_name) = req.name {
        let new_name = new_name.trim().to_string();
        if new_name.is_empty() {
            return bad_request("player name must not be empty");
        }
        updated.name = new_name;
    }
    if let Some(rating) = req.rating {
        match check_rating(&updated.name, rating) {
            Ok(r) => updated.rating = r,
            Err(e) => return bad_request(e),
        }
    }
    if let Some(raw) = req.attribute.as_deref() {
        match parse_attribute(&updated.name, raw, scheme) {
            Ok(a) => updated.attribute = a,
            Err(e) => return bad_request(e),
        }
    }
    if let Some(recurring) = req.recurring {
        updated.recurring = recurring;
    }

    match state.store.rename_player(&current.name, &updated) {
        Ok(()) => {
            debug!(old = %current.name, new = %updated.name, "player updated");
            ApiResponse::ok(updated).into_response()
        }
        Err(RosterError::NotFound(_)) => {
            error_response("player not found", StatusCode::NOT_FOUND).into_response()
        }
        Err(e @ RosterError::AlreadyExists(_)) => {
            error_response(&e.to_string(), StatusCode::CONFLICT).into_response()
        }
        Err(e) => internal(e),
    }
}

/// DELETE /api/v1/players/{name}
pub async fn delete_player(
    State(state): State<ApiState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.store.delete_player(&name) {
        Ok(true) => ApiResponse::ok("deleted").into_response(),
        Ok(false) => error_response("player not found", StatusCode::NOT_FOUND).into_response(),
        Err(e) => internal(e),
    }
}

// ── Balance jobs ───────────────────────────────────────────────

/// Balance request body.
#[derive(Deserialize)]
pub struct BalanceRequest {
    pub players: Vec<String>,
    pub num_teams: i64,
}

/// POST /api/v1/balance
pub async fn submit_balance(
    State(state): State<ApiState>,
    Json(req): Json<BalanceRequest>,
) -> impl IntoResponse {
    if req.players.is_empty() {
        return bad_request("no players selected");
    }
    // Negative counts fall through to the zero-teams check.
    let num_teams = usize::try_from(req.num_teams).unwrap_or(0);

    let roster = match load_selection(
        &state.store,
        &req.players,
        num_teams,
        state.balance.scheme,
        state.remainder,
    ) {
        Ok(roster) => roster,
        Err(SelectionError::Invalid(e)) => return bad_request(e),
        Err(e @ SelectionError::Missing(_)) => {
            return error_response(&e.to_string(), StatusCode::NOT_FOUND).into_response();
        }
        Err(e) => return internal(e),
    };

    let job_id = state
        .jobs
        .submit(roster, num_teams, state.balance.clone())
        .await;
    (
        StatusCode::ACCEPTED,
        ApiResponse::ok(serde_json::json!({ "job_id": job_id })),
    )
        .into_response()
}

fn parse_job_id(raw: &str) -> Option<JobId> {
    raw.parse().ok()
}

/// GET /api/v1/balance/{job_id}
pub async fn balance_status(
    State(state): State<ApiState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let record = match parse_job_id(&job_id) {
        Some(id) => state.jobs.get(&id).await,
        None => None,
    };
    match record {
        Some(record) => ApiResponse::ok(serde_json::json!({
            "status": record.status,
            "error": record.error,
        }))
        .into_response(),
        None => error_response("job not found", StatusCode::NOT_FOUND).into_response(),
    }
}

/// GET /api/v1/balance/{job_id}/result
pub async fn balance_result(
    State(state): State<ApiState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let record = match parse_job_id(&job_id) {
        Some(id) => state.jobs.get(&id).await,
        None => None,
    };
    let Some(record) = record else {
        return error_response("job not found", StatusCode::NOT_FOUND).into_response();
    };

    match (record.status, record.outcome) {
        (JobStatus::Done, Some(outcome)) => ApiResponse::ok(outcome).into_response(),
        (JobStatus::Failed, _) | (JobStatus::Done, None) => {
            let msg = record.error.unwrap_or_else(|| "balance failed".to_string());
            error_response(&msg, StatusCode::CONFLICT).into_response()
        }
        (status, _) => (
            StatusCode::ACCEPTED,
            ApiResponse::ok(serde_json::json!({ "status": status })),
        )
            .into_response(),
    }
}
