//! fairplay-api — REST API for Fairplay.
//!
//! Provides axum route handlers for managing the roster and running balance
//! jobs in the background.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/players` | List the roster |
//! | POST | `/api/v1/players` | Add a batch of new players (409 if a name is taken) |
//! | PUT | `/api/v1/players/{name}` | Update (or rename) a player (409 if the new name is taken) |
//! | DELETE | `/api/v1/players/{name}` | Remove a player |
//! | POST | `/api/v1/balance` | Start a balance job |
//! | GET | `/api/v1/balance/{job_id}` | Job status |
//! | GET | `/api/v1/balance/{job_id}/result` | Rendered options of a finished job |
//! | GET | `/healthz` | Liveness |

pub mod handlers;
pub mod jobs;
pub mod render;
pub mod selection;
pub mod validate;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use fairplay_core::BalanceConfig;
use fairplay_roster::RosterStore;

pub use jobs::{JobId, JobRecord, JobStatus, JobStore};
pub use render::{BalanceOutcome, RenderedOption, RenderedPlayer, RenderedTeam, render_pair};
pub use selection::{SelectionError, load_selection};
pub use validate::{BoundaryError, PlayerInput, RemainderPolicy};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: RosterStore,
    pub jobs: JobStore,
    pub balance: Arc<BalanceConfig>,
    pub remainder: RemainderPolicy,
}

impl ApiState {
    pub fn new(store: RosterStore, balance: BalanceConfig, remainder: RemainderPolicy) -> Self {
        Self {
            store,
            jobs: JobStore::new(),
            balance: Arc::new(balance),
            remainder,
        }
    }
}

/// Build the complete API router.
pub fn build_router(state: ApiState) -> Router {
    let api_routes = Router::new()
        .route("/players", get(handlers::list_players).post(handlers::add_players))
        .route(
            "/players/{name}",
            put(handlers::update_player).delete(handlers::delete_player),
        )
        .route("/balance", post(handlers::submit_balance))
        .route("/balance/{job_id}", get(handlers::balance_status))
        .route("/balance/{job_id}/result", get(handlers::balance_result))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/healthz", get(handlers::healthz))
}
