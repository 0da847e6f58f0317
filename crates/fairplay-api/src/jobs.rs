//! Background balance jobs.
//!
//! A submitted job is recorded as `Queued`, then a tokio task marks it
//! `Running` and hands the engine call to the blocking pool. The engine is a
//! single synchronous call; its result (rendered) or error message is stored
//! on the record for polling. Finished records are dropped once they are older
//! than the store's TTL; pruning happens on each submit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use fairplay_core::{BalanceConfig, Participant, two_options};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::render::{BalanceOutcome, render_pair};

pub type JobId = Uuid;

/// How long a finished job stays pollable.
pub const DEFAULT_JOB_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Failed,
}

impl JobStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct JobRecord {
    pub status: JobStatus,
    pub error: Option<String>,
    pub outcome: Option<BalanceOutcome>,
    pub finished_at: Option<Instant>,
}

impl JobRecord {
    fn queued() -> Self {
        Self {
            status: JobStatus::Queued,
            error: None,
            outcome: None,
            finished_at: None,
        }
    }

    fn expired(&self, now: Instant, ttl: Duration) -> bool {
        self.finished_at
            .is_some_and(|at| now.saturating_duration_since(at) >= ttl)
    }
}

/// Shared, in-memory table of balance jobs.
#[derive(Clone)]
pub struct JobStore {
    jobs: Arc<RwLock<HashMap<JobId, JobRecord>>>,
    ttl: Duration,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_JOB_TTL)
    }
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Record a new job and start it in the background. Must be called from
    /// within a tokio runtime.
    pub async fn submit(
        &self,
        roster: Vec<Participant>,
        num_teams: usize,
        config: Arc<BalanceConfig>,
    ) -> JobId {
        let id = Uuid::new_v4();
        {
            let mut jobs = self.jobs.write().await;
            let now = Instant::now();
            let before = jobs.len();
            jobs.retain(|_, record| !record.expired(now, self.ttl));
            let pruned = before - jobs.len();
            if pruned > 0 {
                debug!(pruned, remaining = jobs.len(), "expired balance jobs dropped");
            }
            jobs.insert(id, JobRecord::queued());
        }
        info!(job = %id, players = roster.len(), num_teams, "balance job queued");

        let store = self.clone();
        tokio::spawn(async move {
            store.run(id, roster, num_teams, config).await;
        });
        id
    }

    async fn run(
        &self,
        id: JobId,
        roster: Vec<Participant>,
        num_teams: usize,
        config: Arc<BalanceConfig>,
    ) {
        self.set_status(id, JobStatus::Running).await;
        info!(job = %id, "balance job started");

        let joined = tokio::task::spawn_blocking(move || {
            two_options(&roster, num_teams, &config).map(|pair| {
                render_pair(&pair, num_teams, config.scheme, &config.tiers)
            })
        })
        .await;

        let mut jobs = self.jobs.write().await;
        let Some(record) = jobs.get_mut(&id) else {
            return;
        };
        record.finished_at = Some(Instant::now());
        match joined {
            Ok(Ok(outcome)) => {
                info!(job = %id, identical = outcome.identical, "balance job done");
                record.status = JobStatus::Done;
                record.outcome = Some(outcome);
            }
            Ok(Err(e)) => {
                warn!(job = %id, error = %e, "balance job failed");
                record.status = JobStatus::Failed;
                record.error = Some(e.to_string());
            }
            Err(e) => {
                error!(job = %id, error = %e, "balance job panicked");
                record.status = JobStatus::Failed;
                record.error = Some(format!("balance task aborted: {e}"));
            }
        }
    }

    async fn set_status(&self, id: JobId, status: JobStatus) {
        if let Some(record) = self.jobs.write().await.get_mut(&id) {
            record.status = status;
        }
    }

    pub async fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.jobs.read().await.get(id).cloned()
    }
}
