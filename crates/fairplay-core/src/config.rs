//! Engine configuration.
//!
//! Every field has a default so a partial `[balance]` TOML table (or none at
//! all) yields a working configuration.

use serde::{Deserialize, Serialize};

use crate::participant::{Scheme, TierThresholds};

/// Tuning for a single partitioning search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Attempts before giving up with `Unsatisfiable`.
    pub attempt_budget: usize,
    /// Largest skill-spread a valid grouping may have.
    pub max_spread: f64,
    /// Stop searching once a valid grouping this tight is found.
    pub good_enough_spread: f64,
    /// Strength the greedy fill steers every group towards.
    pub fill_target: f64,
    /// Candidates sampled per greedy placement.
    pub lookahead: usize,
    /// Minimum supportive members per group under `Scheme::Position`.
    pub position_quota: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            attempt_budget: 100_000,
            max_spread: 1.0,
            good_enough_spread: 0.3,
            fill_target: 4.0,
            lookahead: 3,
            position_quota: 2,
        }
    }
}

/// Tuning for the two-option diversity selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversityConfig {
    /// Maximum number of search runs.
    pub run_budget: usize,
    /// Stop once this many distinct groupings have been collected.
    pub target_distinct: usize,
    /// Seed of run 0.
    pub seed_base: u64,
    /// Seed increment between consecutive runs.
    pub seed_stride: u64,
}

impl Default for DiversityConfig {
    fn default() -> Self {
        Self {
            run_budget: 30,
            target_distinct: 6,
            seed_base: 12_345,
            seed_stride: 97,
        }
    }
}

impl DiversityConfig {
    /// Seed used for run `run`.
    pub fn seed_for_run(&self, run: usize) -> u64 {
        self.seed_base
            .wrapping_add(self.seed_stride.wrapping_mul(run as u64))
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub scheme: Scheme,
    pub tiers: TierThresholds,
    pub search: SearchConfig,
    pub diversity: DiversityConfig,
}
