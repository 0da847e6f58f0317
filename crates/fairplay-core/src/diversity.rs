//! Candidate diversity selector — two structurally different options.
//!
//! Runs the partitioning search repeatedly, each run on its own
//! `ChaCha8Rng` seeded with `seed_base + seed_stride * run`, deduplicates the
//! results by canonical signature and returns the pair of groupings whose
//! co-membership pair sets overlap least.
//!
//! No shared random state is read or written: every run owns its generator,
//! so concurrent invocations cannot interfere and identical inputs always
//! yield identical options.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::BalanceConfig;
use crate::error::{BalanceError, BalanceResult};
use crate::grouping::Grouping;
use crate::participant::Participant;
use crate::search::partition;

/// The two options offered to the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionPair {
    pub first: Grouping,
    pub second: Grouping,
    /// Co-membership pairs the two options share.
    pub overlap: usize,
    /// Distinct valid groupings the pair was chosen from.
    pub distinct_candidates: usize,
}

impl OptionPair {
    /// Only one distinct grouping was found, so both options are the same.
    pub fn is_degenerate(&self) -> bool {
        self.distinct_candidates == 1
    }
}

/// Produce two maximally dissimilar valid groupings.
///
/// Fails with [`BalanceError::NoValidOptions`] only when no run produced a
/// valid grouping. A single distinct grouping is returned twice.
pub fn two_options(
    roster: &[Participant],
    group_count: usize,
    config: &BalanceConfig,
) -> BalanceResult<OptionPair> {
    let candidates = collect_candidates(roster, group_count, config);

    match select_most_distinct(candidates) {
        Some(pair) => {
            info!(
                candidates = pair.distinct_candidates,
                overlap = pair.overlap,
                "options selected"
            );
            Ok(pair)
        }
        None => {
            warn!(
                roster = roster.len(),
                group_count,
                runs = config.diversity.run_budget,
                "no valid options"
            );
            Err(BalanceError::NoValidOptions {
                runs: config.diversity.run_budget,
            })
        }
    }
}

/// Run the search under successive seeds, keeping distinct results until
/// `target_distinct` is reached or the run budget is spent.
pub fn collect_candidates(
    roster: &[Participant],
    group_count: usize,
    config: &BalanceConfig,
) -> Vec<Grouping> {
    let diversity = &config.diversity;
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for run in 0..diversity.run_budget {
        let seed = diversity.seed_for_run(run);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        match partition(roster, group_count, config.scheme, &config.search, &mut rng) {
            Ok(grouping) => {
                if seen.insert(grouping.signature()) {
                    debug!(run, seed, spread = grouping.spread(), "distinct grouping collected");
                    candidates.push(grouping);
                } else {
                    debug!(run, seed, "duplicate grouping skipped");
                }
            }
            Err(e) => debug!(run, seed, error = %e, "search run failed"),
        }

        if candidates.len() >= diversity.target_distinct {
            break;
        }
    }

    candidates
}

/// Pick the pair with the smallest co-membership overlap. Ties keep the
/// earliest pair in collection order.
pub fn select_most_distinct(mut candidates: Vec<Grouping>) -> Option<OptionPair> {
    match candidates.len() {
        0 => None,
        1 => {
            let only = candidates.remove(0);
            let overlap = only.co_membership().len();
            Some(OptionPair {
                first: only.clone(),
                second: only,
                overlap,
                distinct_candidates: 1,
            })
        }
        n => {
            let (i, j, overlap) = {
                let pair_sets: Vec<_> = candidates.iter().map(Grouping::co_membership).collect();
                let mut best = (0, 1, usize::MAX);
                for i in 0..n {
                    for j in i + 1..n {
                        let overlap = pair_sets[i].intersection(&pair_sets[j]).count();
                        if overlap < best.2 {
                            best = (i, j, overlap);
                        }
                    }
                }
                best
            };

            let second = candidates.swap_remove(j);
            let first = candidates.swap_remove(i);
            Some(OptionPair {
                first,
                second,
                overlap,
                distinct_candidates: n,
            })
        }
    }
}
