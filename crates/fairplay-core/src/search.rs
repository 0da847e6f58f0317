//! Partitioning search — randomized generate-and-test.
//!
//! Each attempt builds one candidate grouping with a layered placement:
//! 1. Split the roster into supportive and other participants
//! 2. Seed every group with a quota of shuffled supportive participants
//! 3. Bucket the rest into elite / medium / weak by rating
//! 4. Deal elite participants round-robin across groups
//! 5. Fill the remaining slots greedily from a small random lookahead window,
//!    picking whoever pulls the group's strength closest to the fill target
//!
//! The candidate is then validated. The best valid candidate (lowest spread)
//! across all attempts wins; a candidate at or below the good-enough spread
//! ends the search immediately.
//!
//! When the roster size is not a multiple of the group count, the fill stops
//! once every group has reached `roster_size / group_count` members and the
//! participants still in the pool are left out of the grouping.

use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::error::{BalanceError, BalanceResult};
use crate::grouping::{Group, Grouping, mean_rating};
use crate::participant::{Participant, Scheme};
use crate::validator::{Constraints, validate};

/// Placement bucket: ratings at or above this are dealt round-robin.
const ELITE_RATING: u8 = 6;

/// Placement bucket: ratings below this are "weak", the rest "medium".
const MEDIUM_RATING: u8 = 3;

/// Find the lowest-spread valid grouping within the attempt budget.
///
/// Callers guarantee `group_count >= 1` and `roster.len() >= group_count`.
/// The result depends only on the inputs and the state of `rng`.
pub fn partition<R: Rng + ?Sized>(
    roster: &[Participant],
    group_count: usize,
    scheme: Scheme,
    config: &SearchConfig,
    rng: &mut R,
) -> BalanceResult<Grouping> {
    let group_size = roster.len() / group_count;
    let constraints = Constraints {
        scheme,
        group_size,
        position_quota: config.position_quota,
        max_spread: config.max_spread,
    };

    let mut best: Option<(f64, Grouping)> = None;

    for attempt in 0..config.attempt_budget {
        let Some(candidate) = build_candidate(roster, group_count, group_size, scheme, config, rng)
        else {
            trace!(attempt, "not enough supportive participants to seed every group");
            continue;
        };

        let spread = match validate(&candidate, &constraints) {
            Ok(spread) => spread,
            Err(violation) => {
                trace!(attempt, %violation, "candidate rejected");
                continue;
            }
        };

        if best.as_ref().is_none_or(|(best_spread, _)| spread < *best_spread) {
            debug!(attempt, spread, "new best grouping");
            best = Some((spread, candidate));
        }

        if spread <= config.good_enough_spread {
            debug!(attempt, spread, "good-enough grouping found, stopping early");
            break;
        }
    }

    match best {
        Some((spread, grouping)) => {
            let placed = grouping.participant_count();
            debug!(spread, placed, left_out = roster.len() - placed, "grouping selected");
            Ok(grouping)
        }
        None => {
            warn!(
                roster = roster.len(),
                group_count,
                %scheme,
                attempts = config.attempt_budget,
                "no valid grouping found"
            );
            Err(BalanceError::Unsatisfiable {
                attempts: config.attempt_budget,
            })
        }
    }
}

/// Supportive participants seeded into each group.
fn seed_quota(scheme: Scheme, supportive: usize, group_count: usize, position_quota: usize) -> usize {
    match scheme {
        Scheme::Position => position_quota,
        Scheme::Intensity => supportive / group_count,
    }
}

/// One layered placement. Returns `None` when the supportive pool cannot
/// cover the per-group quota.
fn build_candidate<R: Rng + ?Sized>(
    roster: &[Participant],
    group_count: usize,
    group_size: usize,
    scheme: Scheme,
    config: &SearchConfig,
    rng: &mut R,
) -> Option<Grouping> {
    let (mut supportive, mut pool): (Vec<&Participant>, Vec<&Participant>) =
        roster.iter().partition(|p| p.is_supportive(scheme));

    let quota = seed_quota(scheme, supportive.len(), group_count, config.position_quota);
    if supportive.len() < quota * group_count {
        return None;
    }

    supportive.shuffle(rng);
    pool.shuffle(rng);

    let mut groups: Vec<Vec<&Participant>> = (0..group_count)
        .map(|_| Vec::with_capacity(group_size))
        .collect();

    for group in &mut groups {
        for _ in 0..quota {
            if let Some(p) = supportive.pop() {
                group.push(p);
            }
        }
    }
    pool.extend(supportive);

    let mut elite = Vec::new();
    let mut medium = Vec::new();
    let mut weak = Vec::new();
    for p in pool {
        if p.rating >= ELITE_RATING {
            elite.push(p);
        } else if p.rating >= MEDIUM_RATING {
            medium.push(p);
        } else {
            weak.push(p);
        }
    }
    elite.shuffle(rng);
    medium.shuffle(rng);
    weak.shuffle(rng);

    for (i, p) in elite.into_iter().enumerate() {
        groups[i % group_count].push(p);
    }

    let mut rest = medium;
    rest.extend(weak);
    rest.shuffle(rng);

    fill_groups(&mut groups, &mut rest, group_size, config, rng);

    Some(Grouping::new(
        groups
            .into_iter()
            .map(|members| Group::from_members(members.into_iter().cloned().collect()))
            .collect(),
    ))
}

/// Greedy bounded-lookahead fill.
///
/// Sweeps the groups repeatedly; each under-filled group samples up to
/// `lookahead` participants from the pool and takes the one that moves its
/// mean rating closest to `fill_target`. Stops when the pool is empty or no
/// group has room left.
fn fill_groups<'a, R: Rng + ?Sized>(
    groups: &mut [Vec<&'a Participant>],
    pool: &mut Vec<&'a Participant>,
    group_size: usize,
    config: &SearchConfig,
    rng: &mut R,
) {
    let lookahead = config.lookahead.max(1);

    loop {
        let mut placed = false;

        for group in groups.iter_mut() {
            if pool.is_empty() {
                return;
            }
            if group.len() >= group_size {
                continue;
            }

            let window = index::sample(rng, pool.len(), lookahead.min(pool.len()));
            let distance = |i: usize| {
                let strength = mean_rating(group.iter().copied().chain(std::iter::once(pool[i])));
                (strength - config.fill_target).abs()
            };
            let Some(chosen) = window
                .iter()
                .min_by(|&a, &b| distance(a).total_cmp(&distance(b)))
            else {
                return;
            };

            group.push(pool.remove(chosen));
            placed = true;
        }

        if !placed {
            return;
        }
    }
}
