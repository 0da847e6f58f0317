//! Presentation of balance results.
//!
//! Turns an [`OptionPair`] into numbered teams (players strongest first,
//! strengths rounded to two decimals) plus a plain-text summary per option
//! that can be pasted into a chat.

use fairplay_core::{Attribute, Grouping, OptionPair, Scheme, Tier, TierThresholds};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPlayer {
    pub name: String,
    pub rating: u8,
    pub attribute: Attribute,
    pub tier: Tier,
    pub recurring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTeam {
    /// 1-based team number.
    pub number: usize,
    pub players: Vec<RenderedPlayer>,
    pub strength: f64,
    pub supportive: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedOption {
    pub teams: Vec<RenderedTeam>,
    pub summary: String,
}

/// Both options of a finished balance job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceOutcome {
    pub num_teams: usize,
    pub options: [RenderedOption; 2],
    pub overlap: usize,
    pub distinct_candidates: usize,
    /// Only one distinct grouping existed, so both options are the same.
    pub identical: bool,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn render_grouping(
    grouping: &Grouping,
    scheme: Scheme,
    tiers: &TierThresholds,
) -> RenderedOption {
    let teams: Vec<RenderedTeam> = grouping
        .groups()
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let mut members = group.members().to_vec();
            members.sort_by(|a, b| b.rating.cmp(&a.rating));
            RenderedTeam {
                number: i + 1,
                players: members
                    .into_iter()
                    .map(|p| RenderedPlayer {
                        tier: p.tier_with(tiers),
                        name: p.name,
                        rating: p.rating,
                        attribute: p.attribute,
                        recurring: p.recurring,
                    })
                    .collect(),
                strength: round2(group.strength()),
                supportive: group.supportive_count(scheme),
            }
        })
        .collect();

    let summary = summary(&teams);
    RenderedOption { teams, summary }
}

/// Plain-text listing of the teams.
pub fn summary(teams: &[RenderedTeam]) -> String {
    let mut lines = vec!["Teams:".to_string()];
    for team in teams {
        lines.push(format!("Team {} (strength {:.2}):", team.number, team.strength));
        for p in &team.players {
            lines.push(format!("- {} ({}) - {}", p.name, p.rating, p.attribute));
        }
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}

pub fn render_pair(
    pair: &OptionPair,
    num_teams: usize,
    scheme: Scheme,
    tiers: &TierThresholds,
) -> BalanceOutcome {
    BalanceOutcome {
        num_teams,
        options: [
            render_grouping(&pair.first, scheme, tiers),
            render_grouping(&pair.second, scheme, tiers),
        ],
        overlap: pair.overlap,
        distinct_candidates: pair.distinct_candidates,
        identical: pair.is_degenerate(),
    }
}
