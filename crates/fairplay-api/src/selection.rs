//! Resolving a balance request's player names against the roster.

use std::collections::HashSet;

use fairplay_core::{Participant, Scheme};
use fairplay_roster::{RosterError, RosterStore};
use thiserror::Error;

use crate::validate::{BoundaryError, RemainderPolicy, check_balance_request, check_participant};

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Invalid(#[from] BoundaryError),

    #[error("unknown players: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error(transparent)]
    Store(#[from] RosterError),
}

/// Load the selected players (the whole roster when `names` is empty) and
/// check them against the engine's preconditions.
pub fn load_selection(
    store: &RosterStore,
    names: &[String],
    num_teams: usize,
    scheme: Scheme,
    policy: RemainderPolicy,
) -> Result<Vec<Participant>, SelectionError> {
    let roster = if names.is_empty() {
        store.list_players()?
    } else {
        let mut seen = HashSet::new();
        if let Some(dup) = names.iter().find(|n| !seen.insert(*n)) {
            return Err(BoundaryError::Duplicate(dup.clone()).into());
        }
        store.get_players(names)?.map_err(SelectionError::Missing)?
    };

    for player in &roster {
        check_participant(player, scheme)?;
    }
    check_balance_request(roster.len(), num_teams, policy)?;
    Ok(roster)
}
