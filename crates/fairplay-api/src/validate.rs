//! Request boundary validation.
//!
//! The engine assumes its preconditions hold: at least one group, at least
//! as many participants as groups, ratings in range and attributes from the
//! active scheme. Everything arriving from outside passes through here first.

use std::collections::HashSet;

use fairplay_core::{Attribute, MAX_RATING, MIN_RATING, Participant, Scheme};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do with a roster whose size is not a multiple of the team count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Leftover participants are left out of the teams.
    #[default]
    Truncate,
    /// The roster is refused.
    Reject,
}

/// A request failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundaryError {
    #[error("player name must not be empty")]
    EmptyName,

    #[error("rating for {name} must be an integer from 1 to 7, got {rating}")]
    Rating { name: String, rating: i64 },

    #[error("unknown attribute for {name}: {attribute}")]
    UnknownAttribute { name: String, attribute: String },

    #[error("attribute {attribute} of {name} is not part of the {scheme} scheme")]
    WrongScheme {
        name: String,
        attribute: Attribute,
        scheme: Scheme,
    },

    #[error("duplicate player: {0}")]
    Duplicate(String),

    #[error("number of teams must be at least 1")]
    NoTeams,

    #[error("{players} players cannot fill {teams} teams")]
    TooFewPlayers { players: usize, teams: usize },

    #[error("{players} players do not divide evenly into {teams} teams")]
    Indivisible { players: usize, teams: usize },
}

/// Untrusted player payload. Ratings and attributes are kept loose so that
/// out-of-range values surface as validation errors instead of decode errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInput {
    pub name: String,
    pub rating: i64,
    pub attribute: String,
    #[serde(default)]
    pub recurring: bool,
}

impl PlayerInput {
    pub fn into_participant(self, scheme: Scheme) -> Result<Participant, BoundaryError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(BoundaryError::EmptyName);
        }
        let rating = check_rating(&name, self.rating)?;
        let attribute = parse_attribute(&name, &self.attribute, scheme)?;
        Ok(Participant::new(name, rating, attribute).with_recurring(self.recurring))
    }
}

impl From<&Participant> for PlayerInput {
    fn from(p: &Participant) -> Self {
        Self {
            name: p.name.clone(),
            rating: i64::from(p.rating),
            attribute: p.attribute.to_string(),
            recurring: p.recurring,
        }
    }
}

pub fn check_rating(name: &str, rating: i64) -> Result<u8, BoundaryError> {
    match u8::try_from(rating) {
        Ok(r) if (MIN_RATING..=MAX_RATING).contains(&r) => Ok(r),
        _ => Err(BoundaryError::Rating {
            name: name.to_string(),
            rating,
        }),
    }
}

pub fn parse_attribute(name: &str, raw: &str, scheme: Scheme) -> Result<Attribute, BoundaryError> {
    let attribute: Attribute = raw.parse().map_err(|_| BoundaryError::UnknownAttribute {
        name: name.to_string(),
        attribute: raw.to_string(),
    })?;
    if !scheme.accepts(attribute) {
        return Err(BoundaryError::WrongScheme {
            name: name.to_string(),
            attribute,
            scheme,
        });
    }
    Ok(attribute)
}

/// Re-check an already typed participant against the active scheme.
pub fn check_participant(p: &Participant, scheme: Scheme) -> Result<(), BoundaryError> {
    PlayerInput::from(p).into_participant(scheme).map(|_| ())
}

/// Validate a batch of untrusted players. Names must be unique within the batch.
pub fn parse_players(
    inputs: Vec<PlayerInput>,
    scheme: Scheme,
) -> Result<Vec<Participant>, BoundaryError> {
    let mut seen = HashSet::new();
    let mut players = Vec::with_capacity(inputs.len());
    for input in inputs {
        let player = input.into_participant(scheme)?;
        if !seen.insert(player.name.clone()) {
            return Err(BoundaryError::Duplicate(player.name));
        }
        players.push(player);
    }
    Ok(players)
}

/// Preconditions for running the engine on `players` participants.
pub fn check_balance_request(
    players: usize,
    teams: usize,
    policy: RemainderPolicy,
) -> Result<(), BoundaryError> {
    if teams == 0 {
        return Err(BoundaryError::NoTeams);
    }
    if players < teams {
        return Err(BoundaryError::TooFewPlayers { players, teams });
    }
    if policy == RemainderPolicy::Reject && players % teams != 0 {
        return Err(BoundaryError::Indivisible { players, teams });
    }
    Ok(())
}
