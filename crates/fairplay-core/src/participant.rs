//! Participant model.
//!
//! A [`Participant`] is one rateable player: a name, an integer rating in
//! `1..=7`, a secondary [`Attribute`] and a recurring-membership flag. The
//! engine only ever reads participants; group membership is the sole thing
//! that changes during a search.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating.
pub const MAX_RATING: u8 = 7;

// ── Attribute schemes ──────────────────────────────────────────────

/// The active secondary-attribute scheme. Exactly one is in force per
/// deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Binary match intensity; HIGH counts must stay within 1 across groups.
    #[default]
    Intensity,
    /// Positional tag; every group needs a minimum of defensive/versatile players.
    Position,
}

impl Scheme {
    /// Whether `attribute` belongs to the supportive category of this scheme.
    pub fn is_supportive(self, attribute: Attribute) -> bool {
        match self {
            Scheme::Intensity => attribute == Attribute::High,
            Scheme::Position => matches!(attribute, Attribute::Defense | Attribute::Versatile),
        }
    }

    /// Whether `attribute` is a recognized value of this scheme.
    pub fn accepts(self, attribute: Attribute) -> bool {
        attribute.scheme() == self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Intensity => "intensity",
            Scheme::Position => "position",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary attribute of a participant.
///
/// `High`/`Low` belong to [`Scheme::Intensity`]; `Attack`/`Defense`/`Versatile`
/// belong to [`Scheme::Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    High,
    Low,
    Attack,
    Defense,
    Versatile,
}

impl Attribute {
    /// The scheme this value belongs to.
    pub fn scheme(self) -> Scheme {
        match self {
            Attribute::High | Attribute::Low => Scheme::Intensity,
            Attribute::Attack | Attribute::Defense | Attribute::Versatile => Scheme::Position,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Attribute::High => "high",
            Attribute::Low => "low",
            Attribute::Attack => "attack",
            Attribute::Defense => "defense",
            Attribute::Versatile => "versatile",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown attribute name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attribute: {0}")]
pub struct UnknownAttribute(pub String);

impl FromStr for Attribute {
    type Err = UnknownAttribute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Attribute::High),
            "low" => Ok(Attribute::Low),
            "attack" => Ok(Attribute::Attack),
            "defense" => Ok(Attribute::Defense),
            "versatile" => Ok(Attribute::Versatile),
            _ => Err(UnknownAttribute(s.to_string())),
        }
    }
}

// ── Tiers ──────────────────────────────────────────────────────────

/// Display classification derived from the rating. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Elite,
    Good,
    Regular,
    Beginner,
}

/// Rating lower bounds for each tier. A rating below `regular` is a beginner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub elite: u8,
    pub good: u8,
    pub regular: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            elite: 6,
            good: 5,
            regular: 3,
        }
    }
}

impl TierThresholds {
    pub fn classify(&self, rating: u8) -> Tier {
        if rating >= self.elite {
            Tier::Elite
        } else if rating >= self.good {
            Tier::Good
        } else if rating >= self.regular {
            Tier::Regular
        } else {
            Tier::Beginner
        }
    }
}

// ── Participant ────────────────────────────────────────────────────

/// One player in a roster. Identity (equality and hashing) is by `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub rating: u8,
    pub attribute: Attribute,
    /// Recurring member. Carried through for display only.
    #[serde(default)]
    pub recurring: bool,
}

impl Participant {
    pub fn new(name: impl Into<String>, rating: u8, attribute: Attribute) -> Self {
        Self {
            name: name.into(),
            rating,
            attribute,
            recurring: false,
        }
    }

    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Tier under the default thresholds.
    pub fn tier(&self) -> Tier {
        TierThresholds::default().classify(self.rating)
    }

    pub fn tier_with(&self, thresholds: &TierThresholds) -> Tier {
        thresholds.classify(self.rating)
    }

    pub fn is_supportive(&self, scheme: Scheme) -> bool {
        scheme.is_supportive(self.attribute)
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
