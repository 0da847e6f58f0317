//! fairplay-core — constrained team partitioning engine.
//!
//! Splits a roster of rated participants into equally sized groups whose
//! mean ratings stay within a bounded spread and whose supportive-category
//! members are balanced, then offers two structurally different options.
//! Pure computation: no I/O, no async, no shared random state.
//!
//! # Components
//!
//! - **`participant`** — Participant record, attribute schemes, tiers
//! - **`grouping`** — Groups, groupings, canonical signatures, co-membership
//! - **`validator`** — Size, attribute-balance and skill-spread checks
//! - **`search`** — Randomized layered-placement search (`partition`)
//! - **`diversity`** — Multi-run, least-overlap option selection (`two_options`)
//! - **`config`** — Tunables with serde defaults
//!
//! # Example
//!
//! ```rust
//! use fairplay_core::{Attribute, BalanceConfig, Participant, two_options};
//!
//! let roster: Vec<Participant> = [7, 6, 5, 5, 4, 4, 3, 1]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, r)| {
//!         let attribute = if i % 2 == 0 { Attribute::High } else { Attribute::Low };
//!         Participant::new(format!("player-{i}"), *r, attribute)
//!     })
//!     .collect();
//!
//! let options = two_options(&roster, 2, &BalanceConfig::default()).unwrap();
//! assert_eq!(options.first.len(), 2);
//! ```

pub mod config;
pub mod diversity;
pub mod error;
pub mod grouping;
pub mod participant;
pub mod search;
pub mod validator;

pub use config::{BalanceConfig, DiversityConfig, SearchConfig};
pub use diversity::{OptionPair, collect_candidates, select_most_distinct, two_options};
pub use error::{BalanceError, BalanceResult};
pub use grouping::{Group, Grouping, Signature};
pub use participant::{
    Attribute, MAX_RATING, MIN_RATING, Participant, Scheme, Tier, TierThresholds, UnknownAttribute,
};
pub use search::partition;
pub use validator::{Constraints, Violation, validate};
