//! fairplay-roster — embedded roster store.
//!
//! Backed by [redb](https://docs.rs/redb). Participants are JSON-serialized
//! into a single `players` table keyed by name.
//!
//! The `RosterStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks.

pub mod error;
pub mod store;
pub mod tables;

pub use error::{RosterError, RosterResult};
pub use store::RosterStore;
