//! redb table definitions for the roster store.

use redb::TableDefinition;

/// Participants keyed by name, JSON values.
pub const PLAYERS: TableDefinition<&str, &[u8]> = TableDefinition::new("players");
