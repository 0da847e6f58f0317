//! RosterStore — redb-backed roster persistence.
//!
//! Typed CRUD over participants. The store supports both on-disk and
//! in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use fairplay_core::Participant;
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{RosterError, RosterResult};
use crate::tables::PLAYERS;

/// Convert any `Display` error into a `RosterError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| RosterError::$variant(e.to_string())
    };
}

/// Thread-safe roster store backed by redb.
#[derive(Clone)]
pub struct RosterStore {
    db: Arc<Database>,
}

impl RosterStore {
    /// Open (or create) a persistent roster at the given path.
    pub fn open(path: &Path) -> RosterResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "roster store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory roster (for testing).
    pub fn open_in_memory() -> RosterResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory roster store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> RosterResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        txn.open_table(PLAYERS).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Insert or update a player.
    pub fn put_player(&self, player: &Participant) -> RosterResult<()> {
        let value = serde_json::to_vec(player).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(PLAYERS).map_err(map_err!(Table))?;
            table
                .insert(player.name.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(name = %player.name, "player stored");
        Ok(())
    }

    /// Upsert a batch of players in one transaction. Returns the count written.
    pub fn import(&self, players: &[Participant]) -> RosterResult<usize> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(PLAYERS).map_err(map_err!(Table))?;
            for player in players {
                let value = serde_json::to_vec(player).map_err(map_err!(Serialize))?;
                table
                    .insert(player.name.as_str(), value.as_slice())
                    .map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(count = players.len(), "players imported");
        Ok(players.len())
    }

    /// Insert a batch of new players in one transaction. Fails without
    /// writing anything if any name is already taken.
    pub fn add_players(&self, players: &[Participant]) -> RosterResult<usize> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(PLAYERS).map_err(map_err!(Table))?;
            for player in players {
                if table
                    .get(player.name.as_str())
                    .map_err(map_err!(Read))?
                    .is_some()
                {
                    return Err(RosterError::AlreadyExists(player.name.clone()));
                }
                let value = serde_json::to_vec(player).map_err(map_err!(Serialize))?;
                table
                    .insert(player.name.as_str(), value.as_slice())
                    .map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(count = players.len(), "players added");
        Ok(players.len())
    }

    /// Get a player by name.
    pub fn get_player(&self, name: &str) -> RosterResult<Option<Participant>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PLAYERS).map_err(map_err!(Table))?;
        match table.get(name).map_err(map_err!(Read))? {
            Some(guard) => {
                let player: Participant =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(player))
            }
            None => Ok(None),
        }
    }

    /// List all players, ordered by name.
    pub fn list_players(&self) -> RosterResult<Vec<Participant>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(PLAYERS).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let player: Participant =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(player);
        }
        Ok(results)
    }

    /// Look up several players by name, preserving the requested order.
    /// Returns the names that were not found as the error payload.
    pub fn get_players(&self, names: &[String]) -> RosterResult<Result<Vec<Participant>, Vec<String>>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();
        for name in names {
            match self.get_player(name)? {
                Some(player) => found.push(player),
                None => missing.push(name.clone()),
            }
        }
        if missing.is_empty() {
            Ok(Ok(found))
        } else {
            Ok(Err(missing))
        }
    }

    /// Replace the record stored under `old_name` with `player`, which may
    /// carry a different name. Both steps commit together. Renaming onto a
    /// name held by another player fails with `AlreadyExists`.
    pub fn rename_player(&self, old_name: &str, player: &Participant) -> RosterResult<()> {
        let value = serde_json::to_vec(player).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(PLAYERS).map_err(map_err!(Table))?;
            if player.name != old_name
                && table
                    .get(player.name.as_str())
                    .map_err(map_err!(Read))?
                    .is_some()
            {
                return Err(RosterError::AlreadyExists(player.name.clone()));
            }
            if table.remove(old_name).map_err(map_err!(Write))?.is_none() {
                return Err(RosterError::NotFound(old_name.to_string()));
            }
            table
                .insert(player.name.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(old = %old_name, new = %player.name, "player updated");
        Ok(())
    }

    /// Delete a player by name. Returns true if it existed.
    pub fn delete_player(&self, name: &str) -> RosterResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(PLAYERS).map_err(map_err!(Table))?;
            existed = table.remove(name).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%name, existed, "player deleted");
        Ok(existed)
    }
}
