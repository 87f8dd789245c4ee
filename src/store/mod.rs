#[cfg(test)]
mod tests;

use crate::parser::{ParcelId, ParcelRecord};
use crate::settings::{validate_entry, LockerSettings, DEFAULT_LOCKERS};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Storage format for arrival timestamps
const ARRIVAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SEEDED_KEY: &str = "lockers_seeded";

/// SQLite-backed store for locker settings and imported parcels
pub struct ParcelStore {
    conn: Connection,
}

/// Raw parcel row before conversion back into a record
struct ParcelRow {
    id: String,
    arrival: String,
    locker_name: String,
    pickup_code: String,
    free_hours: Option<u32>,
    raw_text: String,
}

impl ParcelStore {
    /// Create a new in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open (or create) a store file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .context(format!("Failed to open database at {}", path.display()))?;
        let store = Self { conn };
        store.init_schema()?;
        debug!(path = %path.display(), "opened parcel store");
        Ok(store)
    }

    /// Initialize schema and seed default lockers on first use
    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS lockers (
                name TEXT PRIMARY KEY,
                free_hours INTEGER NOT NULL CHECK (free_hours >= 1)
            );

            CREATE TABLE IF NOT EXISTS parcels (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                arrival TEXT NOT NULL,
                locker_name TEXT NOT NULL,
                pickup_code TEXT NOT NULL,
                free_hours INTEGER,
                raw_text TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_parcels_locker ON parcels(locker_name);
            "#,
            )
            .context("Failed to initialize database schema")?;

        // Seed once: removing every locker later must not bring the defaults back.
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO meta (key, value) VALUES (?1, '1')",
                params![SEEDED_KEY],
            )
            .context("Failed to record seed marker")?;

        if inserted > 0 {
            for (name, hours) in DEFAULT_LOCKERS {
                self.conn
                    .execute(
                        "INSERT OR IGNORE INTO lockers (name, free_hours) VALUES (?1, ?2)",
                        params![name, hours],
                    )
                    .context(format!("Failed to seed locker: {}", name))?;
            }
            info!(count = DEFAULT_LOCKERS.len(), "seeded default lockers");
        }

        Ok(())
    }

    /// Load all locker settings
    pub fn load_settings(&self) -> Result<LockerSettings> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, free_hours FROM lockers")
            .context("Failed to prepare statement")?;

        let settings = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))
            .context("Failed to query lockers")?
            .collect::<Result<LockerSettings, _>>()
            .context("Failed to collect lockers")?;

        Ok(settings)
    }

    /// Add or replace a locker's free hours
    pub fn save_setting(&self, name: &str, hours: u32) -> Result<()> {
        let name = validate_entry(name, hours)?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO lockers (name, free_hours) VALUES (?1, ?2)",
                params![name, hours],
            )
            .context(format!("Failed to save locker: {}", name))?;
        Ok(())
    }

    /// Delete a locker setting. Returns whether it existed.
    pub fn delete_setting(&self, name: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM lockers WHERE name = ?1", params![name.trim()])
            .context(format!("Failed to delete locker: {}", name))?;
        Ok(deleted > 0)
    }

    /// Append parcels after the existing ones, in order
    pub fn append_parcels(&mut self, records: &[ParcelRecord]) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;

        for record in records {
            tx.execute(
                "INSERT INTO parcels (id, arrival, locker_name, pickup_code, free_hours, raw_text) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id().to_string(),
                    record.arrival().format(ARRIVAL_FORMAT).to_string(),
                    record.locker_name(),
                    record.pickup_code(),
                    record.free_hours_override(),
                    record.raw_text(),
                ],
            )
            .context(format!("Failed to insert parcel: {}", record.id()))?;
        }

        tx.commit().context("Failed to commit parcels")?;
        debug!(count = records.len(), "appended parcels");
        Ok(records.len())
    }

    /// Get all parcels in import order
    pub fn list_parcels(&self) -> Result<Vec<ParcelRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, arrival, locker_name, pickup_code, free_hours, raw_text FROM parcels ORDER BY seq")
            .context("Failed to prepare statement")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ParcelRow {
                    id: row.get(0)?,
                    arrival: row.get(1)?,
                    locker_name: row.get(2)?,
                    pickup_code: row.get(3)?,
                    free_hours: row.get(4)?,
                    raw_text: row.get(5)?,
                })
            })
            .context("Failed to query parcels")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect parcels")?;

        rows.into_iter().map(ParcelRow::into_record).collect()
    }

    /// Delete one parcel. Returns whether it existed.
    pub fn delete_parcel(&self, id: ParcelId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM parcels WHERE id = ?1", params![id.to_string()])
            .context(format!("Failed to delete parcel: {}", id))?;
        Ok(deleted > 0)
    }

    /// Delete every parcel, keeping locker settings
    pub fn clear_parcels(&self) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM parcels", [])
            .context("Failed to clear parcels")?;
        info!(count = deleted, "cleared parcels");
        Ok(deleted)
    }

    /// Get statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let locker_count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM lockers", [], |row| row.get(0))
            .context("Failed to count lockers")?;

        let parcel_count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM parcels", [], |row| row.get(0))
            .context("Failed to count parcels")?;

        Ok(StoreStats {
            locker_count,
            parcel_count,
        })
    }

    /// Write a consistent copy of the store to `path`
    pub fn backup_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .context(format!("Backup path has no file name: {}", path.display()))?;

        // VACUUM INTO refuses to overwrite, so stage beside the target and
        // rename over it. An existing backup survives a failed run.
        let staging = path.with_file_name(format!(
            ".{}.{}.tmp",
            file_name.to_string_lossy(),
            Uuid::new_v4()
        ));
        let safe_path = staging.to_string_lossy().replace('\'', "''");
        let sql = format!("VACUUM INTO '{}'", safe_path);

        let result = self
            .conn
            .execute_batch(&sql)
            .context(format!("Failed to back up database to {}", path.display()))
            .and_then(|()| {
                fs::rename(&staging, path)
                    .context(format!("Failed to move backup into place at {}", path.display()))
            });

        if let Err(err) = result {
            if let Err(cleanup) = fs::remove_file(&staging) {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %staging.display(), error = %cleanup, "failed to remove staged backup");
                }
            }
            return Err(err);
        }

        info!(path = %path.display(), "backed up parcel store");
        Ok(())
    }
}

impl ParcelRow {
    fn into_record(self) -> Result<ParcelRecord> {
        let id = ParcelId::parse(&self.id).context(format!("Invalid parcel id: {}", self.id))?;
        let arrival = NaiveDateTime::parse_from_str(&self.arrival, ARRIVAL_FORMAT)
            .context(format!("Invalid arrival for parcel {}: {}", self.id, self.arrival))?;

        Ok(ParcelRecord::restore(
            id,
            arrival,
            self.locker_name,
            self.pickup_code,
            self.free_hours,
            self.raw_text,
        ))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStats {
    pub locker_count: u32,
    pub parcel_count: u32,
}
