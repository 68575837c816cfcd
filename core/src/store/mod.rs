//! SQLite persistence for the ledger, settings history and audit log.
//!
//! RULE: Only the store talks to the database.
//! The engine never touches it; callers persist what the engine returns.

use crate::{
    error::PayoutResult,
    event::{EventLogEntry, PayoutEvent},
};
use rusqlite::{params, Connection};

mod ledger;
mod settings;

pub use ledger::ReplaceOutcome;

pub struct PayoutStore {
    conn: Connection,
}

impl PayoutStore {
    /// Open (or create) the payout database at `path`.
    pub fn open(path: &str) -> PayoutResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> PayoutResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> PayoutResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_ledger.sql"))?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, run_id: &str, event: &PayoutEvent) -> PayoutResult<()> {
        let payload = serde_json::to_string(event)?;
        self.conn.execute(
            "INSERT INTO event_log (run_id, month, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![run_id, event.month().to_string(), event.type_name(), payload],
        )?;
        Ok(())
    }

    pub fn events_for_run(&self, run_id: &str) -> PayoutResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, month, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![run_id], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    run_id:     row.get(1)?,
                    month:      row.get(2)?,
                    event_type: row.get(3)?,
                    payload:    row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
