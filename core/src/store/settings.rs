use super::PayoutStore;
use crate::{error::PayoutResult, month::Month, settings::CommissionSettings};
use rusqlite::{params, OptionalExtension};

impl PayoutStore {
    /// Record the batch settings a calculation ran with.
    pub fn save_settings_snapshot(
        &self,
        run_id: &str,
        month: Month,
        settings: &CommissionSettings,
    ) -> PayoutResult<()> {
        let json = serde_json::to_string(settings)?;
        self.conn.execute(
            "INSERT INTO settings_snapshot (run_id, month, settings_json) VALUES (?1, ?2, ?3)",
            params![run_id, month.to_string(), json],
        )?;
        Ok(())
    }

    /// Most recent snapshot for `month`, if any calculation recorded one.
    pub fn settings_for_month(&self, month: Month) -> PayoutResult<Option<CommissionSettings>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT settings_json FROM settings_snapshot
                 WHERE month = ?1 ORDER BY id DESC LIMIT 1",
                params![month.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let settings = json
            .map(|j| serde_json::from_str::<CommissionSettings>(&j))
            .transpose()?;
        Ok(settings)
    }

    /// Most recent snapshot across all months.
    pub fn latest_settings_snapshot(&self) -> PayoutResult<Option<CommissionSettings>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT settings_json FROM settings_snapshot ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let settings = json
            .map(|j| serde_json::from_str::<CommissionSettings>(&j))
            .transpose()?;
        Ok(settings)
    }

    /// Batch settings to replay when recalculating `month` without explicit
    /// settings: the month's own snapshot first, then the newest on record.
    pub fn batch_settings_for(&self, month: Month) -> PayoutResult<Option<CommissionSettings>> {
        match self.settings_for_month(month)? {
            Some(settings) => Ok(Some(settings)),
            None => self.latest_settings_snapshot(),
        }
    }
}
