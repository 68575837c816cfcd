use super::PayoutStore;
use crate::{
    error::{PayoutError, PayoutResult},
    ledger::{CommissionRecord, RecordKind, RecordStatus},
    month::Month,
    rate::Rate,
};
use chrono::NaiveDate;
use rusqlite::params;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub deleted:  usize,
    pub inserted: usize,
}

/// Column values as they come out of SQLite, before domain parsing.
struct RecordRow {
    month:                String,
    agency_id:            String,
    sale_id:              String,
    kind:                 String,
    base_amount:          i64,
    tier_bonus:           i64,
    campaign_bonus:       i64,
    invoice_deduction:    i64,
    withholding_tax:      Option<i64>,
    final_amount:         i64,
    status:               String,
    carry_forward_reason: Option<String>,
    agency_name:          String,
    agency_tier_level:    i64,
    sale_amount:          i64,
    sale_date:            String,
    product_id:           String,
    product_name:         Option<String>,
    applied_rate:         f64,
    source_agency_id:     String,
}

impl RecordRow {
    fn into_record(self) -> PayoutResult<CommissionRecord> {
        let corrupt = |what: &str, value: &str| {
            PayoutError::Other(anyhow::anyhow!("stored record has invalid {what}: {value}"))
        };
        Ok(CommissionRecord {
            month:                self.month.parse()?,
            kind:                 RecordKind::parse(&self.kind)
                .ok_or_else(|| corrupt("kind", &self.kind))?,
            status:               RecordStatus::parse(&self.status)
                .ok_or_else(|| corrupt("status", &self.status))?,
            agency_tier_level:    u8::try_from(self.agency_tier_level)
                .map_err(|_| corrupt("tier", &self.agency_tier_level.to_string()))?,
            sale_date:            NaiveDate::parse_from_str(&self.sale_date, DATE_FORMAT)
                .map_err(|_| corrupt("sale_date", &self.sale_date))?,
            applied_rate:         Rate::from_percent(self.applied_rate)?,
            agency_id:            self.agency_id,
            sale_id:              self.sale_id,
            base_amount:          self.base_amount,
            tier_bonus:           self.tier_bonus,
            campaign_bonus:       self.campaign_bonus,
            invoice_deduction:    self.invoice_deduction,
            withholding_tax:      self.withholding_tax,
            final_amount:         self.final_amount,
            carry_forward_reason: self.carry_forward_reason,
            agency_name:          self.agency_name,
            sale_amount:          self.sale_amount,
            product_id:           self.product_id,
            product_name:         self.product_name,
            source_agency_id:     self.source_agency_id,
        })
    }
}

impl PayoutStore {
    /// Replace the stored ledger for `month` with `records`.
    ///
    /// Delete and insert run in one transaction: if any insert fails the
    /// previous ledger for the month is left untouched.
    pub fn replace_month(
        &self,
        month: Month,
        records: &[CommissionRecord],
    ) -> PayoutResult<ReplaceOutcome> {
        let key = month.to_string();
        let tx = self.conn.unchecked_transaction()?;

        let deleted = tx.execute(
            "DELETE FROM commission_record WHERE month = ?1",
            params![key],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO commission_record (
                    month, seq, agency_id, sale_id, kind,
                    base_amount, tier_bonus, campaign_bonus, invoice_deduction,
                    withholding_tax, final_amount, status, carry_forward_reason,
                    agency_name, agency_tier_level, sale_amount, sale_date,
                    product_id, product_name, applied_rate, source_agency_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                          ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
            )?;
            for (seq, r) in records.iter().enumerate() {
                if r.month != month {
                    return Err(PayoutError::Other(anyhow::anyhow!(
                        "record for sale {} belongs to {}, not {month}",
                        r.sale_id,
                        r.month
                    )));
                }
                stmt.execute(params![
                    key,
                    seq as i64,
                    r.agency_id,
                    r.sale_id,
                    r.kind.as_str(),
                    r.base_amount,
                    r.tier_bonus,
                    r.campaign_bonus,
                    r.invoice_deduction,
                    r.withholding_tax,
                    r.final_amount,
                    r.status.as_str(),
                    r.carry_forward_reason,
                    r.agency_name,
                    r.agency_tier_level as i64,
                    r.sale_amount,
                    r.sale_date.format(DATE_FORMAT).to_string(),
                    r.product_id,
                    r.product_name,
                    r.applied_rate.as_percent(),
                    r.source_agency_id,
                ])?;
            }
        }

        tx.commit()?;
        log::info!(
            "month={month} store: replaced ledger ({deleted} deleted, {} inserted)",
            records.len()
        );
        Ok(ReplaceOutcome { deleted, inserted: records.len() })
    }

    /// Stored ledger for `month`, in the order it was calculated.
    pub fn records_for_month(&self, month: Month) -> PayoutResult<Vec<CommissionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT month, agency_id, sale_id, kind,
                    base_amount, tier_bonus, campaign_bonus, invoice_deduction,
                    withholding_tax, final_amount, status, carry_forward_reason,
                    agency_name, agency_tier_level, sale_amount, sale_date,
                    product_id, product_name, applied_rate, source_agency_id
             FROM commission_record WHERE month = ?1
             ORDER BY seq ASC",
        )?;
        let rows = stmt
            .query_map(params![month.to_string()], |row| {
                Ok(RecordRow {
                    month:                row.get(0)?,
                    agency_id:            row.get(1)?,
                    sale_id:              row.get(2)?,
                    kind:                 row.get(3)?,
                    base_amount:          row.get(4)?,
                    tier_bonus:           row.get(5)?,
                    campaign_bonus:       row.get(6)?,
                    invoice_deduction:    row.get(7)?,
                    withholding_tax:      row.get(8)?,
                    final_amount:         row.get(9)?,
                    status:               row.get(10)?,
                    carry_forward_reason: row.get(11)?,
                    agency_name:          row.get(12)?,
                    agency_tier_level:    row.get(13)?,
                    sale_amount:          row.get(14)?,
                    sale_date:            row.get(15)?,
                    product_id:           row.get(16)?,
                    product_name:         row.get(17)?,
                    applied_rate:         row.get(18)?,
                    source_agency_id:     row.get(19)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RecordRow::into_record).collect()
    }

    /// Like `records_for_month`, but an empty month is an error.
    pub fn require_month(&self, month: Month) -> PayoutResult<Vec<CommissionRecord>> {
        let records = self.records_for_month(month)?;
        if records.is_empty() {
            return Err(PayoutError::MonthNotFound { month: month.to_string() });
        }
        Ok(records)
    }

    /// Months that have a stored ledger, oldest first.
    pub fn stored_months(&self) -> PayoutResult<Vec<Month>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT month FROM commission_record ORDER BY month ASC",
        )?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        raw.iter().map(|m| m.parse()).collect()
    }
}
