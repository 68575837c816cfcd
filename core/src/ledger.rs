//! The engine's output: one commission ledger record per payable line.

use crate::{
    month::Month,
    rate::Rate,
    types::{AgencyId, ProductId, SaleId, TierLevel, Yen},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// The selling agency's own commission on a sale.
    Direct,
    /// An ancestor's hierarchy bonus on a descendant's sale.
    TierBonus,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct    => "direct",
            Self::TierBonus => "tier_bonus",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct"     => Some(Self::Direct),
            "tier_bonus" => Some(Self::TierBonus),
            _            => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Confirmed,
    CarriedForward,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed      => "confirmed",
            Self::CarriedForward => "carried_forward",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmed"       => Some(Self::Confirmed),
            "carried_forward" => Some(Self::CarriedForward),
            _                 => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionRecord {
    pub agency_id:            AgencyId,
    pub sale_id:              SaleId,
    pub month:                Month,
    pub kind:                 RecordKind,
    pub base_amount:          Yen,
    pub tier_bonus:           Yen,
    pub campaign_bonus:       Yen,
    pub invoice_deduction:    Yen,
    /// Absent when withholding is not applicable to the payee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withholding_tax:      Option<Yen>,
    pub final_amount:         Yen,
    pub status:               RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carry_forward_reason: Option<String>,

    // ── Display metadata ───────────────────────────
    pub agency_name:       String,
    pub agency_tier_level: TierLevel,
    /// Full amount of the underlying sale, for both record kinds.
    pub sale_amount:       Yen,
    pub sale_date:         NaiveDate,
    pub product_id:        ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name:      Option<String>,
    /// Base commission rate for direct records, bonus rate for tier bonuses.
    pub applied_rate:      Rate,
    /// The agency whose sale generated this record.
    pub source_agency_id:  AgencyId,
}

impl CommissionRecord {
    pub fn is_carried_forward(&self) -> bool {
        self.status == RecordStatus::CarriedForward
    }
}

/// Reason attached to every record of an agency whose month falls short.
pub fn carry_forward_reason(monthly_total: Yen, minimum: Yen) -> String {
    format!(
        "Monthly total ¥{} is below the minimum payment amount of ¥{}; carried forward to next month",
        format_yen(monthly_total),
        format_yen(minimum)
    )
}

/// `1234567` → `"1,234,567"`.
pub fn format_yen(amount: Yen) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_yen_groups_thousands() {
        assert_eq!(format_yen(0), "0");
        assert_eq!(format_yen(800), "800");
        assert_eq!(format_yen(10_000), "10,000");
        assert_eq!(format_yen(1_234_567), "1,234,567");
        assert_eq!(format_yen(-45_000), "-45,000");
    }

    #[test]
    fn reason_names_both_amounts() {
        let reason = carry_forward_reason(800, 10_000);
        assert!(reason.contains("¥800"));
        assert!(reason.contains("10,000"));
    }
}
