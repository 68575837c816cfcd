//! Ledger roll-ups for reporting, audit and the monthly notices.
//!
//! Pure reductions over a record list. Nothing here changes a record.

use crate::{
    ledger::CommissionRecord,
    month::Month,
    types::{AgencyId, TierLevel, Yen},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub count:            usize,
    /// Sale amount of every record paid to the tier, bonus records included.
    /// A sale earning an ancestor bonus counts once at the seller's tier and
    /// again at the ancestor's, the same volume campaigns see, so the tiers
    /// do not sum to gross sales.
    pub total_sales:      Yen,
    pub total_commission: Yen,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub record_count:            usize,
    pub agency_count:            usize,
    pub total_base_amount:       Yen,
    pub total_tier_bonus:        Yen,
    pub total_campaign_bonus:    Yen,
    pub total_invoice_deduction: Yen,
    pub total_withholding_tax:   Yen,
    pub total_final_amount:      Yen,
    pub total_payable:           Yen,
    pub total_carried_forward:   Yen,
    pub by_tier:                 BTreeMap<TierLevel, TierBreakdown>,
}

pub fn summarize(records: &[CommissionRecord]) -> LedgerSummary {
    let mut summary = LedgerSummary::default();
    let mut agencies: HashSet<&str> = HashSet::new();

    for r in records {
        summary.record_count += 1;
        agencies.insert(&r.agency_id);

        summary.total_base_amount       += r.base_amount;
        summary.total_tier_bonus        += r.tier_bonus;
        summary.total_campaign_bonus    += r.campaign_bonus;
        summary.total_invoice_deduction += r.invoice_deduction;
        summary.total_withholding_tax   += r.withholding_tax.unwrap_or(0);
        summary.total_final_amount      += r.final_amount;

        if r.is_carried_forward() {
            summary.total_carried_forward += r.final_amount;
        } else {
            summary.total_payable += r.final_amount;
        }

        let tier = summary.by_tier.entry(r.agency_tier_level).or_default();
        tier.count            += 1;
        tier.total_sales      += r.sale_amount;
        tier.total_commission += r.final_amount;
    }

    summary.agency_count = agencies.len();
    summary
}

/// A payout notice for one agency whose month clears the minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutNotice {
    pub agency_id:    AgencyId,
    pub agency_name:  String,
    pub month:        Month,
    pub record_count: usize,
    pub total_amount: Yen,
}

/// One notice per agency whose monthly total_amount is at least
/// `minimum`, in the order agencies first appear in the ledger.
pub fn payout_notices(records: &[CommissionRecord], minimum: Yen) -> Vec<PayoutNotice> {
    let mut notices: Vec<PayoutNotice> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for r in records {
        let i = *position.entry(r.agency_id.as_str()).or_insert_with(|| {
            notices.push(PayoutNotice {
                agency_id:    r.agency_id.clone(),
                agency_name:  r.agency_name.clone(),
                month:        r.month,
                record_count: 0,
                total_amount: 0,
            });
            notices.len() - 1
        });
        notices[i].record_count += 1;
        notices[i].total_amount += r.final_amount;
    }

    notices.retain(|n| n.total_amount >= minimum);
    notices
}
