//! Monthly aggregation and the carry-forward policy.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Index agencies and products by id.
//!   2. Walk sales in input order; sales by unknown agencies are skipped.
//!   3. Per sale: resolve settings, calculate, emit the direct record
//!      followed by one tier-bonus record per ancestor bonus.
//!   4. Per agency (first-seen order): total the month, add the campaign
//!      bonus to the agency's first record, decide payable vs carried
//!      forward for every record of that agency.
//!
//! RULES:
//!   - Sale order is significant: the first record an agency receives is
//!     the one that carries its campaign bonus.
//!   - Records are never merged; a run always produces the full set for
//!     the month, meant to replace whatever was stored before.
//!   - The engine performs no I/O and keeps no state between runs.

use crate::{
    campaign::campaign_bonus,
    commission::{calculate_sale, AncestorBonus, CommissionBreakdown},
    config::PayoutConfig,
    hierarchy::ancestor_chain,
    ledger::{carry_forward_reason, CommissionRecord, RecordKind, RecordStatus},
    model::{Agency, AgencyIndex, Product, ProductIndex, Sale},
    month::Month,
    settings::{CommissionSettings, ResolvedSettings},
    types::{AgencyId, Yen},
};
use std::collections::HashMap;

pub struct PayoutEngine {
    config: PayoutConfig,
}

/// Per-agency running totals for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct AgencyMonth {
    /// Record positions in emission order; the first one wins the campaign bonus.
    record_indices: Vec<usize>,
    total_sales:    Yen,
    total_amount:   Yen,
}

impl Default for PayoutEngine {
    fn default() -> Self {
        Self::new(PayoutConfig::default())
    }
}

impl PayoutEngine {
    pub fn new(config: PayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PayoutConfig {
        &self.config
    }

    /// Compute the complete commission ledger for `month`.
    ///
    /// `sales` must already be filtered to confirmed sales of that month
    /// and `agencies` to active agencies. The result is ordered by sale:
    /// each direct record is followed by the bonus records it produced.
    pub fn calculate_month(
        &self,
        sales: &[Sale],
        agencies: &[Agency],
        products: &[Product],
        month: Month,
        settings: Option<&CommissionSettings>,
    ) -> Vec<CommissionRecord> {
        let agency_index = AgencyIndex::new(agencies);
        let product_index = ProductIndex::new(products);

        let mut records: Vec<CommissionRecord> = Vec::new();
        let mut skipped = 0usize;

        for sale in sales {
            let Some(seller) = agency_index.get(&sale.agency_id) else {
                log::warn!(
                    "month={month} aggregator: sale {} references unknown agency {}; skipped",
                    sale.id, sale.agency_id
                );
                skipped += 1;
                continue;
            };

            let effective = CommissionSettings::effective(sale, settings);
            let resolved = ResolvedSettings::resolve(effective, &self.config);
            let product = product_index.get(&sale.product_id);
            let ancestors = ancestor_chain(&seller.id, &agency_index);
            let breakdown = calculate_sale(sale, seller, product, &ancestors, &resolved);

            log::debug!(
                "month={month} aggregator: sale {} by {} base={} bonuses={} final={}",
                sale.id,
                seller.id,
                breakdown.base_amount,
                breakdown.ancestor_bonuses.len(),
                breakdown.final_amount
            );

            records.push(direct_record(sale, seller, product, month, &breakdown));
            for bonus in &breakdown.ancestor_bonuses {
                let Some(ancestor) = agency_index.get(&bonus.agency_id) else {
                    continue;
                };
                records.push(bonus_record(sale, seller, ancestor, product, month, bonus));
            }
        }

        // Agency order is the order agencies first appear in the ledger.
        let mut order: Vec<AgencyId> = Vec::new();
        let mut months: HashMap<AgencyId, AgencyMonth> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            let entry = months.entry(record.agency_id.clone()).or_insert_with(|| {
                order.push(record.agency_id.clone());
                AgencyMonth::default()
            });
            entry.record_indices.push(i);
            entry.total_sales = entry.total_sales.saturating_add(record.sale_amount);
            entry.total_amount = entry.total_amount.saturating_add(record.final_amount);
        }

        let minimum = ResolvedSettings::resolve(settings, &self.config).minimum_payment_amount;
        let mut campaign_awards = 0usize;
        let mut carried_agencies = 0usize;

        for agency_id in &order {
            let Some(agency_month) = months.get_mut(agency_id) else {
                continue;
            };
            let Some(&first) = agency_month.record_indices.first() else {
                continue;
            };

            let tier = records[first].agency_tier_level;
            let bonus = campaign_bonus(agency_month.total_sales, tier, &self.config);
            if bonus > 0 {
                let record = &mut records[first];
                record.campaign_bonus = record.campaign_bonus.saturating_add(bonus);
                record.final_amount = record.final_amount.saturating_add(bonus);
                agency_month.total_amount = agency_month.total_amount.saturating_add(bonus);
                campaign_awards += 1;
                log::debug!(
                    "month={month} aggregator: campaign bonus {bonus} for {agency_id} (sales {})",
                    agency_month.total_sales
                );
            }

            if agency_month.total_amount < minimum {
                let reason = carry_forward_reason(agency_month.total_amount, minimum);
                for &i in &agency_month.record_indices {
                    records[i].status = RecordStatus::CarriedForward;
                    records[i].carry_forward_reason = Some(reason.clone());
                }
                carried_agencies += 1;
            }
        }

        log::info!(
            "month={month} aggregator: {} records for {} agencies from {} sales \
             ({skipped} skipped, {campaign_awards} campaign bonuses, {carried_agencies} carried forward)",
            records.len(),
            order.len(),
            sales.len()
        );

        records
    }
}

fn direct_record(
    sale: &Sale,
    seller: &Agency,
    product: Option<&Product>,
    month: Month,
    breakdown: &CommissionBreakdown,
) -> CommissionRecord {
    CommissionRecord {
        agency_id:            seller.id.clone(),
        sale_id:              sale.id.clone(),
        month,
        kind:                 RecordKind::Direct,
        base_amount:          breakdown.base_amount,
        tier_bonus:           0,
        campaign_bonus:       0,
        invoice_deduction:    breakdown.invoice_deduction,
        withholding_tax:      breakdown.withholding_tax,
        final_amount:         breakdown.final_amount,
        status:               RecordStatus::Confirmed,
        carry_forward_reason: None,
        agency_name:          seller.name.clone(),
        agency_tier_level:    seller.tier_level,
        sale_amount:          sale.total_amount,
        sale_date:            sale.sale_date,
        product_id:           sale.product_id.clone(),
        product_name:         product.map(|p| p.name.clone()),
        applied_rate:         breakdown.commission_rate,
        source_agency_id:     seller.id.clone(),
    }
}

fn bonus_record(
    sale: &Sale,
    seller: &Agency,
    ancestor: &Agency,
    product: Option<&Product>,
    month: Month,
    bonus: &AncestorBonus,
) -> CommissionRecord {
    CommissionRecord {
        agency_id:            ancestor.id.clone(),
        sale_id:              sale.id.clone(),
        month,
        kind:                 RecordKind::TierBonus,
        base_amount:          0,
        tier_bonus:           bonus.amount,
        campaign_bonus:       0,
        invoice_deduction:    0,
        withholding_tax:      Some(0),
        final_amount:         bonus.amount,
        status:               RecordStatus::Confirmed,
        carry_forward_reason: None,
        agency_name:          ancestor.name.clone(),
        agency_tier_level:    ancestor.tier_level,
        sale_amount:          sale.total_amount,
        sale_date:            sale.sale_date,
        product_id:           sale.product_id.clone(),
        product_name:         product.map(|p| p.name.clone()),
        applied_rate:         bonus.rate,
        source_agency_id:     seller.id.clone(),
    }
}
