//! Per-sale commission calculation.
//!
//! ORDER OF OPERATIONS (fixed):
//!   1. commission rate  (product tier override, else default table)
//!   2. base amount      floor(sale × rate / 100)
//!   3. ancestor bonuses floor(sale × bonus rate / 100), off the raw sale
//!   4. invoice deduction on the base, unregistered sellers only
//!   5. withholding tax  on (base − deduction), individuals / flagged only
//!   6. final amount     base − deduction − withholding
//!
//! Ancestor bonuses and campaign bonuses are never folded into the
//! seller's final amount; they become separate ledger records.

use crate::{
    model::{Agency, Product, Sale},
    rate::Rate,
    settings::ResolvedSettings,
    types::{AgencyId, SaleId, TierLevel, Yen},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncestorBonus {
    pub agency_id:  AgencyId,
    pub tier_level: TierLevel,
    pub rate:       Rate,
    pub amount:     Yen,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    pub sale_id:           SaleId,
    pub agency_id:         AgencyId,
    pub commission_rate:   Rate,
    pub base_amount:       Yen,
    pub ancestor_bonuses:  Vec<AncestorBonus>,
    pub invoice_deduction: Yen,
    /// `None` when withholding does not apply to the seller at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withholding_tax:   Option<Yen>,
    pub final_amount:      Yen,
}

/// Product override for the seller's tier if set, else the default table.
pub fn commission_rate(
    seller: &Agency,
    product: Option<&Product>,
    settings: &ResolvedSettings<'_>,
) -> Rate {
    product
        .and_then(|p| p.commission_rates.for_tier(seller.tier_level))
        .unwrap_or_else(|| settings.default_commission_rate(seller.tier_level))
}

pub fn calculate_sale(
    sale: &Sale,
    seller: &Agency,
    product: Option<&Product>,
    ancestors: &[&Agency],
    settings: &ResolvedSettings<'_>,
) -> CommissionBreakdown {
    let rate = commission_rate(seller, product, settings);
    let base_amount = rate.apply(sale.total_amount);

    let ancestor_bonuses: Vec<AncestorBonus> = ancestors
        .iter()
        .filter(|a| a.tier_level < seller.tier_level)
        .filter_map(|a| {
            let bonus_rate = settings.ancestor_bonus_rate(a.tier_level);
            if bonus_rate.is_zero() {
                return None;
            }
            Some(AncestorBonus {
                agency_id:  a.id.clone(),
                tier_level: a.tier_level,
                rate:       bonus_rate,
                amount:     bonus_rate.apply(sale.total_amount),
            })
        })
        .collect();

    let invoice_deduction = if seller.invoice_registered {
        0
    } else {
        settings.non_invoice_deduction_rate.apply(base_amount)
    };

    let withholding_tax = seller
        .subject_to_withholding()
        .then(|| settings.withholding_tax_rate.apply(base_amount - invoice_deduction));

    let final_amount = base_amount - invoice_deduction - withholding_tax.unwrap_or(0);

    CommissionBreakdown {
        sale_id: sale.id.clone(),
        agency_id: seller.id.clone(),
        commission_rate: rate,
        base_amount,
        ancestor_bonuses,
        invoice_deduction,
        withholding_tax,
        final_amount,
    }
}
