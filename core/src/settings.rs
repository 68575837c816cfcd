//! Commission settings and their per-sale resolution.
//!
//! Resolution order (fixed): the snapshot embedded in the sale, then the
//! batch-level settings passed to the run, then the hard-coded defaults
//! in `PayoutConfig`. A snapshot replaces the batch settings wholesale;
//! only fields missing from whichever object wins fall back to defaults.

use crate::{
    config::PayoutConfig,
    model::Sale,
    rate::Rate,
    types::{TierLevel, Yen},
};
use serde::{Deserialize, Serialize};

/// Explicit ancestor-bonus overrides, keyed by the ancestor's tier.
/// Only tiers 1–3 can earn an ancestor bonus override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierBonusRates {
    #[serde(default)]
    pub tier1: Option<Rate>,
    #[serde(default)]
    pub tier2: Option<Rate>,
    #[serde(default)]
    pub tier3: Option<Rate>,
}

impl TierBonusRates {
    pub fn for_tier(&self, tier: TierLevel) -> Option<Rate> {
        match tier {
            1 => self.tier1,
            2 => self.tier2,
            3 => self.tier3,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionSettings {
    pub tier_bonus_rates:           Option<TierBonusRates>,
    pub non_invoice_deduction_rate: Option<Rate>,
    pub withholding_tax_rate:       Option<Rate>,
    pub minimum_payment_amount:     Option<Yen>,
}

impl CommissionSettings {
    /// The settings object that governs `sale`: its own snapshot if it
    /// carries one, otherwise the batch argument.
    pub fn effective<'a>(
        sale: &'a Sale,
        batch: Option<&'a CommissionSettings>,
    ) -> Option<&'a CommissionSettings> {
        sale.commission_settings.as_ref().or(batch)
    }
}

/// Settings with every field filled in, ready for the calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings<'a> {
    overrides:                  Option<&'a TierBonusRates>,
    config:                     &'a PayoutConfig,
    pub non_invoice_deduction_rate: Rate,
    pub withholding_tax_rate:       Rate,
    pub minimum_payment_amount:     Yen,
}

impl<'a> ResolvedSettings<'a> {
    pub fn resolve(settings: Option<&'a CommissionSettings>, config: &'a PayoutConfig) -> Self {
        Self {
            overrides: settings.and_then(|s| s.tier_bonus_rates.as_ref()),
            config,
            non_invoice_deduction_rate: settings
                .and_then(|s| s.non_invoice_deduction_rate)
                .unwrap_or(config.non_invoice_deduction_rate),
            withholding_tax_rate: settings
                .and_then(|s| s.withholding_tax_rate)
                .unwrap_or(config.withholding_tax_rate),
            minimum_payment_amount: settings
                .and_then(|s| s.minimum_payment_amount)
                .unwrap_or(config.minimum_payment_amount),
        }
    }

    /// Base commission rate from the default table for a seller tier.
    pub fn default_commission_rate(&self, seller_tier: TierLevel) -> Rate {
        self.config.default_commission_rate(seller_tier)
    }

    /// Bonus rate for an ancestor at `ancestor_tier`.
    pub fn ancestor_bonus_rate(&self, ancestor_tier: TierLevel) -> Rate {
        self.overrides
            .and_then(|o| o.for_tier(ancestor_tier))
            .unwrap_or_else(|| self.config.default_ancestor_bonus_rate(ancestor_tier))
    }
}
