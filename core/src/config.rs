//! Rate tables and defaults.
//!
//! `PayoutConfig::default()` is the hard-coded table every run falls back
//! to. Operators may pin it in a JSON file of the same shape and load it
//! with `PayoutConfig::load`; sale snapshots still take precedence.

use crate::{
    campaign::CampaignTier,
    error::{PayoutError, PayoutResult},
    rate::Rate,
    types::{TierLevel, Yen},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// Base commission rate per selling-agency tier.
    pub commission_rates:           BTreeMap<TierLevel, Rate>,
    /// Used when a seller's tier is missing from `commission_rates`.
    pub fallback_commission_rate:   Rate,
    /// Ancestor bonus rate per ancestor tier.
    pub ancestor_bonus_rates:       BTreeMap<TierLevel, Rate>,
    pub non_invoice_deduction_rate: Rate,
    pub withholding_tax_rate:       Rate,
    pub minimum_payment_amount:     Yen,
    pub campaign_tiers:             BTreeMap<TierLevel, CampaignTier>,
    pub campaign_fallback:          CampaignTier,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        let commission_rates = BTreeMap::from([
            (1, Rate::from_hundredths(1000)),
            (2, Rate::from_hundredths(800)),
            (3, Rate::from_hundredths(600)),
            (4, Rate::from_hundredths(400)),
        ]);
        let ancestor_bonus_rates = BTreeMap::from([
            (1, Rate::from_hundredths(200)),
            (2, Rate::from_hundredths(150)),
            (3, Rate::from_hundredths(100)),
            (4, Rate::ZERO),
        ]);
        let campaign_tiers = BTreeMap::from([
            (1, CampaignTier { threshold: 5_000_000, rate: Rate::from_hundredths(500) }),
            (2, CampaignTier { threshold: 3_000_000, rate: Rate::from_hundredths(400) }),
            (3, CampaignTier { threshold: 2_000_000, rate: Rate::from_hundredths(300) }),
            (4, CampaignTier { threshold: 1_000_000, rate: Rate::from_hundredths(200) }),
        ]);
        Self {
            commission_rates,
            fallback_commission_rate:   Rate::from_hundredths(400),
            ancestor_bonus_rates,
            non_invoice_deduction_rate: Rate::from_hundredths(200),
            withholding_tax_rate:       Rate::from_hundredths(1021),
            minimum_payment_amount:     10_000,
            campaign_tiers,
            campaign_fallback: CampaignTier { threshold: 1_000_000, rate: Rate::from_hundredths(200) },
        }
    }
}

impl PayoutConfig {
    /// Load a config file. Rates outside 0..=100 and non-positive campaign
    /// thresholds are rejected.
    pub fn load(path: &str) -> PayoutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PayoutError::Config {
            path:   path.to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(path, &content)
    }

    pub fn from_json(path: &str, content: &str) -> PayoutResult<Self> {
        let config: PayoutConfig =
            serde_json::from_str(content).map_err(|e| PayoutError::Config {
                path:   path.to_string(),
                reason: e.to_string(),
            })?;
        config.validate(path)?;
        log::debug!(
            "config: loaded {path} ({} commission tiers, {} campaign tiers)",
            config.commission_rates.len(),
            config.campaign_tiers.len()
        );
        Ok(config)
    }

    fn validate(&self, path: &str) -> PayoutResult<()> {
        let bad = |reason: String| PayoutError::Config { path: path.to_string(), reason };

        if self.minimum_payment_amount < 0 {
            return Err(bad(format!(
                "minimum_payment_amount must not be negative, got {}",
                self.minimum_payment_amount
            )));
        }
        for (tier, campaign) in self
            .campaign_tiers
            .iter()
            .map(|(t, c)| (Some(*t), c))
            .chain(std::iter::once((None, &self.campaign_fallback)))
        {
            if campaign.threshold <= 0 {
                let which = tier.map_or_else(|| "fallback".to_string(), |t| format!("tier {t}"));
                return Err(bad(format!("campaign threshold for {which} must be positive")));
            }
        }
        Ok(())
    }

    /// Base commission rate for a seller tier; unknown tiers get the fallback.
    pub fn default_commission_rate(&self, tier: TierLevel) -> Rate {
        self.commission_rates
            .get(&tier)
            .copied()
            .unwrap_or(self.fallback_commission_rate)
    }

    /// Ancestor bonus rate for an ancestor tier; unknown tiers earn nothing.
    pub fn default_ancestor_bonus_rate(&self, tier: TierLevel) -> Rate {
        self.ancestor_bonus_rates.get(&tier).copied().unwrap_or(Rate::ZERO)
    }

    pub fn campaign_tier(&self, tier: TierLevel) -> CampaignTier {
        self.campaign_tiers
            .get(&tier)
            .copied()
            .unwrap_or(self.campaign_fallback)
    }
}
