//! Campaign bonus — a monthly volume incentive per agency tier.
//!
//! Reaching the tier's threshold pays the full rate on the month's total
//! sales; reaching half the threshold pays half the rate; below that,
//! nothing.

use crate::{
    config::PayoutConfig,
    rate::Rate,
    types::{TierLevel, Yen},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignTier {
    pub threshold: Yen,
    pub rate:      Rate,
}

impl CampaignTier {
    pub fn bonus_for(&self, monthly_total_sales: Yen) -> Yen {
        if monthly_total_sales >= self.threshold {
            self.rate.apply(monthly_total_sales)
        } else if monthly_total_sales >= self.threshold - self.threshold / 2 {
            self.rate.apply_ratio(monthly_total_sales, 1, 2)
        } else {
            0
        }
    }
}

pub fn campaign_bonus(monthly_total_sales: Yen, tier_level: TierLevel, config: &PayoutConfig) -> Yen {
    config.campaign_tier(tier_level).bonus_for(monthly_total_sales)
}
