//! Input entities: agencies, products and confirmed sales.
//!
//! These are caller-supplied, fully materialized snapshots. The engine
//! reads them and never mutates them.

use crate::{
    rate::Rate,
    settings::CommissionSettings,
    types::{AgencyId, ProductId, SaleId, TierLevel, Yen},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyType {
    Individual,
    Corporate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id:                 AgencyId,
    #[serde(default)]
    pub name:               String,
    pub tier_level:         TierLevel,
    #[serde(default)]
    pub parent_agency_id:   Option<AgencyId>,
    pub company_type:       CompanyType,
    #[serde(default)]
    pub invoice_registered: bool,
    #[serde(default)]
    pub withholding_tax_flag: Option<bool>,
    #[serde(default = "default_true")]
    pub active:             bool,
}

impl Agency {
    /// Withholding applies to individuals and to anyone explicitly flagged.
    pub fn subject_to_withholding(&self) -> bool {
        self.company_type == CompanyType::Individual
            || self.withholding_tax_flag.unwrap_or(false)
    }
}

/// Per-tier commission overrides. `None` means "use the default table".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierRates {
    #[serde(default)]
    pub tier1: Option<Rate>,
    #[serde(default)]
    pub tier2: Option<Rate>,
    #[serde(default)]
    pub tier3: Option<Rate>,
    #[serde(default)]
    pub tier4: Option<Rate>,
}

impl TierRates {
    pub fn for_tier(&self, tier: TierLevel) -> Option<Rate> {
        match tier {
            1 => self.tier1,
            2 => self.tier2,
            3 => self.tier3,
            4 => self.tier4,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id:   ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub commission_rates: TierRates,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id:           SaleId,
    pub agency_id:    AgencyId,
    pub product_id:   ProductId,
    pub total_amount: Yen,
    pub sale_date:    NaiveDate,
    #[serde(default = "default_confirmed")]
    pub status:       SaleStatus,
    /// Settings frozen when the sale was registered. Replays of past
    /// months use these, never the configuration in force today.
    #[serde(default)]
    pub commission_settings: Option<CommissionSettings>,
}

fn default_true() -> bool { true }
fn default_confirmed() -> SaleStatus { SaleStatus::Confirmed }

/// Id-keyed agency lookup built once per run.
pub struct AgencyIndex<'a> {
    by_id: HashMap<&'a str, &'a Agency>,
}

impl<'a> AgencyIndex<'a> {
    pub fn new(agencies: &'a [Agency]) -> Self {
        Self {
            by_id: agencies.iter().map(|a| (a.id.as_str(), a)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Agency> {
        self.by_id.get(id).copied()
    }
}

/// Id-keyed product lookup built once per run.
pub struct ProductIndex<'a> {
    by_id: HashMap<&'a str, &'a Product>,
}

impl<'a> ProductIndex<'a> {
    pub fn new(products: &'a [Product]) -> Self {
        Self {
            by_id: products.iter().map(|p| (p.id.as_str(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Product> {
        self.by_id.get(id).copied()
    }
}
