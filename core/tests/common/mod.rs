//! Builders shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use payout_core::{
    model::{Agency, CompanyType, Product, Sale, SaleStatus},
    settings::CommissionSettings,
    Month,
};

pub fn month() -> Month {
    "2024-05".parse().unwrap()
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

/// Corporate, invoice-registered agency — no deductions apply.
pub fn corporate(id: &str, tier: u8, parent: Option<&str>) -> Agency {
    Agency {
        id: id.into(),
        name: format!("{id} Corp"),
        tier_level: tier,
        parent_agency_id: parent.map(Into::into),
        company_type: CompanyType::Corporate,
        invoice_registered: true,
        withholding_tax_flag: None,
        active: true,
    }
}

/// Unregistered individual — both deductions apply.
pub fn individual(id: &str, tier: u8, parent: Option<&str>) -> Agency {
    Agency {
        company_type: CompanyType::Individual,
        invoice_registered: false,
        name: format!("{id} Sole"),
        ..corporate(id, tier, parent)
    }
}

pub fn sale(id: &str, agency_id: &str, amount: i64) -> Sale {
    Sale {
        id: id.into(),
        agency_id: agency_id.into(),
        product_id: "PR-STD".into(),
        total_amount: amount,
        sale_date: date(10),
        status: SaleStatus::Confirmed,
        commission_settings: None,
    }
}

pub fn sale_with_settings(id: &str, agency_id: &str, amount: i64, settings: CommissionSettings) -> Sale {
    Sale {
        commission_settings: Some(settings),
        ..sale(id, agency_id, amount)
    }
}

pub fn standard_product() -> Product {
    Product {
        id: "PR-STD".into(),
        name: "Standard Plan".into(),
        commission_rates: Default::default(),
        active: true,
    }
}
