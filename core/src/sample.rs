//! Deterministic synthetic agency networks and sales months.
//!
//! Used by the runner when no input snapshot is supplied, and by the
//! determinism tests. Same seed ⇒ identical agencies, products, sales.

use crate::{
    model::{Agency, CompanyType, Product, Sale, SaleStatus, TierRates},
    month::Month,
    rate::Rate,
    rng::{SeededRng, StreamSlot},
};
use chrono::Days;

const NAME_PREFIXES: &[&str] = &[
    "Sakura", "Fuji", "Aoba", "Minato", "Hikari", "Kaede", "Midori", "Asahi",
    "Tsubasa", "Nagomi", "Kizuna", "Hoshi",
];

const NAME_SUFFIXES: &[&str] = &[
    "Trading", "Partners", "Sales", "Agency", "Marketing", "Networks", "Link",
];

/// Build `agency_count` agencies. Roughly one in eight is a tier-1 root;
/// every other agency hangs under an existing agency one tier above it.
pub fn generate_network(seed: u64, agency_count: usize) -> Vec<Agency> {
    let mut rng = SeededRng::new(seed, StreamSlot::Network);
    let roots = (agency_count / 8).max(1).min(agency_count);
    let mut agencies: Vec<Agency> = Vec::with_capacity(agency_count);

    for n in 0..agency_count {
        let (tier_level, parent_agency_id) = if n < roots {
            (1, None)
        } else {
            let candidates: Vec<&Agency> = agencies.iter().filter(|a| a.tier_level < 4).collect();
            match rng.pick(&candidates) {
                Some(parent) => (parent.tier_level + 1, Some(parent.id.clone())),
                None => (1, None),
            }
        };

        let prefix = rng.pick(NAME_PREFIXES).copied().unwrap_or("Agency");
        let suffix = rng.pick(NAME_SUFFIXES).copied().unwrap_or("Sales");
        let company_type = if rng.chance(0.4) {
            CompanyType::Individual
        } else {
            CompanyType::Corporate
        };

        agencies.push(Agency {
            id: format!("AG-{:04}", n + 1),
            name: format!("{prefix} {suffix} {:04}", n + 1),
            tier_level,
            parent_agency_id,
            company_type,
            invoice_registered: rng.chance(0.7),
            withholding_tax_flag: (company_type == CompanyType::Corporate && rng.chance(0.05))
                .then_some(true),
            active: true,
        });
    }

    log::debug!("sample: generated {} agencies ({roots} roots) from seed {seed}", agencies.len());
    agencies
}

/// Build `product_count` products; about a third carry tier overrides.
pub fn generate_products(seed: u64, product_count: usize) -> Vec<Product> {
    let mut rng = SeededRng::new(seed, StreamSlot::Products);
    (0..product_count)
        .map(|n| {
            let commission_rates = if rng.chance(0.33) {
                TierRates {
                    tier1: Some(Rate::from_hundredths(rng.range_inclusive(1000, 1500))),
                    tier2: Some(Rate::from_hundredths(rng.range_inclusive(800, 1200))),
                    tier3: None,
                    tier4: Some(Rate::from_hundredths(rng.range_inclusive(400, 600))),
                }
            } else {
                TierRates::default()
            };
            Product {
                id: format!("PR-{:03}", n + 1),
                name: format!("Plan {:03}", n + 1),
                commission_rates,
                active: true,
            }
        })
        .collect()
}

/// Build `sale_count` confirmed sales dated inside `month`.
pub fn generate_sales(
    seed: u64,
    month: Month,
    agencies: &[Agency],
    products: &[Product],
    sale_count: usize,
) -> Vec<Sale> {
    let mut rng = SeededRng::new(seed, StreamSlot::Sales);
    let Some(first_day) = month.first_day() else {
        return Vec::new();
    };

    let mut sales = Vec::with_capacity(sale_count);
    for n in 0..sale_count {
        let (Some(agency), Some(product)) = (rng.pick(agencies), rng.pick(products)) else {
            break;
        };
        let offset = rng.next_u64_below(28);
        let sale_date = first_day
            .checked_add_days(Days::new(offset))
            .unwrap_or(first_day);
        sales.push(Sale {
            id: format!("S-{month}-{:05}", n + 1),
            agency_id: agency.id.clone(),
            product_id: product.id.clone(),
            total_amount: rng.range_inclusive(10, 2_000) * 1_000,
            sale_date,
            status: SaleStatus::Confirmed,
            commission_settings: None,
        });
    }
    sales
}
