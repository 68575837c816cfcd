//! payout-runner: headless monthly payout calculation.
//!
//! Usage:
//!   payout-runner --month 2024-05 --input snapshot.json --db payouts.db
//!   payout-runner --previous-month --seed 12345 --agencies 80 --sales 600
//!
//! Plays the role of both callers of the engine: the administrator-triggered
//! recalculation of a given month, and the monthly job that settles the
//! previous month and issues payout notices.

use anyhow::{Context, Result};
use payout_core::{
    event::PayoutEvent,
    ledger::format_yen,
    model::{Agency, Product, Sale, SaleStatus},
    sample,
    settings::{CommissionSettings, ResolvedSettings},
    store::PayoutStore,
    summary::{payout_notices, summarize, LedgerSummary, PayoutNotice},
    Month, PayoutConfig, PayoutEngine,
};
use serde::Deserialize;
use std::env;

/// Input snapshot: everything the engine needs for one run.
#[derive(Deserialize)]
struct InputSnapshot {
    agencies: Vec<Agency>,
    #[serde(default)]
    products: Vec<Product>,
    sales:    Vec<Sale>,
    #[serde(default)]
    settings: Option<CommissionSettings>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let agency_count = parse_arg(&args, "--agencies", 80usize);
    let sale_count = parse_arg(&args, "--sales", 600usize);
    let previous = args.iter().any(|a| a == "--previous-month");
    let print_json = args.iter().any(|a| a == "--json");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");

    let config = match string_arg(&args, "--config") {
        Some(path) => PayoutConfig::load(path)?,
        None => PayoutConfig::default(),
    };

    let mut month = match string_arg(&args, "--month") {
        Some(m) => m.parse::<Month>()?,
        None => Month::of(chrono::Local::now().date_naive()),
    };
    if previous {
        month = month.previous();
    }

    let snapshot = match string_arg(&args, "--input") {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {path}"))?;
            serde_json::from_str::<InputSnapshot>(&content)
                .with_context(|| format!("Cannot parse {path}"))?
        }
        None => {
            let agencies = sample::generate_network(seed, agency_count);
            let products = sample::generate_products(seed, 5);
            let sales = sample::generate_sales(seed, month, &agencies, &products, sale_count);
            InputSnapshot { agencies, products, sales, settings: None }
        }
    };

    let store = PayoutStore::open(db)?;
    store.migrate()?;

    // Batch settings: explicit file, then the snapshot's own, then the
    // calculation-time settings recorded for this month.
    let settings = match string_arg(&args, "--settings") {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read {path}"))?;
            Some(serde_json::from_str::<CommissionSettings>(&content)?)
        }
        None => match snapshot.settings.clone() {
            Some(s) => Some(s),
            None => store.batch_settings_for(month)?,
        },
    };

    let sales: Vec<Sale> = snapshot
        .sales
        .into_iter()
        .filter(|s| s.status == SaleStatus::Confirmed && month.contains(s.sale_date))
        .collect();
    let agencies: Vec<Agency> = snapshot.agencies.into_iter().filter(|a| a.active).collect();
    let products: Vec<Product> = snapshot.products.into_iter().filter(|p| p.active).collect();

    let run_id = format!("run-{month}-{}", uuid::Uuid::new_v4());
    println!("payout-runner");
    println!("  run_id:    {run_id}");
    println!("  month:     {month}");
    println!("  db:        {db}");
    println!("  sales:     {}", sales.len());
    println!("  agencies:  {}", agencies.len());
    println!("  products:  {}", products.len());
    println!();

    store.append_event(&run_id, &PayoutEvent::CalculationStarted {
        month,
        sale_count:    sales.len(),
        agency_count:  agencies.len(),
        product_count: products.len(),
    })?;

    let engine = PayoutEngine::new(config);
    let records = engine.calculate_month(&sales, &agencies, &products, month, settings.as_ref());

    let outcome = match store.replace_month(month, &records) {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("{run_id}: ledger replacement for {month} rolled back: {e}");
            store.append_event(&run_id, &PayoutEvent::ReplaceFailed {
                month,
                reason: e.to_string(),
            })?;
            return Err(e.into());
        }
    };
    log::info!("{run_id}: {} records written for {month}", outcome.inserted);
    store.append_event(&run_id, &PayoutEvent::MonthReplaced {
        month,
        deleted:  outcome.deleted,
        inserted: outcome.inserted,
    })?;
    if let Some(s) = &settings {
        store.save_settings_snapshot(&run_id, month, s)?;
    }

    let summary = summarize(&records);
    store.append_event(&run_id, &PayoutEvent::CalculationCompleted {
        month,
        record_count:          summary.record_count,
        total_payable:         summary.total_payable,
        total_carried_forward: summary.total_carried_forward,
    })?;

    let minimum = ResolvedSettings::resolve(settings.as_ref(), engine.config()).minimum_payment_amount;
    let notices = payout_notices(&records, minimum);
    store.append_event(&run_id, &PayoutEvent::NoticesIssued {
        month,
        agency_count: notices.len(),
        total_amount: notices.iter().map(|n| n.total_amount).sum(),
    })?;

    if print_json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    print_summary(&summary);
    print_notices(&notices);
    Ok(())
}

fn print_summary(summary: &LedgerSummary) {
    println!("=== LEDGER SUMMARY ===");
    println!("  records:            {}", summary.record_count);
    println!("  agencies:           {}", summary.agency_count);
    println!("  base commission:    ¥{}", format_yen(summary.total_base_amount));
    println!("  tier bonuses:       ¥{}", format_yen(summary.total_tier_bonus));
    println!("  campaign bonuses:   ¥{}", format_yen(summary.total_campaign_bonus));
    println!("  invoice deductions: ¥{}", format_yen(summary.total_invoice_deduction));
    println!("  withholding tax:    ¥{}", format_yen(summary.total_withholding_tax));
    println!("  payable:            ¥{}", format_yen(summary.total_payable));
    println!("  carried forward:    ¥{}", format_yen(summary.total_carried_forward));
    println!();
    println!("=== BY TIER ===");
    for (tier, t) in &summary.by_tier {
        println!(
            "  tier {tier} | records: {:>5} | sales: ¥{:>14} | commission: ¥{:>12}",
            t.count,
            format_yen(t.total_sales),
            format_yen(t.total_commission)
        );
    }
}

fn print_notices(notices: &[PayoutNotice]) {
    println!();
    println!("=== PAYOUT NOTICES ({}) ===", notices.len());
    for n in notices {
        println!(
            "  {} {:<28} {:>3} lines  ¥{}",
            n.agency_id,
            n.agency_name,
            n.record_count,
            format_yen(n.total_amount)
        );
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
