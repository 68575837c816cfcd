//! Carry-forward policy tests: the decision is agency-month-wide.

mod common;

use common::{corporate, month, sale, standard_product};
use payout_core::{
    settings::CommissionSettings, CommissionRecord, PayoutEngine, RecordKind, RecordStatus,
};

fn statuses_for<'a>(records: &'a [CommissionRecord], id: &str) -> Vec<&'a CommissionRecord> {
    records.iter().filter(|r| r.agency_id == id).collect()
}

/// Every record of a below-minimum agency is carried forward with the same reason,
/// direct and bonus records alike.
#[test]
fn all_records_of_agency_carried_with_identical_reason() {
    let agencies = vec![
        corporate("P", 2, None),
        corporate("C1", 3, Some("P")),
        corporate("C2", 4, Some("P")),
    ];
    // P: own 50,000 × 8% = 4,000; bonuses 1.5% of 100,000 and 200,000 = 1,500 + 3,000.
    let sales = vec![
        sale("s1", "C1", 100_000),
        sale("s2", "P", 50_000),
        sale("s3", "C2", 200_000),
    ];
    let records = PayoutEngine::default()
        .calculate_month(&sales, &agencies, &[standard_product()], month(), None);

    let parent = statuses_for(&records, "P");
    assert_eq!(parent.len(), 3);
    assert!(parent.iter().any(|r| r.kind == RecordKind::Direct));
    assert!(parent.iter().any(|r| r.kind == RecordKind::TierBonus));
    let reason = parent[0].carry_forward_reason.clone().unwrap();
    for r in &parent {
        assert_eq!(r.status, RecordStatus::CarriedForward);
        assert_eq!(r.carry_forward_reason.as_deref(), Some(reason.as_str()));
    }
    assert!(reason.contains("8,500"), "reason should cite the monthly total: {reason}");
}

/// Agencies at or above the minimum stay confirmed with no reason.
#[test]
fn agency_at_minimum_is_confirmed() {
    let agencies = vec![corporate("T1", 1, None)];
    // 100,000 × 10% = exactly 10,000
    let records = PayoutEngine::default()
        .calculate_month(&[sale("s1", "T1", 100_000)], &agencies, &[standard_product()], month(), None);
    assert_eq!(records[0].final_amount, 10_000);
    assert_eq!(records[0].status, RecordStatus::Confirmed);
    assert_eq!(records[0].carry_forward_reason, None);
}

/// Small sales that add up over the month are paid together.
#[test]
fn decision_uses_monthly_total_not_single_record() {
    let agencies = vec![corporate("T1", 1, None)];
    let sales = vec![sale("s1", "T1", 60_000), sale("s2", "T1", 40_000)];
    let records = PayoutEngine::default()
        .calculate_month(&sales, &agencies, &[standard_product()], month(), None);
    assert!(records.iter().all(|r| r.status == RecordStatus::Confirmed));
}

/// One agency's shortfall does not affect another's records.
#[test]
fn decision_is_per_agency() {
    let agencies = vec![corporate("BIG", 1, None), corporate("SMALL", 4, None)];
    let sales = vec![sale("s1", "BIG", 500_000), sale("s2", "SMALL", 20_000)];
    let records = PayoutEngine::default()
        .calculate_month(&sales, &agencies, &[standard_product()], month(), None);

    assert_eq!(statuses_for(&records, "BIG")[0].status, RecordStatus::Confirmed);
    assert_eq!(statuses_for(&records, "SMALL")[0].status, RecordStatus::CarriedForward);
}

/// The campaign bonus counts toward the minimum.
#[test]
fn campaign_bonus_counts_toward_minimum() {
    let agencies = vec![corporate("T4", 4, None)];
    // 240,000 × 4% = 9,600 — short of 10,000 on commission alone.
    // Tier 4 half threshold is 500,000, so no campaign bonus here.
    let short = PayoutEngine::default()
        .calculate_month(&[sale("s1", "T4", 240_000)], &agencies, &[standard_product()], month(), None);
    assert_eq!(short[0].status, RecordStatus::CarriedForward);

    // 500,000 × 4% = 20,000 plus half bonus 5,000.
    let paid = PayoutEngine::default()
        .calculate_month(&[sale("s1", "T4", 500_000)], &agencies, &[standard_product()], month(), None);
    assert_eq!(paid[0].final_amount, 25_000);
    assert_eq!(paid[0].status, RecordStatus::Confirmed);
}

/// The batch settings' minimum replaces the default threshold.
#[test]
fn batch_minimum_overrides_default() {
    let agencies = vec![corporate("T4", 4, None)];
    let settings = CommissionSettings {
        minimum_payment_amount: Some(500),
        ..Default::default()
    };
    let records = PayoutEngine::default().calculate_month(
        &[sale("s1", "T4", 20_000)], &agencies, &[standard_product()], month(), Some(&settings),
    );
    assert_eq!(records[0].final_amount, 800);
    assert_eq!(records[0].status, RecordStatus::Confirmed);
}
