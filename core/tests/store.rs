//! Store tests: replace-by-month, settings history, audit log.

mod common;

use common::{corporate, individual, month, sale, standard_product};
use payout_core::{
    event::PayoutEvent,
    rate::Rate,
    settings::CommissionSettings,
    store::PayoutStore,
    CommissionRecord, Month, PayoutEngine, PayoutError,
};

fn store() -> PayoutStore {
    let store = PayoutStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn ledger(amount: i64) -> Vec<CommissionRecord> {
    let agencies = vec![corporate("P", 1, None), individual("C", 3, Some("P")), corporate("T4", 4, None)];
    let sales = vec![sale("s1", "C", amount), sale("s2", "T4", 20_000)];
    PayoutEngine::default().calculate_month(&sales, &agencies, &[standard_product()], month(), None)
}

/// Stored records read back identical and in calculation order.
#[test]
fn records_round_trip_through_store() {
    let store = store();
    let records = ledger(250_000);

    let outcome = store.replace_month(month(), &records).unwrap();
    assert_eq!(outcome.deleted, 0);
    assert_eq!(outcome.inserted, records.len());

    let loaded = store.records_for_month(month()).unwrap();
    assert_eq!(loaded, records);
}

/// A recalculation replaces the previous month's set entirely.
#[test]
fn replace_month_overwrites_previous_set() {
    let store = store();
    let first = ledger(250_000);
    store.replace_month(month(), &first).unwrap();

    let second = ledger(900_000);
    let outcome = store.replace_month(month(), &second).unwrap();
    assert_eq!(outcome.deleted, first.len());

    let loaded = store.records_for_month(month()).unwrap();
    assert_eq!(loaded, second);
}

/// Other months are not touched by a replacement.
#[test]
fn replace_month_leaves_other_months() {
    let store = store();
    let may = ledger(250_000);
    store.replace_month(month(), &may).unwrap();

    let june: Month = "2024-06".parse().unwrap();
    let june_records: Vec<CommissionRecord> = ledger(300_000)
        .into_iter()
        .map(|mut r| {
            r.month = june;
            r
        })
        .collect();
    store.replace_month(june, &june_records).unwrap();

    assert_eq!(store.records_for_month(month()).unwrap(), may);
    assert_eq!(store.stored_months().unwrap(), vec![month(), june]);
}

/// A failed insert rolls back, leaving the prior ledger intact.
#[test]
fn failed_replace_keeps_prior_ledger() {
    let store = store();
    let original = ledger(250_000);
    store.replace_month(month(), &original).unwrap();

    let mut broken = ledger(900_000);
    broken[1].month = "2023-01".parse().unwrap();
    assert!(store.replace_month(month(), &broken).is_err());

    assert_eq!(store.records_for_month(month()).unwrap(), original);
}

/// Requiring a month with no ledger is an error.
#[test]
fn require_month_reports_missing_month() {
    let store = store();
    let err = store.require_month(month()).unwrap_err();
    assert!(matches!(err, PayoutError::MonthNotFound { .. }));
}

/// The latest settings snapshot per month is returned.
#[test]
fn settings_snapshots_are_versioned() {
    let store = store();
    assert_eq!(store.latest_settings_snapshot().unwrap(), None);

    let old = CommissionSettings {
        withholding_tax_rate: Some(Rate::from_hundredths(1021)),
        ..Default::default()
    };
    let new = CommissionSettings {
        withholding_tax_rate: Some(Rate::from_hundredths(2042)),
        minimum_payment_amount: Some(5_000),
        ..Default::default()
    };
    store.save_settings_snapshot("run-1", month(), &old).unwrap();
    store.save_settings_snapshot("run-2", month(), &new).unwrap();

    assert_eq!(store.settings_for_month(month()).unwrap(), Some(new.clone()));
    assert_eq!(store.latest_settings_snapshot().unwrap(), Some(new));
    assert_eq!(store.settings_for_month("2024-01".parse().unwrap()).unwrap(), None);
}

/// Events append in order with their stable type names.
#[test]
fn audit_events_are_logged_in_order() {
    let store = store();
    let events = vec![
        PayoutEvent::CalculationStarted { month: month(), sale_count: 2, agency_count: 3, product_count: 1 },
        PayoutEvent::MonthReplaced { month: month(), deleted: 0, inserted: 3 },
    ];
    for e in &events {
        store.append_event("run-1", e).unwrap();
    }
    store.append_event("run-2", &events[0]).unwrap();

    let logged = store.events_for_run("run-1").unwrap();
    let types: Vec<&str> = logged.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(types, vec!["calculation_started", "month_replaced"]);
    assert_eq!(logged[0].month, "2024-05");

    let decoded: PayoutEvent = serde_json::from_str(&logged[1].payload).unwrap();
    assert_eq!(decoded, events[1]);
}

/// Recalculating an older month replays that month's settings, not the
/// newest snapshot; months never calculated fall back to the newest.
#[test]
fn batch_settings_replay_the_target_month() {
    let store = store();
    let march: Month = "2024-03".parse().unwrap();
    let april: Month = "2024-04".parse().unwrap();
    assert_eq!(store.batch_settings_for(march).unwrap(), None);

    let march_settings = CommissionSettings {
        withholding_tax_rate: Some(Rate::from_hundredths(1021)),
        ..Default::default()
    };
    let may_settings = CommissionSettings {
        withholding_tax_rate: Some(Rate::from_hundredths(2042)),
        ..Default::default()
    };
    store.save_settings_snapshot("run-1", march, &march_settings).unwrap();
    store.save_settings_snapshot("run-2", month(), &may_settings).unwrap();

    assert_eq!(store.batch_settings_for(march).unwrap(), Some(march_settings));
    assert_eq!(store.batch_settings_for(month()).unwrap(), Some(may_settings.clone()));
    assert_eq!(store.batch_settings_for(april).unwrap(), Some(may_settings));
}

/// A rolled-back replacement is recorded in the audit log.
#[test]
fn failed_replace_is_audited() {
    let store = store();
    let mut broken = ledger(900_000);
    broken[1].month = "2023-01".parse().unwrap();
    let err = store.replace_month(month(), &broken).unwrap_err();

    let event = PayoutEvent::ReplaceFailed { month: month(), reason: err.to_string() };
    store.append_event("run-3", &event).unwrap();

    let logged = store.events_for_run("run-3").unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].event_type, "replace_failed");
    assert_eq!(logged[0].month, "2024-05");
    let decoded: PayoutEvent = serde_json::from_str(&logged[0].payload).unwrap();
    assert_eq!(decoded, event);
}
