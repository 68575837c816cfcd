//! Chain resolver tests: ordering, dangling parents, cyclic data.

mod common;

use common::corporate;
use payout_core::{
    hierarchy::{ancestor_chain, MAX_CHAIN_HOPS},
    model::AgencyIndex,
};

fn ids(chain: &[&payout_core::model::Agency]) -> Vec<String> {
    chain.iter().map(|a| a.id.clone()).collect()
}

/// Ancestors come back nearest first.
#[test]
fn chain_is_nearest_first() {
    let agencies = vec![
        corporate("T1", 1, None),
        corporate("T2", 2, Some("T1")),
        corporate("T3", 3, Some("T2")),
        corporate("T4", 4, Some("T3")),
    ];
    let index = AgencyIndex::new(&agencies);

    assert_eq!(ids(&ancestor_chain("T4", &index)), vec!["T3", "T2", "T1"]);
    assert_eq!(ids(&ancestor_chain("T2", &index)), vec!["T1"]);
    assert!(ancestor_chain("T1", &index).is_empty());
}

/// A parent id that is not in the index ends the chain without error.
#[test]
fn dangling_parent_ends_chain() {
    let agencies = vec![
        corporate("T2", 2, Some("GONE")),
        corporate("T3", 3, Some("T2")),
    ];
    let index = AgencyIndex::new(&agencies);

    assert_eq!(ids(&ancestor_chain("T3", &index)), vec!["T2"]);
}

/// An unknown starting agency has no chain.
#[test]
fn unknown_agency_has_empty_chain() {
    let agencies = vec![corporate("T1", 1, None)];
    let index = AgencyIndex::new(&agencies);
    assert!(ancestor_chain("NOPE", &index).is_empty());
}

/// Cyclic parent links stop at the hop cap instead of looping forever.
#[test]
fn cycle_is_capped_at_max_hops() {
    let agencies = vec![
        corporate("A", 2, Some("B")),
        corporate("B", 1, Some("A")),
    ];
    let index = AgencyIndex::new(&agencies);

    let chain = ancestor_chain("A", &index);
    assert_eq!(chain.len(), MAX_CHAIN_HOPS);
    assert_eq!(chain[0].id, "B");
    assert_eq!(chain[1].id, "A");
}

/// A self-referencing agency is its own parent up to the cap.
#[test]
fn self_reference_is_capped() {
    let agencies = vec![corporate("SELF", 3, Some("SELF"))];
    let index = AgencyIndex::new(&agencies);
    assert_eq!(ancestor_chain("SELF", &index).len(), MAX_CHAIN_HOPS);
}

/// Deep but well-formed chains longer than the cap are truncated too.
#[test]
fn long_chain_is_truncated() {
    let mut agencies = vec![corporate("N0", 1, None)];
    for n in 1..15 {
        agencies.push(corporate(&format!("N{n}"), 4, Some(&format!("N{}", n - 1))));
    }
    let index = AgencyIndex::new(&agencies);

    let chain = ancestor_chain("N14", &index);
    assert_eq!(chain.len(), MAX_CHAIN_HOPS);
    assert_eq!(chain[0].id, "N13");
    assert_eq!(chain[9].id, "N4");
}
