//! Hierarchy chain resolution — who sits above a selling agency.
//!
//! The parent links come from caller data and are not guaranteed to be a
//! tree: cycles and dangling parents occur. The walk is iterative over the
//! id index and bounded by `MAX_CHAIN_HOPS`; hitting either condition ends
//! the chain quietly.

use crate::model::{Agency, AgencyIndex};

pub const MAX_CHAIN_HOPS: usize = 10;

/// Ancestors of `agency_id`, nearest first.
pub fn ancestor_chain<'a>(agency_id: &str, index: &AgencyIndex<'a>) -> Vec<&'a Agency> {
    let mut chain = Vec::new();
    let Some(start) = index.get(agency_id) else {
        return chain;
    };

    let mut parent_id = start.parent_agency_id.as_deref();
    while let Some(id) = parent_id {
        if chain.len() == MAX_CHAIN_HOPS {
            log::debug!("hierarchy: chain for {agency_id} truncated at {MAX_CHAIN_HOPS} hops");
            break;
        }
        let Some(parent) = index.get(id) else {
            log::debug!("hierarchy: {agency_id} chain ends at unknown parent {id}");
            break;
        };
        chain.push(parent);
        parent_id = parent.parent_agency_id.as_deref();
    }
    chain
}
