//! Recurring payout engine for a multi-tier sales-agency network.
//!
//! For one month of confirmed sales the engine derives each agency's base
//! commission, the hierarchy bonuses paid to its ancestors, campaign
//! bonuses, invoice and withholding deductions, and whether the month is
//! paid out or carried forward. The engine is pure and synchronous; the
//! store, events and sample modules are the collaborators around it.

pub mod aggregator;
pub mod campaign;
pub mod commission;
pub mod config;
pub mod error;
pub mod event;
pub mod hierarchy;
pub mod ledger;
pub mod model;
pub mod month;
pub mod rate;
pub mod rng;
pub mod sample;
pub mod settings;
pub mod store;
pub mod summary;
pub mod types;

pub use aggregator::PayoutEngine;
pub use config::PayoutConfig;
pub use error::{PayoutError, PayoutResult};
pub use ledger::{CommissionRecord, RecordKind, RecordStatus};
pub use month::Month;
pub use rate::Rate;
