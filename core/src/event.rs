//! Audit events recorded by the callers around a calculation run.
//!
//! The engine itself emits nothing; the runner appends these to the
//! store's event log so every ledger replacement can be traced.

use crate::{month::Month, types::Yen};
use serde::{Deserialize, Serialize};

/// Variants are append-only — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayoutEvent {
    CalculationStarted {
        month:         Month,
        sale_count:    usize,
        agency_count:  usize,
        product_count: usize,
    },
    CalculationCompleted {
        month:                 Month,
        record_count:          usize,
        total_payable:         Yen,
        total_carried_forward: Yen,
    },
    MonthReplaced {
        month:    Month,
        deleted:  usize,
        inserted: usize,
    },
    NoticesIssued {
        month:        Month,
        agency_count: usize,
        total_amount: Yen,
    },
    /// The month's replacement was rolled back; the prior ledger stands.
    ReplaceFailed {
        month:  Month,
        reason: String,
    },
}

impl PayoutEvent {
    pub fn month(&self) -> Month {
        match self {
            Self::CalculationStarted { month, .. }
            | Self::CalculationCompleted { month, .. }
            | Self::MonthReplaced { month, .. }
            | Self::NoticesIssued { month, .. }
            | Self::ReplaceFailed { month, .. } => *month,
        }
    }

    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CalculationStarted { .. }   => "calculation_started",
            Self::CalculationCompleted { .. } => "calculation_completed",
            Self::MonthReplaced { .. }        => "month_replaced",
            Self::NoticesIssued { .. }        => "notices_issued",
            Self::ReplaceFailed { .. }        => "replace_failed",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     String,
    pub month:      String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized PayoutEvent
}
