//! Scenario tests for the daybook engine
//!
//! Tests are organized by topic:
//! - `accounts` - compounding of plain and savings accounts
//! - `loans` - interest accrual, payment split and payoff
//! - `transfers` - scheduling and same-date ordering
//! - `simulation` - the clock, determinism and results
//! - `builder_dsl` - fluent builders
//! - `config` - scenario files in JSON

mod builder_dsl;
mod loans;
mod simulation;

use jiff::civil::Date;

use crate::model::{JournalEntry, StateEvent};

/// Dates of the compounding (or interest) entries recorded for `account`
pub(crate) fn compounding_dates(journal: &[JournalEntry], account: &str) -> Vec<Date> {
    journal
        .iter()
        .filter(|e| e.source == account && e.event.is_compounding())
        .map(|e| e.date)
        .collect()
}

pub(crate) fn interest_due_count(journal: &[JournalEntry], account: &str) -> usize {
    journal
        .iter()
        .filter(|e| e.source == account && matches!(e.event, StateEvent::InterestDue { .. }))
        .count()
}

pub(crate) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
