//! Journal - the structured record of everything a run did
//!
//! Accounts and transfers append a [`JournalEntry`] for every state change. The
//! journal is handed back with the results so reporting tools can replay or
//! audit a run without re-reading ledgers. Each entry is mirrored as a `tracing`
//! debug event.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A state change with the date and the account or transfer it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: Date,
    /// Account name, or transfer name for transfer firings
    pub source: String,
    pub event: StateEvent,
}

/// Every kind of state change the engine produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StateEvent {
    /// Balance compounded at the periodic rate
    Compounded {
        previous: f64,
        new_value: f64,
        rate: f64,
        days: i32,
    },

    /// Loan interest charged for the period (negative, like the principal)
    InterestDue {
        principal: f64,
        interest_due: f64,
        rate: f64,
    },

    Deposit {
        amount: f64,
        counterparty: String,
        previous: f64,
        new_value: f64,
    },

    Withdrawal {
        amount: f64,
        counterparty: String,
        previous: f64,
        new_value: f64,
    },

    /// Payment into a loan; `interest_paid` is the share covering outstanding interest
    LoanPayment {
        amount: f64,
        counterparty: String,
        interest_paid: f64,
        previous_principal: f64,
        new_principal: f64,
    },

    /// Principal reached zero. `overpayment` is what was clamped away.
    LoanPaidOff { overpayment: f64 },

    TransferFired {
        from: String,
        to: String,
        amount: f64,
    },
}

impl StateEvent {
    pub fn is_compounding(&self) -> bool {
        matches!(
            self,
            StateEvent::Compounded { .. } | StateEvent::InterestDue { .. }
        )
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self, StateEvent::TransferFired { .. })
    }
}

/// Append-only event log for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    entries: Vec<JournalEntry>,
    /// When false, events are still traced but not stored
    collect: bool,
}

impl Default for Journal {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Journal {
    pub fn new(collect: bool) -> Self {
        Self {
            entries: Vec::new(),
            collect,
        }
    }

    pub fn record(&mut self, date: Date, source: &str, event: StateEvent) {
        tracing::debug!(%date, source, ?event, "state change");
        if self.collect {
            self.entries.push(JournalEntry {
                date,
                source: source.to_string(),
                event,
            });
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries recorded for one account or transfer
    pub fn for_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a JournalEntry> {
        self.entries.iter().filter(move |e| e.source == source)
    }
}
