//! Simulation results
//!
//! What a finished run hands to reporting tools: one trimmed ledger per account
//! plus the journal of state changes.

use jiff::civil::Date;
use serde::Serialize;

use super::accounts::{Account, AccountFlavor, AccountLedger};
use super::journal::{JournalEntry, StateEvent};

/// Final state of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountReport {
    pub name: String,
    pub flavor: AccountFlavor,
    /// Configured periodic rate in percent
    pub periodic_rate: f64,
    pub paid_off: Option<Date>,
    pub ledger: AccountLedger,
}

impl AccountReport {
    /// `None` for accounts that were never initialised
    pub fn from_account(account: &Account) -> Option<Self> {
        Some(Self {
            name: account.name().to_string(),
            flavor: account.flavor(),
            periodic_rate: account.periodic_rate(),
            paid_off: account.paid_off(),
            ledger: account.ledger()?.clone(),
        })
    }

    /// Last recorded balance (principal for loans)
    pub fn final_value(&self) -> Option<f64> {
        self.ledger.values().last().map(|(_, v)| *v)
    }
}

/// Complete results from a single simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub start_date: Date,
    pub end_date: Date,
    pub accounts: Vec<AccountReport>,
    /// Every state change in the order it happened
    pub journal: Vec<JournalEntry>,
}

impl SimulationResult {
    pub fn account(&self, name: &str) -> Option<&AccountReport> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn final_value(&self, name: &str) -> Option<f64> {
        self.account(name).and_then(AccountReport::final_value)
    }

    /// Sum of final balances; loans count negatively
    pub fn net_worth(&self) -> f64 {
        self.accounts.iter().filter_map(AccountReport::final_value).sum()
    }

    pub fn compounding_entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.journal.iter().filter(|e| e.event.is_compounding())
    }

    pub fn transfer_entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.journal.iter().filter(|e| e.event.is_transfer())
    }

    /// Date a loan was paid off, from the journal
    pub fn payoff_date(&self, name: &str) -> Option<Date> {
        self.journal.iter().find_map(|e| match e.event {
            StateEvent::LoanPaidOff { .. } if e.source == name => Some(e.date),
            _ => None,
        })
    }
}
