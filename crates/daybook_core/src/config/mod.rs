//! Scenario configuration
//!
//! `SimulationConfig` is the serializable description of a run: accounts,
//! transfers and the horizon. Accounts and transfers refer to each other by name;
//! names are resolved when the config is turned into a
//! [`Simulation`](crate::simulation::Simulation).
//!
//! # Builder DSL
//!
//! ```ignore
//! use daybook_core::config::{AccountBuilder, SimulationBuilder, TransferBuilder};
//!
//! let config = SimulationBuilder::new()
//!     .start(2025, 1, 1)
//!     .years(30)
//!     .account(AccountBuilder::plain("Checking").balance(2_000.0))
//!     .account(AccountBuilder::savings("Savings").balance(10_000.0).apy(4.5))
//!     .account(AccountBuilder::loan("Car").balance(-18_000.0).annual_rate(6.9))
//!     .transfer(TransferBuilder::new("paycheck", "Checking").amount(3_000.0).on_day(1))
//!     .transfer(TransferBuilder::new("Checking", "Car").amount(450.0).on_day(15))
//!     .build();
//! ```
//!
//! The same scenario in YAML:
//!
//! ```yaml
//! start_date: 2025-01-01
//! duration_years: 30
//! accounts:
//!   - name: Checking
//!     balance: 2000
//!   - name: Savings
//!     type: savings
//!     balance: 10000
//!     apy: 4.5
//!   - name: Car
//!     type: loan
//!     balance: -18000
//!     interest_rate: 6.9
//! transfers:
//!   - { from: paycheck, to: Checking, amount: 3000, interval: 1 }
//!   - { from: Checking, to: Car, amount: 450, interval: 15 }
//! ```

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math::daily_grid;
use crate::date_rule::DateRule;
use crate::error::{RunError, ValidationError};
use crate::model::Account;

pub mod account_builder;
pub mod builder;
pub mod transfer_builder;

pub use account_builder::AccountBuilder;
pub use builder::SimulationBuilder;
pub use transfer_builder::TransferBuilder;

fn default_duration_years() -> usize {
    30
}

fn default_true() -> bool {
    true
}

/// Complete description of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// First grid date; today when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,

    /// Length of the daily grid in 365-day years
    #[serde(default = "default_duration_years")]
    pub duration_years: usize,

    /// Drop empty ledger rows once the run ends
    #[serde(default = "default_true")]
    pub cleanup: bool,

    /// Keep journal entries in the result (default: true)
    ///
    /// Disable for long parameter sweeps where only the ledgers matter.
    #[serde(default = "default_true")]
    pub collect_journal: bool,

    /// Allowed non-account transfer endpoints. When non-empty, a transfer that
    /// names neither an account nor one of these labels is rejected.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,

    #[serde(default)]
    pub accounts: Vec<AccountConfig>,

    /// Applied in this order on every date
    #[serde(default)]
    pub transfers: Vec<TransferConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: None,
            duration_years: default_duration_years(),
            cleanup: true,
            collect_journal: true,
            external: Vec::new(),
            accounts: Vec::new(),
            transfers: Vec::new(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start date, falling back to today
    pub fn start(&self) -> Date {
        self.start_date
            .unwrap_or_else(|| jiff::Zoned::now().date())
    }

    /// One date per day over the configured horizon
    pub fn date_grid(&self) -> Result<Vec<Date>, RunError> {
        daily_grid(self.start(), self.duration_years)
    }

    pub fn account(&self, name: &str) -> Option<&AccountConfig> {
        self.accounts.iter().find(|a| a.name == name)
    }

    /// Variant where the named transfer moves a different amount.
    /// `None` if no transfer has that name.
    #[must_use]
    pub fn with_transfer_amount(&self, name: &str, amount: f64) -> Option<Self> {
        let mut config = self.clone();
        let transfer = config
            .transfers
            .iter_mut()
            .find(|t| t.name.as_deref() == Some(name))?;
        transfer.amount = amount;
        Some(config)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Plain,
    Savings,
    Loan,
}

/// One account as written in a scenario
///
/// Plain accounts and loans take `interest_rate` (periodic for plain accounts,
/// annual for loans); savings accounts take `apy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: AccountType,

    pub balance: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apy: Option<f64>,

    #[serde(default)]
    pub compounding: DateRule,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AccountConfig {
    pub fn build(&self) -> Result<Account, ValidationError> {
        let unexpected = |field| ValidationError::UnexpectedField {
            account: self.name.clone(),
            field,
        };
        let name = self.name.as_str();
        match self.kind {
            AccountType::Plain | AccountType::Loan if self.apy.is_some() => Err(unexpected("apy")),
            AccountType::Savings if self.interest_rate.is_some() => {
                Err(unexpected("interest_rate"))
            }
            AccountType::Plain => Account::new(
                name,
                self.balance,
                self.interest_rate.unwrap_or_default(),
                self.compounding,
            ),
            AccountType::Savings => Account::savings(
                name,
                self.balance,
                self.apy.unwrap_or_default(),
                self.compounding,
            ),
            AccountType::Loan => Account::loan(
                name,
                self.balance,
                self.interest_rate.unwrap_or_default(),
                self.compounding,
            ),
        }
    }
}

/// One recurring transfer as written in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account name or external label
    pub from: String,
    /// Account name or external label
    pub to: String,
    pub amount: f64,
    #[serde(default)]
    pub interval: DateRule,
}
