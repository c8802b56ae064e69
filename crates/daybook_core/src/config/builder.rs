//! Simulation Builder
//!
//! Collects accounts, transfers and the horizon into a [`SimulationConfig`].
//! Names are only resolved when the config is turned into a [`Simulation`], so
//! transfers may be added before the accounts they reference.
//!
//! ```ignore
//! use daybook_core::config::{AccountBuilder, SimulationBuilder, TransferBuilder};
//!
//! let config = SimulationBuilder::new()
//!     .start(2025, 1, 1)
//!     .years(10)
//!     .account(AccountBuilder::plain("Checking").balance(1_000.0))
//!     .account(AccountBuilder::savings("Savings").apy(4.0))
//!     .transfer(TransferBuilder::new("paycheck", "Checking").amount(4_000.0).on_day(1))
//!     .transfer(TransferBuilder::new("Checking", "Savings").amount(500.0).on_day(2))
//!     .build();
//! ```

use jiff::civil::Date;

use super::account_builder::AccountBuilder;
use super::transfer_builder::TransferBuilder;
use super::SimulationConfig;
use crate::error::ConfigurationError;
use crate::simulation::Simulation;

/// Fluent builder for [`SimulationConfig`]
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    config: SimulationConfig,
}

impl SimulationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Basic Configuration
    // =========================================================================

    #[must_use]
    pub fn start_date(mut self, date: Date) -> Self {
        self.config.start_date = Some(date);
        self
    }

    /// Set the start date (convenience method)
    #[must_use]
    pub fn start(self, year: i16, month: i8, day: i8) -> Self {
        self.start_date(jiff::civil::date(year, month, day))
    }

    #[must_use]
    pub fn duration_years(mut self, years: usize) -> Self {
        self.config.duration_years = years;
        self
    }

    /// Alias for duration_years
    #[must_use]
    pub fn years(self, years: usize) -> Self {
        self.duration_years(years)
    }

    /// Keep empty ledger rows after the run
    #[must_use]
    pub fn cleanup(mut self, cleanup: bool) -> Self {
        self.config.cleanup = cleanup;
        self
    }

    #[must_use]
    pub fn collect_journal(mut self, collect: bool) -> Self {
        self.config.collect_journal = collect;
        self
    }

    // =========================================================================
    // Entities
    // =========================================================================

    #[must_use]
    pub fn account(mut self, account: AccountBuilder) -> Self {
        self.config.accounts.push(account.build());
        self
    }

    #[must_use]
    pub fn transfer(mut self, transfer: TransferBuilder) -> Self {
        self.config.transfers.push(transfer.build());
        self
    }

    /// Declare an external endpoint label. Once any label is declared, transfers
    /// to or from unknown names are rejected.
    #[must_use]
    pub fn external(mut self, label: impl Into<String>) -> Self {
        self.config.external.push(label.into());
        self
    }

    // =========================================================================
    // Finish
    // =========================================================================

    #[must_use]
    pub fn build(self) -> SimulationConfig {
        self.config
    }

    /// Build the config and resolve it into a runnable [`Simulation`]
    pub fn build_simulation(self) -> Result<(SimulationConfig, Simulation), ConfigurationError> {
        let simulation = Simulation::from_config(&self.config)?;
        Ok((self.config, simulation))
    }
}
