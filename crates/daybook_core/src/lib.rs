//! Daily financial simulation library
//!
//! Projects a set of named accounts day by day over a date grid:
//! - Plain, savings (APY-quoted) and loan accounts, each compounding on its own
//!   recurrence rule
//! - Loans that stop accruing once paid off, with overpayments clamped
//! - Recurring transfers between accounts and external labels
//! - A per-account ledger plus a journal of every state change
//!
//! # Builder DSL
//!
//! ```ignore
//! use daybook_core::config::{AccountBuilder, SimulationBuilder, TransferBuilder};
//! use daybook_core::simulation::simulate;
//!
//! let config = SimulationBuilder::new()
//!     .start(2025, 1, 1)
//!     .years(5)
//!     .account(AccountBuilder::plain("Checking").balance(1_000.0))
//!     .account(AccountBuilder::loan("Car").balance(-12_000.0).annual_rate(6.0))
//!     .transfer(TransferBuilder::new("paycheck", "Checking").amount(3_000.0).on_day(1))
//!     .transfer(TransferBuilder::new("Checking", "Car").amount(400.0).on_day(2))
//!     .build();
//!
//! let result = simulate(&config, &config.date_grid()?)?;
//! println!("paid off on {:?}", result.payoff_date("Car"));
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod date_math;
pub mod date_rule;
pub mod error;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

pub use config::SimulationConfig;
pub use date_rule::{DateRule, PeriodicOffset};
pub use error::{ConfigurationError, RunError, SimulationError, ValidationError};
pub use model::{Account, AccountFlavor, SimulationResult, Transfer};
pub use simulation::{Simulation, simulate, simulate_daily};
