//! Transfer Builder DSL
//!
//! ```ignore
//! use daybook_core::config::TransferBuilder;
//! use daybook_core::date_rule::PeriodicOffset;
//!
//! let salary = TransferBuilder::new("employer", "Checking")
//!     .amount(2_100.0)
//!     .biweekly(4, 1)
//!     .named("Salary");
//! let sweep = TransferBuilder::new("Checking", "Savings")
//!     .amount(500.0)
//!     .every(PeriodicOffset::MonthEnd);
//! ```

use super::TransferConfig;
use crate::date_rule::{DateRule, PeriodicOffset};

/// Builder for recurring transfers
///
/// Endpoints are names: a registered account or an external label such as
/// "paycheck". Amount and schedule are validated when the simulation is built.
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    config: TransferConfig,
}

impl TransferBuilder {
    /// Transfer of zero on the 1st of each month until configured
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            config: TransferConfig {
                name: None,
                from: from.into(),
                to: to.into(),
                amount: 0.0,
                interval: DateRule::default(),
            },
        }
    }

    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.config.amount = amount;
        self
    }

    #[must_use]
    pub fn schedule(mut self, rule: DateRule) -> Self {
        self.config.interval = rule;
        self
    }

    #[must_use]
    pub fn on_day(self, day: i8) -> Self {
        self.schedule(DateRule::DayOfMonth(day))
    }

    #[must_use]
    pub fn every(self, offset: PeriodicOffset) -> Self {
        self.schedule(DateRule::Offset(offset))
    }

    /// Every other `weekday` (0 = Monday) in ISO weeks of the given parity
    #[must_use]
    pub fn biweekly(self, weekday: i8, parity: i8) -> Self {
        self.schedule(DateRule::Biweekly { weekday, parity })
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn build(self) -> TransferConfig {
        self.config
    }
}
