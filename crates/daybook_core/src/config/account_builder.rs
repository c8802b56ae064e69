//! Account Builder DSL
//!
//! Fluent construction of [`AccountConfig`] entries.
//!
//! ```ignore
//! use daybook_core::config::AccountBuilder;
//!
//! let checking = AccountBuilder::plain("Checking").balance(2_500.0);
//! let savings = AccountBuilder::savings("HYSA").balance(10_000.0).apy(4.5).month_end();
//! let mortgage = AccountBuilder::mortgage("House", 320_000.0, 6.25);
//! ```

use super::{AccountConfig, AccountType};
use crate::date_rule::DateRule;

/// Builder for creating accounts with a fluent API
#[derive(Debug, Clone)]
pub struct AccountBuilder {
    config: AccountConfig,
}

impl AccountBuilder {
    fn with_kind(name: impl Into<String>, kind: AccountType) -> Self {
        Self {
            config: AccountConfig {
                name: name.into(),
                kind,
                balance: 0.0,
                interest_rate: None,
                apy: None,
                compounding: DateRule::default(),
                description: None,
            },
        }
    }

    /// Account with an optional periodic interest rate
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self::with_kind(name, AccountType::Plain)
    }

    /// Savings account quoted by APY
    #[must_use]
    pub fn savings(name: impl Into<String>) -> Self {
        Self::with_kind(name, AccountType::Savings)
    }

    /// Loan quoted by annual rate; set a negative balance
    #[must_use]
    pub fn loan(name: impl Into<String>) -> Self {
        Self::with_kind(name, AccountType::Loan)
    }

    /// Loan compounding on the 1st of each month, with `principal` given as a
    /// positive amount owed
    #[must_use]
    pub fn mortgage(name: impl Into<String>, principal: f64, annual_rate: f64) -> Self {
        Self::loan(name)
            .balance(-principal.abs())
            .interest_rate(annual_rate)
            .description("Mortgage")
    }

    #[must_use]
    pub fn balance(mut self, balance: f64) -> Self {
        self.config.balance = balance;
        self
    }

    /// Periodic rate for plain accounts, annual rate for loans (percent)
    #[must_use]
    pub fn interest_rate(mut self, rate: f64) -> Self {
        self.config.interest_rate = Some(rate);
        self
    }

    /// Alias for `interest_rate`, reads better on loans
    #[must_use]
    pub fn annual_rate(self, rate: f64) -> Self {
        self.interest_rate(rate)
    }

    /// Annual percentage yield for savings accounts (percent)
    #[must_use]
    pub fn apy(mut self, apy: f64) -> Self {
        self.config.apy = Some(apy);
        self
    }

    #[must_use]
    pub fn compound_on(mut self, rule: DateRule) -> Self {
        self.config.compounding = rule;
        self
    }

    /// Compound on a fixed day of the month. Validated when the account is built.
    #[must_use]
    pub fn compound_on_day(self, day: i8) -> Self {
        self.compound_on(DateRule::DayOfMonth(day))
    }

    #[must_use]
    pub fn month_end(self) -> Self {
        self.compound_on(DateRule::month_end())
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn build(self) -> AccountConfig {
        self.config
    }
}

impl From<AccountBuilder> for AccountConfig {
    fn from(builder: AccountBuilder) -> Self {
        builder.build()
    }
}
