//! Recurring transfers between accounts and the outside world

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::accounts::Account;
use super::ids::AccountId;
use super::journal::{Journal, StateEvent};
use crate::date_rule::DateRule;
use crate::error::{RunError, ValidationError};

/// Source or destination of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Account(AccountId),
    /// Income source or expense sink outside the modeled accounts (e.g. "paycheck")
    External(String),
}

impl Endpoint {
    pub fn is_external(&self) -> bool {
        matches!(self, Endpoint::External(_))
    }

    /// Name used for ledger notes and journal entries
    pub fn label<'a>(&'a self, accounts: &'a [Account]) -> Result<&'a str, RunError> {
        match self {
            Endpoint::Account(id) => accounts
                .get(id.index())
                .map(Account::name)
                .ok_or(RunError::UnknownAccountId(*id)),
            Endpoint::External(label) => Ok(label),
        }
    }
}

/// Fixed amount moved from one endpoint to another whenever the schedule fires
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    name: Option<String>,
    from: Endpoint,
    to: Endpoint,
    amount: f64,
    schedule: DateRule,
}

impl Transfer {
    pub fn new(
        from: Endpoint,
        to: Endpoint,
        amount: f64,
        schedule: DateRule,
    ) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "transfer amount",
                value: amount,
            });
        }
        if amount <= 0.0 {
            return Err(ValidationError::NonPositiveTransferAmount(amount));
        }
        schedule.validate()?;
        Ok(Self {
            name: None,
            from,
            to,
            amount,
            schedule,
        })
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn from(&self) -> &Endpoint {
        &self.from
    }

    pub fn to(&self) -> &Endpoint {
        &self.to
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn schedule(&self) -> DateRule {
        self.schedule
    }

    /// Journal source: the transfer's name, or `"<from> -> <to>"`
    pub fn source(&self, accounts: &[Account]) -> Result<String, RunError> {
        match &self.name {
            Some(name) => Ok(name.clone()),
            None => Ok(format!(
                "{} -> {}",
                self.from.label(accounts)?,
                self.to.label(accounts)?
            )),
        }
    }

    pub fn fires(&self, date: Date) -> bool {
        self.schedule.fires(date)
    }

    /// Move the money if the schedule fires on `date`. Returns whether it fired.
    ///
    /// Funds are never checked; the source may go arbitrarily negative.
    pub fn update(
        &self,
        date: Date,
        accounts: &mut [Account],
        journal: &mut Journal,
    ) -> Result<bool, RunError> {
        if !self.fires(date) {
            return Ok(false);
        }

        let from_label = self.from.label(accounts)?.to_string();
        let to_label = self.to.label(accounts)?.to_string();

        if let Endpoint::Account(id) = &self.from {
            account_mut(accounts, *id)?.withdraw(date, self.amount, &to_label, journal)?;
        }
        if let Endpoint::Account(id) = &self.to {
            account_mut(accounts, *id)?.deposit(date, self.amount, &from_label, journal)?;
        }

        let source = self.source(accounts)?;
        journal.record(
            date,
            &source,
            StateEvent::TransferFired {
                from: from_label,
                to: to_label,
                amount: self.amount,
            },
        );
        Ok(true)
    }
}

fn account_mut(accounts: &mut [Account], id: AccountId) -> Result<&mut Account, RunError> {
    accounts
        .get_mut(id.index())
        .ok_or(RunError::UnknownAccountId(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn accounts() -> Vec<Account> {
        let dates = crate::date_math::date_range(date(2025, 1, 1), date(2025, 2, 28));
        let mut accounts = vec![
            Account::plain("Checking", 1_000.0).unwrap(),
            Account::plain("Savings", 0.0).unwrap(),
        ];
        for a in &mut accounts {
            a.init(&dates).unwrap();
        }
        accounts
    }

    #[test]
    fn test_amount_must_be_positive() {
        for amount in [0.0, -5.0] {
            let err = Transfer::new(
                Endpoint::External("paycheck".into()),
                Endpoint::Account(AccountId(0)),
                amount,
                DateRule::default(),
            )
            .unwrap_err();
            assert_eq!(err, ValidationError::NonPositiveTransferAmount(amount));
        }
    }

    #[test]
    fn test_invalid_schedule_rejected() {
        let err = Transfer::new(
            Endpoint::External("paycheck".into()),
            Endpoint::Account(AccountId(0)),
            10.0,
            DateRule::Biweekly {
                weekday: 9,
                parity: 0,
            },
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::BiweeklyWeekdayOutOfRange(9));
    }

    #[test]
    fn test_account_to_account_transfer() {
        let mut accounts = accounts();
        let mut journal = Journal::default();
        let transfer = Transfer::new(
            Endpoint::Account(AccountId(0)),
            Endpoint::Account(AccountId(1)),
            200.0,
            DateRule::day_of_month(10).unwrap(),
        )
        .unwrap();

        assert!(!transfer.update(date(2025, 1, 9), &mut accounts, &mut journal).unwrap());
        assert!(transfer.update(date(2025, 1, 10), &mut accounts, &mut journal).unwrap());

        assert_eq!(accounts[0].current_value(), Some(800.0));
        assert_eq!(accounts[1].current_value(), Some(200.0));

        let savings = accounts[1].ledger().unwrap().as_balance().unwrap();
        assert_eq!(
            savings.get(date(2025, 1, 10)).unwrap().deposits[0].counterparty,
            "Checking"
        );
        let last = journal.entries().last().unwrap();
        assert_eq!(last.source, "Checking -> Savings");
        assert!(last.event.is_transfer());
    }

    #[test]
    fn test_external_only_transfer_touches_nothing() {
        let mut accounts = accounts();
        let mut journal = Journal::default();
        let transfer = Transfer::new(
            Endpoint::External("paycheck".into()),
            Endpoint::External("cash".into()),
            50.0,
            DateRule::day_of_month(10).unwrap(),
        )
        .unwrap()
        .named("pocket money");

        assert!(transfer.update(date(2025, 1, 10), &mut accounts, &mut journal).unwrap());
        assert_eq!(accounts[0].current_value(), Some(1_000.0));
        assert_eq!(journal.len(), 1);
        assert_eq!(journal.entries()[0].source, "pocket money");
    }

    #[test]
    fn test_overdraft_is_not_an_error() {
        let mut accounts = accounts();
        let mut journal = Journal::default();
        let transfer = Transfer::new(
            Endpoint::Account(AccountId(1)),
            Endpoint::External("rent".into()),
            500.0,
            DateRule::day_of_month(1).unwrap(),
        )
        .unwrap();
        transfer
            .update(date(2025, 2, 1), &mut accounts, &mut journal)
            .unwrap();
        assert_eq!(accounts[1].current_value(), Some(-500.0));
    }

    #[test]
    fn test_unknown_account_id() {
        let mut accounts = accounts();
        let mut journal = Journal::default();
        let transfer = Transfer::new(
            Endpoint::Account(AccountId(7)),
            Endpoint::External("rent".into()),
            5.0,
            DateRule::day_of_month(1).unwrap(),
        )
        .unwrap();
        assert_eq!(
            transfer.update(date(2025, 2, 1), &mut accounts, &mut journal),
            Err(RunError::UnknownAccountId(AccountId(7)))
        );
    }
}
