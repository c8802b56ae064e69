//! Accounts and their compounding state machines
//!
//! One [`Account`] type covers every flavor. Plain and savings accounts compound
//! their balance; loans charge interest on a negative principal until it is paid
//! off. The flavor only changes how the periodic rate is derived and which ledger
//! columns are kept.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::journal::{Journal, StateEvent};
use super::ledger::{BalanceRow, Flow, Ledger, LedgerRow, LoanRow};
use crate::date_math::days_between;
use crate::date_rule::DateRule;
use crate::error::{RunError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountFlavor {
    /// Periodic rate given directly
    Plain,
    /// Periodic rate derived from an annual percentage yield
    Savings { apy: f64 },
    /// Debt with a negative principal; the annual rate is split evenly over the periods
    Loan { annual_rate: f64 },
}

/// The ledger an account keeps, by flavor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum AccountLedger {
    Balance(Ledger<BalanceRow>),
    Loan(Ledger<LoanRow>),
}

impl AccountLedger {
    pub fn len(&self) -> usize {
        match self {
            AccountLedger::Balance(l) => l.len(),
            AccountLedger::Loan(l) => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dates(&self) -> &[Date] {
        match self {
            AccountLedger::Balance(l) => l.dates(),
            AccountLedger::Loan(l) => l.dates(),
        }
    }

    pub fn as_balance(&self) -> Option<&Ledger<BalanceRow>> {
        match self {
            AccountLedger::Balance(l) => Some(l),
            AccountLedger::Loan(_) => None,
        }
    }

    pub fn as_loan(&self) -> Option<&Ledger<LoanRow>> {
        match self {
            AccountLedger::Loan(l) => Some(l),
            AccountLedger::Balance(_) => None,
        }
    }

    /// Balance (or principal, for loans) recorded on `date`
    pub fn value_on(&self, date: Date) -> Option<f64> {
        match self {
            AccountLedger::Balance(l) => l.get(date).and_then(|r| r.balance),
            AccountLedger::Loan(l) => l.get(date).and_then(|r| r.principal),
        }
    }

    /// Every recorded balance (or principal) in date order
    pub fn values(&self) -> Vec<(Date, f64)> {
        match self {
            AccountLedger::Balance(l) => l
                .iter()
                .filter_map(|(d, r)| r.balance.map(|v| (d, v)))
                .collect(),
            AccountLedger::Loan(l) => l
                .iter()
                .filter_map(|(d, r)| r.principal.map(|v| (d, v)))
                .collect(),
        }
    }

    pub fn finalize(&mut self) {
        match self {
            AccountLedger::Balance(l) => l.finalize(),
            AccountLedger::Loan(l) => l.finalize(),
        }
    }
}

/// Per-run position of the account on the time grid
#[derive(Debug, Clone, Copy)]
struct Clock {
    opened: Date,
    /// Most recent date any quantity was written
    last_update: Date,
    last_compounded: Option<Date>,
}

impl Clock {
    fn start(date: Date) -> Self {
        Self {
            opened: date,
            last_update: date,
            last_compounded: None,
        }
    }

    fn check(&self, account: &str, date: Date) -> Result<(), RunError> {
        if date < self.last_update {
            return Err(RunError::DateBeforeLastUpdate {
                account: account.to_string(),
                date,
                last_update: self.last_update,
            });
        }
        Ok(())
    }

    fn should_compound(&self, terms: &Terms<'_>, date: Date) -> bool {
        terms.rate != 0.0 && self.last_compounded != Some(date) && terms.rule.fires(date)
    }

    fn days_since_compounding(&self, date: Date) -> i32 {
        days_between(self.last_compounded.unwrap_or(self.opened), date)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct LoanState {
    /// Interest charged but not yet paid (<= 0)
    unpaid_interest: f64,
    paid_off: Option<Date>,
}

struct Terms<'a> {
    account: &'a str,
    rate: f64,
    rule: DateRule,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    In,
    Out,
}

/// A named account with a fixed compounding rule
#[derive(Debug, Clone)]
pub struct Account {
    name: String,
    flavor: AccountFlavor,
    initial_balance: f64,
    /// Rate the account was configured with, in percent per period
    periodic_rate: f64,
    /// Rate in effect for the current run; a paid-off loan drops to zero
    interest_rate: f64,
    compounding: DateRule,
    ledger: Option<AccountLedger>,
    clock: Clock,
    loan: LoanState,
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field, value })
    }
}

impl Account {
    /// Account with a periodic `interest_rate` in percent
    pub fn new(
        name: impl Into<String>,
        initial_balance: f64,
        interest_rate: f64,
        compounding: DateRule,
    ) -> Result<Self, ValidationError> {
        Self::with_flavor(
            name.into(),
            AccountFlavor::Plain,
            initial_balance,
            interest_rate,
            compounding,
        )
    }

    /// Account that never earns interest
    pub fn plain(name: impl Into<String>, initial_balance: f64) -> Result<Self, ValidationError> {
        Self::new(name, initial_balance, 0.0, DateRule::default())
    }

    /// Savings account; the periodic rate is the APY de-annualised over the rule's periods
    pub fn savings(
        name: impl Into<String>,
        initial_balance: f64,
        apy: f64,
        compounding: DateRule,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        check_finite("APY", apy)?;
        if apy < 0.0 {
            return Err(ValidationError::NegativeInterestRate {
                account: name,
                rate: apy,
            });
        }
        compounding.validate()?;
        let periods = compounding.periods_per_year().max(1) as f64;
        let rate = 100.0 * ((1.0 + apy / 100.0).powf(1.0 / periods) - 1.0);
        tracing::debug!(account = %name, periods, rate, "derived periodic rate from APY");
        Self::with_flavor(
            name,
            AccountFlavor::Savings { apy },
            initial_balance,
            rate,
            compounding,
        )
    }

    /// Loan with an annual percentage rate; `initial_balance` is the (negative) debt
    pub fn loan(
        name: impl Into<String>,
        initial_balance: f64,
        annual_rate: f64,
        compounding: DateRule,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        check_finite("initial balance", initial_balance)?;
        check_finite("interest rate", annual_rate)?;
        if initial_balance >= 0.0 {
            return Err(ValidationError::NonNegativeLoanBalance {
                account: name,
                balance: initial_balance,
            });
        }
        if annual_rate < 0.0 {
            return Err(ValidationError::NegativeInterestRate {
                account: name,
                rate: annual_rate,
            });
        }
        compounding.validate()?;
        let rate = annual_rate / compounding.periods_per_year().max(1) as f64;
        Self::with_flavor(
            name,
            AccountFlavor::Loan { annual_rate },
            initial_balance,
            rate,
            compounding,
        )
    }

    fn with_flavor(
        name: String,
        flavor: AccountFlavor,
        initial_balance: f64,
        rate: f64,
        compounding: DateRule,
    ) -> Result<Self, ValidationError> {
        check_finite("initial balance", initial_balance)?;
        check_finite("interest rate", rate)?;
        if rate < 0.0 {
            return Err(ValidationError::NegativeInterestRate {
                account: name,
                rate,
            });
        }
        compounding.validate()?;
        Ok(Self {
            name,
            flavor,
            initial_balance,
            periodic_rate: rate,
            interest_rate: rate,
            compounding,
            ledger: None,
            clock: Clock::start(Date::MIN),
            loan: LoanState::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flavor(&self) -> AccountFlavor {
        self.flavor
    }

    pub fn is_loan(&self) -> bool {
        matches!(self.flavor, AccountFlavor::Loan { .. })
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    /// Rate currently applied per compounding period, in percent
    pub fn interest_rate(&self) -> f64 {
        self.interest_rate
    }

    /// Rate the account was configured with, unaffected by loan payoff
    pub fn periodic_rate(&self) -> f64 {
        self.periodic_rate
    }

    pub fn compounding(&self) -> DateRule {
        self.compounding
    }

    pub fn ledger(&self) -> Option<&AccountLedger> {
        self.ledger.as_ref()
    }

    pub fn last_update(&self) -> Option<Date> {
        self.ledger.as_ref().map(|_| self.clock.last_update)
    }

    /// Date the loan was detected as paid off during the current run
    pub fn paid_off(&self) -> Option<Date> {
        self.loan.paid_off
    }

    /// Balance (or principal) as of the most recent update
    pub fn current_value(&self) -> Option<f64> {
        self.ledger
            .as_ref()
            .and_then(|l| l.value_on(self.clock.last_update))
    }

    /// Allocate the ledger over `dates` and seed the opening row.
    ///
    /// Resets all state from a previous run, including a loan's payoff.
    pub fn init(&mut self, dates: &[Date]) -> Result<(), RunError> {
        let Some(&first) = dates.first() else {
            return Err(RunError::EmptyDateGrid);
        };

        let ledger = if self.is_loan() {
            let mut ledger: Ledger<LoanRow> = Ledger::new(dates);
            if let Some(row) = ledger.get_mut(first) {
                row.principal = Some(self.initial_balance);
                row.interest_due = Some(0.0);
            }
            AccountLedger::Loan(ledger)
        } else {
            let mut ledger: Ledger<BalanceRow> = Ledger::new(dates);
            if let Some(row) = ledger.get_mut(first) {
                row.balance = Some(self.initial_balance);
            }
            AccountLedger::Balance(ledger)
        };

        self.ledger = Some(ledger);
        self.clock = Clock::start(first);
        self.loan = LoanState::default();
        self.interest_rate = self.periodic_rate;
        Ok(())
    }

    /// Advance the account to `date`, compounding if the rule fires.
    ///
    /// Safe to call on dates where nothing fires; never compounds twice on one date.
    pub fn update(&mut self, date: Date, journal: &mut Journal) -> Result<(), RunError> {
        let Self {
            name,
            interest_rate,
            compounding,
            ledger,
            clock,
            loan,
            ..
        } = self;
        let ledger = ledger
            .as_mut()
            .ok_or_else(|| RunError::NotInitialized(name.clone()))?;
        let terms = Terms {
            account: name.as_str(),
            rate: *interest_rate,
            rule: *compounding,
        };
        clock.check(terms.account, date)?;

        match ledger {
            AccountLedger::Balance(ledger) => {
                compound_balance(ledger, clock, &terms, date, journal)
            }
            AccountLedger::Loan(ledger) => {
                if accrue_interest(ledger, clock, loan, &terms, date, journal)? {
                    *interest_rate = 0.0;
                }
                Ok(())
            }
        }
    }

    /// Credit `amount` on `date`. For a loan this is a payment.
    pub fn deposit(
        &mut self,
        date: Date,
        amount: f64,
        counterparty: &str,
        journal: &mut Journal,
    ) -> Result<(), RunError> {
        self.apply_flow(date, amount, counterparty, Direction::In, journal)
    }

    /// Debit `amount` on `date`. Balances may go negative; a loan's debt grows.
    pub fn withdraw(
        &mut self,
        date: Date,
        amount: f64,
        counterparty: &str,
        journal: &mut Journal,
    ) -> Result<(), RunError> {
        self.apply_flow(date, amount, counterparty, Direction::Out, journal)
    }

    fn apply_flow(
        &mut self,
        date: Date,
        amount: f64,
        counterparty: &str,
        direction: Direction,
        journal: &mut Journal,
    ) -> Result<(), RunError> {
        let Self {
            name,
            interest_rate,
            ledger,
            clock,
            loan,
            ..
        } = self;
        let ledger = ledger
            .as_mut()
            .ok_or_else(|| RunError::NotInitialized(name.clone()))?;
        let name = name.as_str();
        clock.check(name, date)?;
        let flow = Flow {
            amount,
            counterparty: counterparty.to_string(),
        };

        match (ledger, direction) {
            (AccountLedger::Balance(ledger), direction) => {
                move_balance(ledger, clock, name, date, flow, direction, journal)
            }
            (AccountLedger::Loan(ledger), Direction::In) => {
                if pay_loan(ledger, clock, loan, name, date, flow, journal)? {
                    *interest_rate = 0.0;
                }
                Ok(())
            }
            (AccountLedger::Loan(ledger), Direction::Out) => {
                draw_loan(ledger, clock, loan, name, date, flow, journal)
            }
        }
    }

    /// Drop ledger rows where nothing happened
    pub fn finalize(&mut self) {
        if let Some(ledger) = self.ledger.as_mut() {
            ledger.finalize();
        }
    }
}

fn row<'a, R: LedgerRow>(
    ledger: &'a Ledger<R>,
    account: &str,
    date: Date,
) -> Result<&'a R, RunError> {
    ledger.get(date).ok_or_else(|| RunError::DateOutsideLedger {
        account: account.to_string(),
        date,
    })
}

fn row_mut<'a, R: LedgerRow>(
    ledger: &'a mut Ledger<R>,
    account: &str,
    date: Date,
) -> Result<&'a mut R, RunError> {
    ledger.get_mut(date).ok_or_else(|| RunError::DateOutsideLedger {
        account: account.to_string(),
        date,
    })
}

fn compound_balance(
    ledger: &mut Ledger<BalanceRow>,
    clock: &mut Clock,
    terms: &Terms<'_>,
    date: Date,
    journal: &mut Journal,
) -> Result<(), RunError> {
    if !clock.should_compound(terms, date) {
        return Ok(());
    }
    let previous = row(ledger, terms.account, clock.last_update)?
        .balance
        .unwrap_or_default();
    let new_value = previous * (1.0 + terms.rate / 100.0);
    row_mut(ledger, terms.account, date)?.balance = Some(new_value);

    journal.record(
        date,
        terms.account,
        StateEvent::Compounded {
            previous,
            new_value,
            rate: terms.rate,
            days: clock.days_since_compounding(date),
        },
    );
    clock.last_update = date;
    clock.last_compounded = Some(date);
    Ok(())
}

fn move_balance(
    ledger: &mut Ledger<BalanceRow>,
    clock: &mut Clock,
    account: &str,
    date: Date,
    flow: Flow,
    direction: Direction,
    journal: &mut Journal,
) -> Result<(), RunError> {
    let previous = row(ledger, account, clock.last_update)?
        .balance
        .unwrap_or_default();
    let amount = flow.amount;
    let counterparty = flow.counterparty.clone();
    let row = row_mut(ledger, account, date)?;

    let event = match direction {
        Direction::In => {
            let new_value = previous + amount;
            row.balance = Some(new_value);
            row.deposits.push(flow);
            StateEvent::Deposit {
                amount,
                counterparty,
                previous,
                new_value,
            }
        }
        Direction::Out => {
            let new_value = previous - amount;
            row.balance = Some(new_value);
            row.withdrawals.push(flow);
            StateEvent::Withdrawal {
                amount,
                counterparty,
                previous,
                new_value,
            }
        }
    };

    clock.last_update = date;
    journal.record(date, account, event);
    Ok(())
}

fn principal_at(ledger: &Ledger<LoanRow>, account: &str, date: Date) -> Result<f64, RunError> {
    Ok(row(ledger, account, date)?.principal.unwrap_or_default())
}

/// Loan update step. Returns true when this call detected the payoff.
fn accrue_interest(
    ledger: &mut Ledger<LoanRow>,
    clock: &mut Clock,
    loan: &mut LoanState,
    terms: &Terms<'_>,
    date: Date,
    journal: &mut Journal,
) -> Result<bool, RunError> {
    if loan.paid_off.is_some() {
        return Ok(false);
    }
    if clock.should_compound(terms, date) {
        let principal = principal_at(ledger, terms.account, clock.last_update)?;
        let interest_due = principal * terms.rate / 100.0;
        let row = row_mut(ledger, terms.account, date)?;
        row.principal = Some(principal);
        row.interest_due = Some(interest_due);
        loan.unpaid_interest += interest_due;

        journal.record(
            date,
            terms.account,
            StateEvent::InterestDue {
                principal,
                interest_due,
                rate: terms.rate,
            },
        );
        clock.last_update = date;
        clock.last_compounded = Some(date);
    }
    // Re-checked on every call, whether or not interest was charged
    settle_payoff(ledger, clock, loan, terms.account, date, journal)
}

/// Payoff transition: principal at `last_update` is no longer negative.
///
/// An overpaid (positive) principal is clamped to exactly zero.
fn settle_payoff(
    ledger: &mut Ledger<LoanRow>,
    clock: &Clock,
    loan: &mut LoanState,
    account: &str,
    date: Date,
    journal: &mut Journal,
) -> Result<bool, RunError> {
    let row = row_mut(ledger, account, clock.last_update)?;
    let Some(principal) = row.principal else {
        return Ok(false);
    };
    if principal < 0.0 {
        return Ok(false);
    }

    row.principal = Some(0.0);
    loan.paid_off = Some(date);
    tracing::info!(account, %date, overpayment = principal, "loan paid off");
    journal.record(
        date,
        account,
        StateEvent::LoanPaidOff {
            overpayment: principal,
        },
    );
    Ok(true)
}

/// Payment into a loan. The full amount reduces the principal; the share that
/// covers outstanding interest is reported as `interest_paid`.
/// Returns true when the payment paid the loan off.
fn pay_loan(
    ledger: &mut Ledger<LoanRow>,
    clock: &mut Clock,
    loan: &mut LoanState,
    account: &str,
    date: Date,
    flow: Flow,
    journal: &mut Journal,
) -> Result<bool, RunError> {
    let amount = flow.amount;
    let counterparty = flow.counterparty.clone();
    let previous_principal = principal_at(ledger, account, clock.last_update)?;

    if loan.paid_off.is_some() {
        // Principal stays pinned at zero after payoff
        let row = row_mut(ledger, account, date)?;
        row.principal = Some(0.0);
        row.payments.push(flow);
        clock.last_update = date;
        journal.record(
            date,
            account,
            StateEvent::LoanPayment {
                amount,
                counterparty,
                interest_paid: 0.0,
                previous_principal,
                new_principal: 0.0,
            },
        );
        return Ok(false);
    }

    let interest_paid = amount.min(-loan.unpaid_interest).max(0.0);
    loan.unpaid_interest += interest_paid;
    let new_principal = previous_principal + amount;

    let row = row_mut(ledger, account, date)?;
    row.principal = Some(new_principal);
    if interest_paid > 0.0 {
        row.interest_paid = Some(row.interest_paid.unwrap_or_default() + interest_paid);
    }
    row.payments.push(flow);
    clock.last_update = date;

    journal.record(
        date,
        account,
        StateEvent::LoanPayment {
            amount,
            counterparty,
            interest_paid,
            previous_principal,
            new_principal,
        },
    );
    settle_payoff(ledger, clock, loan, account, date, journal)
}

/// Borrowing more against a loan deepens the principal, unless it is paid off
fn draw_loan(
    ledger: &mut Ledger<LoanRow>,
    clock: &mut Clock,
    loan: &LoanState,
    account: &str,
    date: Date,
    flow: Flow,
    journal: &mut Journal,
) -> Result<(), RunError> {
    let amount = flow.amount;
    let counterparty = flow.counterparty.clone();
    let previous = principal_at(ledger, account, clock.last_update)?;
    let new_value = if loan.paid_off.is_some() {
        0.0
    } else {
        previous - amount
    };

    let row = row_mut(ledger, account, date)?;
    row.principal = Some(new_value);
    row.draws.push(flow);
    clock.last_update = date;

    journal.record(
        date,
        account,
        StateEvent::Withdrawal {
            amount,
            counterparty,
            previous,
            new_value,
        },
    );
    Ok(())
}
