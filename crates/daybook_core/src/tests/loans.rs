//! Tests for loans
//!
//! These tests verify:
//! - Payoff is detected on the date the principal reaches zero
//! - A paid-off loan never accrues again, whatever later transfers do
//! - Overpayments are clamped to exactly zero
//! - A payment moves the principal by its full amount; the share covering
//!   outstanding interest is only reported

use jiff::civil::{Date, date};

use super::{assert_close, interest_due_count};
use crate::date_math::date_range;
use crate::date_rule::DateRule;
use crate::model::{Account, Journal, StateEvent};
use crate::simulation::Simulation;

fn monthly_loan(balance: f64, annual_rate: f64) -> Account {
    Account::loan("Car", balance, annual_rate, DateRule::default()).unwrap()
}

fn principal_after(sim: &Simulation, after: Date) -> Vec<f64> {
    sim.account("Car")
        .unwrap()
        .ledger()
        .unwrap()
        .values()
        .into_iter()
        .filter(|(d, _)| *d > after)
        .map(|(_, v)| v)
        .collect()
}

#[test]
fn test_payoff_on_compounding_date_takes_effect_same_day() {
    let mut sim = Simulation::new();
    sim.add_account(monthly_loan(-100.0, 12.0)).unwrap();
    // Exactly the principal, on the compounding day
    sim.add_transfer("paycheck", "Car", 100.0, DateRule::day_of_month(1).unwrap())
        .unwrap();
    sim.run(&date_range(date(2025, 1, 2), date(2025, 4, 30)))
        .unwrap();

    let car = sim.account("Car").unwrap();
    assert_eq!(car.paid_off(), Some(date(2025, 2, 1)));
    assert_eq!(car.interest_rate(), 0.0);
    assert_close(car.periodic_rate(), 1.0);

    let journal = sim.journal().entries();
    assert_eq!(interest_due_count(journal, "Car"), 1);
    let payoff: Vec<_> = journal
        .iter()
        .filter(|e| matches!(e.event, StateEvent::LoanPaidOff { .. }))
        .collect();
    assert_eq!(payoff.len(), 1);
    assert_eq!(payoff[0].date, date(2025, 2, 1));

    let row = car
        .ledger()
        .unwrap()
        .as_loan()
        .unwrap()
        .get(date(2025, 2, 1))
        .unwrap();
    assert_eq!(row.principal, Some(0.0));
    assert_close(row.interest_due.unwrap(), -1.0);
    assert_close(row.interest_paid.unwrap(), 1.0);

    // March and April payments are recorded but never move the principal
    assert!(principal_after(&sim, date(2025, 2, 1)).iter().all(|p| *p == 0.0));
    let ledger = car.ledger().unwrap().as_loan().unwrap();
    assert_eq!(ledger.get(date(2025, 4, 1)).unwrap().paid(), 100.0);
}

#[test]
fn test_paying_the_principal_settles_despite_outstanding_interest() {
    let mut sim = Simulation::new();
    sim.add_account(monthly_loan(-100.0, 12.0)).unwrap();
    sim.add_transfer("paycheck", "Car", 100.0, DateRule::day_of_month(2).unwrap())
        .unwrap();
    sim.run(&date_range(date(2025, 1, 2), date(2025, 4, 30)))
        .unwrap();

    let car = sim.account("Car").unwrap();
    // Feb 1 charges 1 of interest; the Feb 2 payment still clears the debt
    assert_eq!(car.paid_off(), Some(date(2025, 2, 2)));
    assert_eq!(car.interest_rate(), 0.0);
    assert_eq!(interest_due_count(sim.journal().entries(), "Car"), 1);

    let row = car
        .ledger()
        .unwrap()
        .as_loan()
        .unwrap()
        .get(date(2025, 2, 2))
        .unwrap();
    assert_eq!(row.principal, Some(0.0));
    assert_close(row.interest_paid.unwrap(), 1.0);
}

#[test]
fn test_payoff_is_terminal_despite_later_draws() {
    let mut sim = Simulation::new();
    sim.add_account(monthly_loan(-100.0, 12.0)).unwrap();
    sim.add_transfer("paycheck", "Car", 150.0, DateRule::day_of_month(10).unwrap())
        .unwrap();
    sim.add_transfer("Car", "shop", 500.0, DateRule::day_of_month(20).unwrap())
        .unwrap();
    sim.run(&date_range(date(2025, 1, 2), date(2025, 6, 30)))
        .unwrap();

    let journal = sim.journal().entries();
    assert_eq!(sim.account("Car").unwrap().paid_off(), Some(date(2025, 1, 10)));
    assert_eq!(interest_due_count(journal, "Car"), 0);
    assert!(principal_after(&sim, date(2025, 1, 9)).iter().all(|p| *p == 0.0));

    // Draws are still written to the ledger
    let ledger = sim.account("Car").unwrap().ledger().unwrap().as_loan().unwrap();
    let jan_20 = ledger.get(date(2025, 1, 20)).unwrap();
    assert_eq!(jan_20.draws.len(), 1);
    assert_eq!(jan_20.draws[0].counterparty, "shop");
    assert_eq!(jan_20.principal, Some(0.0));
}

#[test]
fn test_overpayment_clamped_to_zero() {
    let grid = date_range(date(2025, 1, 1), date(2025, 1, 31));
    let mut journal = Journal::default();
    let mut loan = monthly_loan(-100.0, 0.0);
    loan.init(&grid).unwrap();

    loan.deposit(date(2025, 1, 10), 150.0, "Checking", &mut journal)
        .unwrap();
    assert_eq!(loan.current_value(), Some(0.0));
    assert_eq!(loan.paid_off(), Some(date(2025, 1, 10)));

    let overpayment = journal.entries().iter().find_map(|e| match e.event {
        StateEvent::LoanPaidOff { overpayment } => Some(overpayment),
        _ => None,
    });
    assert_eq!(overpayment, Some(50.0));

    // A later update neither re-detects payoff nor moves the principal
    loan.update(date(2025, 1, 11), &mut journal).unwrap();
    assert_eq!(journal.len(), 2);
    assert_eq!(loan.current_value(), Some(0.0));
}

#[test]
fn test_exact_payoff_reports_no_overpayment() {
    let grid = date_range(date(2025, 1, 2), date(2025, 1, 31));
    let mut journal = Journal::default();
    let mut loan = monthly_loan(-250.0, 6.0);
    loan.init(&grid).unwrap();
    loan.deposit(date(2025, 1, 5), 250.0, "Checking", &mut journal)
        .unwrap();
    assert_eq!(
        journal.entries().last().unwrap().event,
        StateEvent::LoanPaidOff { overpayment: 0.0 }
    );
}

#[test]
fn test_small_payments_report_interest_paid() {
    let mut sim = Simulation::new();
    sim.add_account(monthly_loan(-1_000.0, 12.0)).unwrap();
    sim.add_transfer("paycheck", "Car", 5.0, DateRule::day_of_month(2).unwrap())
        .unwrap();
    sim.run(&date_range(date(2025, 1, 3), date(2025, 3, 31)))
        .unwrap();

    let car = sim.account("Car").unwrap();
    // Interest is never capitalised; each payment comes off the principal
    assert_close(car.current_value().unwrap(), -990.0);
    assert_eq!(car.paid_off(), None);

    let payments: Vec<(f64, f64)> = sim
        .journal()
        .entries()
        .iter()
        .filter_map(|e| match e.event {
            StateEvent::LoanPayment {
                interest_paid,
                new_principal,
                ..
            } => Some((interest_paid, new_principal)),
            _ => None,
        })
        .collect();
    assert_eq!(payments.len(), 2);
    for (interest_paid, _) in &payments {
        assert_close(*interest_paid, 5.0);
    }
    assert_close(payments[0].1, -995.0);
    assert_close(payments[1].1, -990.0);

    let dues: Vec<f64> = sim
        .journal()
        .entries()
        .iter()
        .filter_map(|e| match e.event {
            StateEvent::InterestDue { interest_due, .. } => Some(interest_due),
            _ => None,
        })
        .collect();
    // Mar 1 charges on the reduced principal
    assert_eq!(dues.len(), 2);
    assert_close(dues[0], -10.0);
    assert_close(dues[1], -9.95);
}

#[test]
fn test_payment_reduces_principal_by_full_amount() {
    let mut sim = Simulation::new();
    sim.add_account(monthly_loan(-1_000.0, 12.0)).unwrap();
    sim.add_transfer("Checking", "Car", 110.0, DateRule::day_of_month(2).unwrap())
        .unwrap();
    sim.run(&date_range(date(2025, 1, 3), date(2025, 2, 28)))
        .unwrap();

    // Feb 1: 10 of interest due; Feb 2: all 110 comes off the principal
    assert_close(sim.account("Car").unwrap().current_value().unwrap(), -890.0);
}

#[test]
fn test_loan_keeps_accruing_until_paid() {
    let mut sim = Simulation::new();
    sim.add_account(monthly_loan(-1_200.0, 12.0)).unwrap();
    sim.run(&date_range(date(2025, 1, 2), date(2025, 12, 31)))
        .unwrap();
    assert_eq!(interest_due_count(sim.journal().entries(), "Car"), 11);
    assert_eq!(sim.account("Car").unwrap().paid_off(), None);
}
