//! Tests for the simulation clock and its results
//!
//! These tests verify:
//! - Identical inputs produce identical ledgers and journals
//! - finalize() is idempotent
//! - Re-running a simulation starts from scratch
//! - SimulationResult helpers

use jiff::civil::date;

use super::assert_close;
use crate::config::{AccountBuilder, SimulationBuilder, SimulationConfig, TransferBuilder};
use crate::date_math::date_range;
use crate::error::{RunError, SimulationError};
use crate::simulation::{Simulation, simulate, simulate_daily};

fn household() -> SimulationConfig {
    SimulationBuilder::new()
        .start(2025, 1, 1)
        .years(3)
        .account(AccountBuilder::plain("Checking").balance(2_000.0))
        .account(AccountBuilder::savings("Savings").balance(5_000.0).apy(4.5).month_end())
        .account(AccountBuilder::loan("Car").balance(-6_000.0).annual_rate(7.0))
        .transfer(TransferBuilder::new("paycheck", "Checking").amount(1_900.0).biweekly(4, 1))
        .transfer(TransferBuilder::new("Checking", "rent").amount(1_400.0).on_day(1))
        .transfer(TransferBuilder::new("Checking", "Car").amount(300.0).on_day(15))
        .transfer(TransferBuilder::new("Checking", "Savings").amount(200.0).on_day(28))
        .build()
}

#[test]
fn test_runs_are_deterministic() {
    let config = household();
    let grid = config.date_grid().unwrap();

    let first = simulate(&config, &grid).unwrap();
    let second = simulate(&config, &grid).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_rerun_resets_state() {
    let config = household();
    let grid = config.date_grid().unwrap();
    let mut sim = Simulation::from_config(&config).unwrap();

    sim.run(&grid).unwrap();
    let first = sim.result().unwrap();
    assert!(first.payoff_date("Car").is_some());

    sim.run(&grid).unwrap();
    assert_eq!(sim.result().unwrap(), first);
}

#[test]
fn test_finalize_is_idempotent() {
    let config = household();
    let mut sim = Simulation::from_config(&config)
        .unwrap()
        .with_cleanup(false);
    sim.run(&config.date_grid().unwrap()).unwrap();

    let full_len = sim.account("Checking").unwrap().ledger().unwrap().len();
    assert_eq!(full_len, config.date_grid().unwrap().len());

    sim.finalize();
    let once = sim.result().unwrap();
    sim.finalize();
    let twice = sim.result().unwrap();
    assert_eq!(once, twice);
    assert!(once.accounts[0].ledger.len() < full_len);
}

#[test]
fn test_cleanup_keeps_every_recorded_value() {
    let config = household();
    let grid = config.date_grid().unwrap();

    let trimmed = simulate(&config, &grid).unwrap();
    let mut sim = Simulation::from_config(&config).unwrap().with_cleanup(false);
    sim.run(&grid).unwrap();
    let full = sim.result().unwrap();

    for (a, b) in trimmed.accounts.iter().zip(&full.accounts) {
        assert_eq!(a.ledger.values(), b.ledger.values());
    }
}

#[test]
fn test_result_helpers() {
    let config = household();
    let result = simulate(&config, &config.date_grid().unwrap()).unwrap();

    assert_eq!(result.start_date, date(2025, 1, 1));
    assert_eq!(result.end_date, date(2028, 1, 1));
    assert_eq!(result.accounts.len(), 3);

    let car = result.account("Car").unwrap();
    assert_eq!(car.paid_off, result.payoff_date("Car"));
    assert_eq!(result.final_value("Car"), Some(0.0));

    let expected: f64 = ["Checking", "Savings", "Car"]
        .iter()
        .filter_map(|name| result.final_value(name))
        .sum();
    assert_close(result.net_worth(), expected);

    // Savings compounds at every month end, the loan monthly until payoff
    let savings_compounds = result
        .compounding_entries()
        .filter(|e| e.source == "Savings")
        .count();
    assert_eq!(savings_compounds, 36);
}

#[test]
fn test_journal_collection_can_be_disabled() {
    let config = SimulationConfig {
        collect_journal: false,
        ..household()
    };
    let result = simulate(&config, &config.date_grid().unwrap()).unwrap();
    assert!(result.journal.is_empty());
    assert!(result.final_value("Savings").unwrap() > 5_000.0);
}

#[test]
fn test_simulate_reports_bad_grids() {
    let config = household();
    assert_eq!(
        simulate(&config, &[]),
        Err(SimulationError::Run(RunError::EmptyDateGrid))
    );
    let grid = [date(2025, 3, 1), date(2025, 2, 1)];
    assert!(matches!(
        simulate(&config, &grid),
        Err(SimulationError::Run(RunError::DatesNotAscending { .. }))
    ));
}

#[test]
fn test_grid_need_not_be_daily() {
    // Month starts only: compounding and transfers still line up
    let grid: Vec<_> = date_range(date(2025, 1, 1), date(2025, 12, 31))
        .into_iter()
        .filter(|d| d.day() == 1)
        .collect();
    let config = SimulationBuilder::new()
        .account(AccountBuilder::plain("Checking").balance(100.0).interest_rate(1.0))
        .transfer(TransferBuilder::new("paycheck", "Checking").amount(10.0).on_day(1))
        .build();
    let result = simulate(&config, &grid).unwrap();

    // Each month: compound, then deposit
    let mut expected = 100.0;
    for _ in 0..12 {
        expected = expected * 1.01 + 10.0;
    }
    assert_close(result.final_value("Checking").unwrap(), expected);
}

#[test]
fn test_horizon_past_calendar_range_is_an_error() {
    let config = SimulationConfig {
        duration_years: 30_000,
        ..household()
    };
    assert_eq!(
        simulate_daily(&config).unwrap_err(),
        SimulationError::Run(RunError::HorizonOutOfRange {
            start: date(2025, 1, 1),
            years: 30_000,
        })
    );
}
