//! Tests for the Builder DSL

use crate::config::{AccountBuilder, AccountType, SimulationBuilder, TransferBuilder};
use crate::date_rule::{DateRule, PeriodicOffset};
use crate::error::{ConfigurationError, ValidationError};
use crate::model::{AccountFlavor, Endpoint};

#[test]
fn test_simulation_builder_basic() {
    let config = SimulationBuilder::new()
        .start(2025, 1, 1)
        .years(5)
        .cleanup(false)
        .build();

    assert_eq!(config.start_date, Some(jiff::civil::date(2025, 1, 1)));
    assert_eq!(config.duration_years, 5);
    assert!(!config.cleanup);
    assert!(config.accounts.is_empty());
    assert!(config.transfers.is_empty());
}

#[test]
fn test_account_builder_presets() {
    let config = SimulationBuilder::new()
        .account(AccountBuilder::plain("Checking").balance(1_000.0))
        .account(AccountBuilder::savings("HYSA").balance(20_000.0).apy(4.25).month_end())
        .account(AccountBuilder::mortgage("House", 300_000.0, 6.0))
        .build();

    assert_eq!(config.accounts.len(), 3);
    let house = config.account("House").unwrap();
    assert_eq!(house.kind, AccountType::Loan);
    assert_eq!(house.balance, -300_000.0);
    assert_eq!(house.interest_rate, Some(6.0));

    let (_, sim) = SimulationBuilder::new()
        .account(AccountBuilder::savings("HYSA").apy(4.25).month_end())
        .account(AccountBuilder::mortgage("House", 300_000.0, 6.0))
        .build_simulation()
        .unwrap();
    assert_eq!(
        sim.account("HYSA").unwrap().flavor(),
        AccountFlavor::Savings { apy: 4.25 }
    );
    assert_eq!(sim.account("HYSA").unwrap().compounding(), DateRule::month_end());
    assert!((sim.account("House").unwrap().interest_rate() - 0.5).abs() < 1e-12);
}

#[test]
fn test_transfer_builder_schedules() {
    let config = SimulationBuilder::new()
        .account(AccountBuilder::plain("Checking"))
        .account(AccountBuilder::plain("Savings"))
        .transfer(
            TransferBuilder::new("employer", "Checking")
                .amount(2_000.0)
                .biweekly(4, 1)
                .named("Salary"),
        )
        .transfer(
            TransferBuilder::new("Checking", "Savings")
                .amount(300.0)
                .every(PeriodicOffset::SemiMonthEnd),
        )
        .build();

    assert_eq!(config.transfers[0].name.as_deref(), Some("Salary"));
    assert_eq!(
        config.transfers[0].interval,
        DateRule::Biweekly {
            weekday: 4,
            parity: 1
        }
    );
    assert_eq!(
        config.transfers[1].interval,
        DateRule::Offset(PeriodicOffset::SemiMonthEnd)
    );

    let (_, sim) = SimulationBuilder::new()
        .account(AccountBuilder::plain("Checking"))
        .transfer(TransferBuilder::new("employer", "Checking").amount(2_000.0).on_day(1))
        .build_simulation()
        .unwrap();
    assert_eq!(
        sim.transfers()[0].from(),
        &Endpoint::External("employer".into())
    );
}

#[test]
fn test_transfers_may_precede_their_accounts() {
    let (_, sim) = SimulationBuilder::new()
        .transfer(TransferBuilder::new("paycheck", "Checking").amount(10.0).on_day(1))
        .account(AccountBuilder::plain("Checking"))
        .build_simulation()
        .unwrap();
    assert!(matches!(sim.transfers()[0].to(), Endpoint::Account(_)));
}

#[test]
fn test_build_simulation_surfaces_validation_errors() {
    let err = SimulationBuilder::new()
        .account(AccountBuilder::plain("Checking").compound_on_day(32))
        .build_simulation()
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::Validation(ValidationError::DayOfMonthOutOfRange(32))
    );

    let err = SimulationBuilder::new()
        .account(AccountBuilder::loan("Car").balance(5_000.0))
        .build_simulation()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::Validation(ValidationError::NonNegativeLoanBalance { .. })
    ));

    let err = SimulationBuilder::new()
        .account(AccountBuilder::plain("Checking"))
        .transfer(TransferBuilder::new("paycheck", "Checking"))
        .build_simulation()
        .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::Validation(ValidationError::NonPositiveTransferAmount(0.0))
    );
}

#[test]
fn test_duplicate_names_rejected() {
    let err = SimulationBuilder::new()
        .account(AccountBuilder::plain("Checking"))
        .account(AccountBuilder::savings("Checking"))
        .build_simulation()
        .unwrap_err();
    assert_eq!(err, ConfigurationError::DuplicateAccount("Checking".into()));
}

#[test]
fn test_declared_externals_flow_through_builder() {
    let err = SimulationBuilder::new()
        .external("employer")
        .account(AccountBuilder::plain("Checking"))
        .transfer(TransferBuilder::new("emplyer", "Checking").amount(1.0))
        .build_simulation()
        .unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownEndpoint("emplyer".into()));
}
