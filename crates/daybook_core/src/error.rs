use std::fmt;

use jiff::civil::Date;

use crate::model::AccountId;

/// Invalid parameters rejected while constructing an account, rule or transfer
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NegativeInterestRate {
        account: String,
        rate: f64,
    },
    NonNegativeLoanBalance {
        account: String,
        balance: f64,
    },
    NonFinite {
        field: &'static str,
        value: f64,
    },
    DayOfMonthOutOfRange(i8),
    BiweeklyWeekdayOutOfRange(i8),
    BiweeklyParityOutOfRange(i8),
    NonPositiveTransferAmount(f64),
    /// A config field that has no meaning for the account's type
    UnexpectedField {
        account: String,
        field: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NegativeInterestRate { account, rate } => {
                write!(f, "account {account:?}: interest rate must be >= 0 (got {rate})")
            }
            ValidationError::NonNegativeLoanBalance { account, balance } => {
                write!(
                    f,
                    "loan {account:?}: debt must have a negative balance (got {balance})"
                )
            }
            ValidationError::NonFinite { field, value } => {
                write!(f, "{field} must be a finite number (got {value})")
            }
            ValidationError::DayOfMonthOutOfRange(day) => {
                write!(f, "day of month must be within 1..=31 (got {day})")
            }
            ValidationError::BiweeklyWeekdayOutOfRange(weekday) => {
                write!(f, "biweekly weekday must be within 0..=6 (got {weekday})")
            }
            ValidationError::BiweeklyParityOutOfRange(parity) => {
                write!(f, "biweekly parity must be 0 or 1 (got {parity})")
            }
            ValidationError::NonPositiveTransferAmount(amount) => {
                write!(f, "transfer amount must be > 0 (got {amount})")
            }
            ValidationError::UnexpectedField { account, field } => {
                write!(f, "account {account:?}: `{field}` does not apply to this account type")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Problems with how a simulation is wired together
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    UnknownOffset(String),
    DuplicateAccount(String),
    /// A transfer names something that is neither an account nor a declared external label
    UnknownEndpoint(String),
    /// An account and a transfer would write journal entries under the same name
    SourceClash(String),
    /// More accounts or transfers than ids can address
    TooMany(&'static str),
    Validation(ValidationError),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::UnknownOffset(name) => {
                write!(f, "unknown periodic date offset {name:?}")
            }
            ConfigurationError::DuplicateAccount(name) => {
                write!(f, "account name {name:?} is already registered")
            }
            ConfigurationError::UnknownEndpoint(name) => write!(
                f,
                "{name:?} is neither a registered account nor a declared external label"
            ),
            ConfigurationError::SourceClash(name) => {
                write!(f, "{name:?} names both an account and a transfer")
            }
            ConfigurationError::TooMany(what) => write!(f, "too many {what}"),
            ConfigurationError::Validation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for ConfigurationError {
    fn from(err: ValidationError) -> Self {
        ConfigurationError::Validation(err)
    }
}

/// Misuse of the clock: bad date grids or out-of-order account calls
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    EmptyDateGrid,
    DatesNotAscending {
        previous: Date,
        next: Date,
    },
    NotInitialized(String),
    DateOutsideLedger {
        account: String,
        date: Date,
    },
    DateBeforeLastUpdate {
        account: String,
        date: Date,
        last_update: Date,
    },
    UnknownAccountId(AccountId),
    /// `years` of daily dates after `start` runs past the supported calendar
    HorizonOutOfRange {
        start: Date,
        years: usize,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EmptyDateGrid => write!(f, "date grid is empty"),
            RunError::DatesNotAscending { previous, next } => {
                write!(f, "date grid is not strictly increasing ({previous} then {next})")
            }
            RunError::NotInitialized(account) => {
                write!(f, "account {account:?} was used before init")
            }
            RunError::DateOutsideLedger { account, date } => {
                write!(f, "account {account:?}: {date} is not part of the ledger")
            }
            RunError::DateBeforeLastUpdate {
                account,
                date,
                last_update,
            } => write!(
                f,
                "account {account:?}: {date} is earlier than last update {last_update}"
            ),
            RunError::UnknownAccountId(id) => write!(f, "account {id:?} not found"),
            RunError::HorizonOutOfRange { start, years } => {
                write!(f, "a {years}-year horizon from {start} is outside the supported dates")
            }
        }
    }
}

impl std::error::Error for RunError {}

/// Anything that can stop [`crate::simulation::simulate`]
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Configuration(ConfigurationError),
    Run(RunError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Configuration(e) => write!(f, "configuration error: {e}"),
            SimulationError::Run(e) => write!(f, "run error: {e}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Configuration(e) => Some(e),
            SimulationError::Run(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for SimulationError {
    fn from(err: ConfigurationError) -> Self {
        SimulationError::Configuration(err)
    }
}

impl From<ValidationError> for SimulationError {
    fn from(err: ValidationError) -> Self {
        SimulationError::Configuration(ConfigurationError::Validation(err))
    }
}

impl From<RunError> for SimulationError {
    fn from(err: RunError) -> Self {
        SimulationError::Run(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
