//! Recurrence rules shared by compounding and transfer scheduling
//!
//! A [`DateRule`] answers one question: does the recurring event fire on this
//! date? Rules are stateless. Callers that must not fire twice in a period keep
//! their own bookkeeping (accounts track `last_update`).

use std::fmt;
use std::str::FromStr;

use jiff::ToSpan;
use jiff::civil::{Date, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, ValidationError};

/// Closed set of calendar anchors a rule can follow
///
/// Each offset fires on the dates that are fixed points of "roll forward to the
/// next anchor", so `MonthEnd` fires on the last day of every month and nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodicOffset {
    Day,
    MonthBegin,
    MonthEnd,
    /// 1st and 15th of the month
    SemiMonthBegin,
    /// 15th and last day of the month
    SemiMonthEnd,
    /// First Monday-Friday day of the month
    BusinessMonthBegin,
    /// Last Monday-Friday day of the month
    BusinessMonthEnd,
    /// First day of March, June, September and December
    QuarterBegin,
    /// Last day of March, June, September and December
    QuarterEnd,
    YearBegin,
    YearEnd,
}

const OFFSETS: [(&str, PeriodicOffset); 11] = [
    ("Day", PeriodicOffset::Day),
    ("MonthBegin", PeriodicOffset::MonthBegin),
    ("MonthEnd", PeriodicOffset::MonthEnd),
    ("SemiMonthBegin", PeriodicOffset::SemiMonthBegin),
    ("SemiMonthEnd", PeriodicOffset::SemiMonthEnd),
    ("BusinessMonthBegin", PeriodicOffset::BusinessMonthBegin),
    ("BusinessMonthEnd", PeriodicOffset::BusinessMonthEnd),
    ("QuarterBegin", PeriodicOffset::QuarterBegin),
    ("QuarterEnd", PeriodicOffset::QuarterEnd),
    ("YearBegin", PeriodicOffset::YearBegin),
    ("YearEnd", PeriodicOffset::YearEnd),
];

impl PeriodicOffset {
    pub fn name(self) -> &'static str {
        OFFSETS
            .iter()
            .find(|(_, offset)| *offset == self)
            .map(|(name, _)| *name)
            .unwrap_or("Day")
    }

    /// Whether `date` already sits on this anchor
    pub fn is_on_offset(self, date: Date) -> bool {
        let day = date.day();
        let is_last = date == date.last_of_month();
        let quarter_month = date.month() % 3 == 0;
        match self {
            PeriodicOffset::Day => true,
            PeriodicOffset::MonthBegin => day == 1,
            PeriodicOffset::MonthEnd => is_last,
            PeriodicOffset::SemiMonthBegin => day == 1 || day == 15,
            PeriodicOffset::SemiMonthEnd => day == 15 || is_last,
            PeriodicOffset::BusinessMonthBegin => {
                let shift = match date.first_of_month().weekday() {
                    Weekday::Saturday => 2,
                    Weekday::Sunday => 1,
                    _ => 0,
                };
                day == 1 + shift
            }
            PeriodicOffset::BusinessMonthEnd => {
                let last = date.last_of_month();
                let shift = match last.weekday() {
                    Weekday::Saturday => 1,
                    Weekday::Sunday => 2,
                    _ => 0,
                };
                day == last.day() - shift
            }
            PeriodicOffset::QuarterBegin => quarter_month && day == 1,
            PeriodicOffset::QuarterEnd => quarter_month && is_last,
            PeriodicOffset::YearBegin => date.month() == 1 && day == 1,
            PeriodicOffset::YearEnd => date.month() == 12 && day == 31,
        }
    }
}

impl FromStr for PeriodicOffset {
    type Err = ConfigurationError;

    /// Accepts `MonthEnd` as well as `month_end` / `monthend`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        OFFSETS
            .iter()
            .find(|(name, _)| name.to_ascii_lowercase() == wanted)
            .map(|(_, offset)| *offset)
            .ok_or_else(|| ConfigurationError::UnknownOffset(s.to_string()))
    }
}

impl fmt::Display for PeriodicOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// When a recurring event fires
///
/// Build rules through [`DateRule::day_of_month`], [`DateRule::offset`] and
/// [`DateRule::biweekly`] so parameters are validated. A hand-built variant with
/// out-of-range values simply never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateRuleSpec", into = "DateRuleSpec")]
pub enum DateRule {
    /// Fires when `date.day() == day`. Months shorter than `day` are skipped.
    DayOfMonth(i8),
    Offset(PeriodicOffset),
    /// Fires on `weekday` (0 = Monday) of ISO weeks whose number has the given parity
    Biweekly { weekday: i8, parity: i8 },
}

impl Default for DateRule {
    fn default() -> Self {
        DateRule::DayOfMonth(1)
    }
}

impl DateRule {
    pub fn day_of_month(day: i8) -> Result<Self, ValidationError> {
        let rule = DateRule::DayOfMonth(day);
        rule.validate()?;
        Ok(rule)
    }

    pub fn offset(name: &str) -> Result<Self, ConfigurationError> {
        Ok(DateRule::Offset(name.parse()?))
    }

    pub fn biweekly(weekday: i8, parity: i8) -> Result<Self, ValidationError> {
        let rule = DateRule::Biweekly { weekday, parity };
        rule.validate()?;
        Ok(rule)
    }

    pub const fn month_end() -> Self {
        DateRule::Offset(PeriodicOffset::MonthEnd)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match *self {
            DateRule::DayOfMonth(day) if !(1..=31).contains(&day) => {
                Err(ValidationError::DayOfMonthOutOfRange(day))
            }
            DateRule::Biweekly { weekday, .. } if !(0..=6).contains(&weekday) => {
                Err(ValidationError::BiweeklyWeekdayOutOfRange(weekday))
            }
            DateRule::Biweekly { parity, .. } if !(0..=1).contains(&parity) => {
                Err(ValidationError::BiweeklyParityOutOfRange(parity))
            }
            _ => Ok(()),
        }
    }

    pub fn fires(&self, date: Date) -> bool {
        match *self {
            DateRule::DayOfMonth(day) => date.day() == day,
            DateRule::Offset(offset) => offset.is_on_offset(date),
            DateRule::Biweekly { weekday, parity } => {
                date.weekday().to_monday_zero_offset() == weekday
                    && date.iso_week_date().week() % 2 == parity
            }
        }
    }

    /// How many times per year the rule is taken to fire when annualising rates.
    ///
    /// Day-of-month rules count as 12. Every other rule is counted over calendar
    /// year 2000, so `Day` yields 366.
    pub fn periods_per_year(&self) -> u32 {
        if let DateRule::DayOfMonth(_) = self {
            return 12;
        }
        let start = jiff::civil::date(2000, 1, 1);
        start
            .series(1.day())
            .take_while(|d| d.year() == 2000)
            .filter(|d| self.fires(*d))
            .count() as u32
    }
}

impl fmt::Display for DateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DateRule::DayOfMonth(day) => write!(f, "day {day} of each month"),
            DateRule::Offset(offset) => write!(f, "{offset}"),
            DateRule::Biweekly { weekday, parity } => {
                let weeks = if parity == 0 { "even" } else { "odd" };
                match Weekday::from_monday_zero_offset(weekday) {
                    Ok(day) => write!(f, "biweekly on {day:?} ({weeks} ISO weeks)"),
                    Err(_) => write!(f, "biweekly on weekday {weekday} ({weeks} ISO weeks)"),
                }
            }
        }
    }
}

/// Serialized shape of a rule: `15`, `"MonthEnd"` or `{biweekly: {weekday, parity}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DateRuleSpec {
    Day(i8),
    Named(String),
    Biweekly { biweekly: BiweeklySpec },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct BiweeklySpec {
    weekday: i8,
    parity: i8,
}

impl TryFrom<DateRuleSpec> for DateRule {
    type Error = ConfigurationError;

    fn try_from(spec: DateRuleSpec) -> Result<Self, Self::Error> {
        match spec {
            DateRuleSpec::Day(day) => Ok(DateRule::day_of_month(day)?),
            DateRuleSpec::Named(name) => DateRule::offset(&name),
            DateRuleSpec::Biweekly {
                biweekly: BiweeklySpec { weekday, parity },
            } => Ok(DateRule::biweekly(weekday, parity)?),
        }
    }
}

impl From<DateRule> for DateRuleSpec {
    fn from(rule: DateRule) -> Self {
        match rule {
            DateRule::DayOfMonth(day) => DateRuleSpec::Day(day),
            DateRule::Offset(offset) => DateRuleSpec::Named(offset.name().to_string()),
            DateRule::Biweekly { weekday, parity } => DateRuleSpec::Biweekly {
                biweekly: BiweeklySpec { weekday, parity },
            },
        }
    }
}
