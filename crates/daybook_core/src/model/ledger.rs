//! Per-account ledgers
//!
//! A ledger owns one row per grid date. Rows start blank and are only filled in
//! on dates where something happened to the account; [`Ledger::finalize`] drops
//! the blank ones once the run is over.

use jiff::civil::Date;
use serde::{Deserialize, Serialize, Serializer};

/// A row type that can tell whether anything was recorded in it
pub trait LedgerRow: Default + Clone {
    fn is_blank(&self) -> bool;
}

/// Money moving in or out of an account, with the other side of the movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub amount: f64,
    pub counterparty: String,
}

/// Row of a plain or savings account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deposits: Vec<Flow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub withdrawals: Vec<Flow>,
}

impl BalanceRow {
    pub fn deposited(&self) -> f64 {
        self.deposits.iter().map(|f| f.amount).sum()
    }

    pub fn withdrawn(&self) -> f64 {
        self.withdrawals.iter().map(|f| f.amount).sum()
    }
}

impl LedgerRow for BalanceRow {
    fn is_blank(&self) -> bool {
        self.balance.is_none() && self.deposits.is_empty() && self.withdrawals.is_empty()
    }
}

/// Row of a loan
///
/// `principal` and `interest_due` are signed like the debt itself (`<= 0`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_due: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_paid: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payments: Vec<Flow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub draws: Vec<Flow>,
}

impl LoanRow {
    pub fn paid(&self) -> f64 {
        self.payments.iter().map(|f| f.amount).sum()
    }
}

impl LedgerRow for LoanRow {
    fn is_blank(&self) -> bool {
        self.principal.is_none()
            && self.interest_due.is_none()
            && self.interest_paid.is_none()
            && self.payments.is_empty()
            && self.draws.is_empty()
    }
}

/// Date-indexed table owned by a single account
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger<R> {
    dates: Vec<Date>,
    rows: Vec<R>,
}

impl<R: LedgerRow> Ledger<R> {
    /// One blank row per date. `dates` must be strictly increasing.
    pub fn new(dates: &[Date]) -> Self {
        Self {
            dates: dates.to_vec(),
            rows: vec![R::default(); dates.len()],
        }
    }

    fn position(&self, date: Date) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    pub fn get(&self, date: Date) -> Option<&R> {
        self.position(date).map(|i| &self.rows[i])
    }

    pub(crate) fn get_mut(&mut self, date: Date) -> Option<&mut R> {
        self.position(date).map(|i| &mut self.rows[i])
    }

    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, &R)> {
        self.dates.iter().copied().zip(self.rows.iter())
    }

    /// Rows with at least one recorded value
    pub fn entries(&self) -> impl Iterator<Item = (Date, &R)> {
        self.iter().filter(|(_, row)| !row.is_blank())
    }

    /// Drop blank rows. Running it again changes nothing.
    pub fn finalize(&mut self) {
        let mut kept_dates = Vec::with_capacity(self.dates.len());
        let mut kept_rows = Vec::with_capacity(self.rows.len());
        for (date, row) in self.dates.drain(..).zip(self.rows.drain(..)) {
            if !row.is_blank() {
                kept_dates.push(date);
                kept_rows.push(row);
            }
        }
        self.dates = kept_dates;
        self.rows = kept_rows;
    }
}

impl<R: Serialize> Serialize for Ledger<R> {
    /// Serialized as a list of rows, each carrying its date
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Line<'a, R> {
            date: Date,
            #[serde(flatten)]
            row: &'a R,
        }

        serializer.collect_seq(
            self.dates
                .iter()
                .zip(self.rows.iter())
                .map(|(date, row)| Line { date: *date, row }),
        )
    }
}
