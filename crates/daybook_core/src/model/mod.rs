mod accounts;
mod ids;
mod journal;
mod ledger;
mod results;
mod transfers;

pub use accounts::{Account, AccountFlavor, AccountLedger};
pub use ids::{AccountId, TransferId};
pub use journal::{Journal, JournalEntry, StateEvent};
pub use ledger::{BalanceRow, Flow, Ledger, LedgerRow, LoanRow};
pub use results::{AccountReport, SimulationResult};
pub use transfers::{Endpoint, Transfer};
