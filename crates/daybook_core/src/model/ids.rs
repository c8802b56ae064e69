//! Identifiers for simulation entities
//!
//! Accounts are referenced by name in configuration; inside the engine the name
//! is resolved once to a compact id so transfers never repeat the lookup.

use serde::{Deserialize, Serialize};

/// Position of an account in its simulation's registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(pub u16);

/// Position of a transfer in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransferId(pub u16);

impl AccountId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TransferId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
