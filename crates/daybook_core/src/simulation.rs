//! The simulation clock
//!
//! A [`Simulation`] owns the account registry and the ordered transfer list. Each
//! run walks a caller-supplied date grid; on every date all accounts update
//! first, then every transfer in registration order.

use jiff::civil::Date;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::SimulationConfig;
use crate::date_math::first_non_ascending;
use crate::date_rule::DateRule;
use crate::error::{ConfigurationError, RunError, SimulationError};
use crate::model::{
    Account, AccountId, AccountReport, Endpoint, Journal, SimulationResult, Transfer, TransferId,
};

#[derive(Debug, Clone)]
pub struct Simulation {
    accounts: Vec<Account>,
    names: FxHashMap<String, AccountId>,
    transfers: Vec<Transfer>,
    /// Labels transfers may use that are not accounts. Empty means any unknown
    /// name is accepted as an external label.
    externals: FxHashSet<String>,
    journal: Journal,
    dates: Vec<Date>,
    cleanup: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            names: FxHashMap::default(),
            transfers: Vec::new(),
            externals: FxHashSet::default(),
            journal: Journal::default(),
            dates: Vec::new(),
            cleanup: true,
        }
    }

    /// Build a simulation from a scenario description
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigurationError> {
        let mut sim = Self::new()
            .with_cleanup(config.cleanup)
            .with_journal(config.collect_journal);

        for label in &config.external {
            sim.declare_external(label.clone());
        }
        for account in &config.accounts {
            sim.add_account(account.build()?)?;
        }
        for transfer in &config.transfers {
            let mut built = Transfer::new(
                sim.resolve(&transfer.from)?,
                sim.resolve(&transfer.to)?,
                transfer.amount,
                transfer.interval,
            )?;
            if let Some(name) = &transfer.name {
                built = built.named(name.clone());
            }
            sim.push_transfer(built)?;
        }
        Ok(sim)
    }

    /// Skip trimming empty ledger rows at the end of a run
    #[must_use]
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Keep journal entries in memory (they are always traced)
    #[must_use]
    pub fn with_journal(mut self, collect: bool) -> Self {
        self.journal = Journal::new(collect);
        self
    }

    pub fn add_account(&mut self, account: Account) -> Result<AccountId, ConfigurationError> {
        if self.names.contains_key(account.name()) {
            return Err(ConfigurationError::DuplicateAccount(
                account.name().to_string(),
            ));
        }
        if self
            .transfers
            .iter()
            .any(|t| t.source(&self.accounts).is_ok_and(|s| s == account.name()))
        {
            return Err(ConfigurationError::SourceClash(account.name().to_string()));
        }
        let id = AccountId(
            u16::try_from(self.accounts.len())
                .map_err(|_| ConfigurationError::TooMany("accounts"))?,
        );
        self.names.insert(account.name().to_string(), id);
        self.accounts.push(account);
        Ok(id)
    }

    /// Allow `label` as a transfer endpoint. Declaring any label makes
    /// endpoint resolution strict.
    pub fn declare_external(&mut self, label: impl Into<String>) {
        self.externals.insert(label.into());
    }

    /// Resolve a transfer endpoint by name. Accounts win over external labels.
    pub fn resolve(&self, name: &str) -> Result<Endpoint, ConfigurationError> {
        if let Some(id) = self.names.get(name) {
            return Ok(Endpoint::Account(*id));
        }
        if !self.externals.is_empty() && !self.externals.contains(name) {
            return Err(ConfigurationError::UnknownEndpoint(name.to_string()));
        }
        Ok(Endpoint::External(name.to_string()))
    }

    /// Register a transfer between named endpoints
    pub fn add_transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
        schedule: DateRule,
    ) -> Result<TransferId, ConfigurationError> {
        let transfer = Transfer::new(self.resolve(from)?, self.resolve(to)?, amount, schedule)?;
        self.push_transfer(transfer)
    }

    /// Register an already-built transfer; account ids must belong to this simulation
    /// and its journal source must not be an account name
    pub fn push_transfer(&mut self, transfer: Transfer) -> Result<TransferId, ConfigurationError> {
        for endpoint in [transfer.from(), transfer.to()] {
            if let Endpoint::Account(id) = endpoint
                && id.index() >= self.accounts.len()
            {
                return Err(ConfigurationError::UnknownEndpoint(format!("{id:?}")));
            }
        }
        let source = transfer
            .source(&self.accounts)
            .map_err(|e| ConfigurationError::UnknownEndpoint(e.to_string()))?;
        if self.names.contains_key(&source) {
            return Err(ConfigurationError::SourceClash(source));
        }
        let id = TransferId(
            u16::try_from(self.transfers.len())
                .map_err(|_| ConfigurationError::TooMany("transfers"))?,
        );
        self.transfers.push(transfer);
        Ok(id)
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.names.get(name).and_then(|id| self.account_by_id(*id))
    }

    pub fn account_by_id(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(id.index())
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Grid of the last completed run
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Run the whole grid. The grid is checked before any account is touched.
    pub fn run(&mut self, dates: &[Date]) -> Result<(), RunError> {
        let (Some(&start), Some(&end)) = (dates.first(), dates.last()) else {
            return Err(RunError::EmptyDateGrid);
        };
        if let Some((previous, next)) = first_non_ascending(dates) {
            return Err(RunError::DatesNotAscending { previous, next });
        }

        tracing::info!(
            accounts = self.accounts.len(),
            transfers = self.transfers.len(),
            %start,
            %end,
            days = dates.len(),
            "starting simulation"
        );

        self.dates.clear();
        self.journal.clear();
        for account in &mut self.accounts {
            account.init(dates)?;
        }
        for &date in dates {
            self.step(date)?;
        }
        if self.cleanup {
            self.finalize();
        }
        self.dates = dates.to_vec();

        tracing::info!(events = self.journal.len(), "simulation finished");
        Ok(())
    }

    /// One clock tick: every account, then every transfer.
    ///
    /// Accounts must have been initialised over a grid containing `date`.
    pub fn step(&mut self, date: Date) -> Result<(), RunError> {
        for account in &mut self.accounts {
            account.update(date, &mut self.journal)?;
        }
        for transfer in &self.transfers {
            transfer.update(date, &mut self.accounts, &mut self.journal)?;
        }
        Ok(())
    }

    /// Drop empty ledger rows on every account
    pub fn finalize(&mut self) {
        for account in &mut self.accounts {
            account.finalize();
        }
    }

    /// Snapshot of the last run, `None` before any run completed
    pub fn result(&self) -> Option<SimulationResult> {
        let (&start_date, &end_date) = (self.dates.first()?, self.dates.last()?);
        Some(SimulationResult {
            start_date,
            end_date,
            accounts: self
                .accounts
                .iter()
                .filter_map(AccountReport::from_account)
                .collect(),
            journal: self.journal.entries().to_vec(),
        })
    }
}

/// Build and run a scenario over `dates`
pub fn simulate(
    config: &SimulationConfig,
    dates: &[Date],
) -> Result<SimulationResult, SimulationError> {
    let mut sim = Simulation::from_config(config)?;
    sim.run(dates)?;
    sim.result()
        .ok_or(SimulationError::Run(RunError::EmptyDateGrid))
}

/// Run a scenario over its own daily grid (`start_date`, `duration_years`)
pub fn simulate_daily(config: &SimulationConfig) -> Result<SimulationResult, SimulationError> {
    simulate(config, &config.date_grid()?)
}
