//! Scenario files
//!
//! A scenario is a [`SimulationConfig`] written in YAML. Command-line flags can
//! override the horizon and the cleanup step without editing the file.

use std::fmt;
use std::path::Path;

use daybook_core::SimulationConfig;
use jiff::civil::Date;

/// Error types for scenario loading
#[derive(Debug)]
pub enum ScenarioError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io(msg) => write!(f, "IO error: {msg}"),
            ScenarioError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ScenarioError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ScenarioError {}

pub fn from_yaml(yaml: &str) -> Result<SimulationConfig, ScenarioError> {
    serde_saphyr::from_str(yaml).map_err(|e| ScenarioError::Parse(e.to_string()))
}

pub fn to_yaml(config: &SimulationConfig) -> Result<String, ScenarioError> {
    serde_saphyr::to_string(config).map_err(|e| ScenarioError::Serialize(e.to_string()))
}

pub fn load_scenario(path: &Path) -> Result<SimulationConfig, ScenarioError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ScenarioError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let config: SimulationConfig = serde_saphyr::from_str(&content)
        .map_err(|e| ScenarioError::Parse(format!("{}: {e}", path.display())))?;
    tracing::debug!(
        path = %path.display(),
        accounts = config.accounts.len(),
        transfers = config.transfers.len(),
        "loaded scenario"
    );
    Ok(config)
}

/// Command-line adjustments applied on top of a loaded scenario
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start: Option<Date>,
    pub years: Option<usize>,
    pub no_cleanup: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut SimulationConfig) {
        if let Some(start) = self.start {
            config.start_date = Some(start);
        }
        if let Some(years) = self.years {
            config.duration_years = years;
        }
        if self.no_cleanup {
            config.cleanup = false;
        }
    }
}
