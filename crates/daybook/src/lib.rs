//! Command-line front end for the daybook simulation engine
//!
//! Loads YAML scenarios, runs them over a daily grid and renders the results.

pub mod logging;
pub mod report;
pub mod scenario;
pub mod util;

pub use logging::init_logging;
pub use report::OutputFormat;
pub use scenario::{Overrides, load_scenario};
