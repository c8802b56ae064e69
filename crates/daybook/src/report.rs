//! Rendering simulation results and scenario summaries

use std::fmt::Write as _;

use clap::ValueEnum;
use daybook_core::model::{AccountFlavor, AccountReport};
use daybook_core::{Simulation, SimulationResult};

use crate::util::format::{format_currency, format_rate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary table
    #[default]
    Text,
    /// Full result with ledgers and journal
    Json,
    Yaml,
}

pub fn render(result: &SimulationResult, format: OutputFormat) -> color_eyre::Result<String> {
    Ok(match format {
        OutputFormat::Text => render_text(result),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_saphyr::to_string(result)
            .map_err(|e| color_eyre::eyre::eyre!("failed to serialize result: {e}"))?,
    })
}

fn flavor_label(flavor: AccountFlavor) -> &'static str {
    match flavor {
        AccountFlavor::Plain => "plain",
        AccountFlavor::Savings { .. } => "savings",
        AccountFlavor::Loan { .. } => "loan",
    }
}

fn account_line(account: &AccountReport) -> String {
    let paid_off = account
        .paid_off
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<20} {:<8} {:>11} {:>18} {:>6}  {}",
        account.name,
        flavor_label(account.flavor),
        format_rate(account.periodic_rate),
        format_currency(account.final_value().unwrap_or_default()),
        account.ledger.len(),
        paid_off,
    )
}

pub fn render_text(result: &SimulationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Simulation {} .. {}", result.start_date, result.end_date);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<20} {:<8} {:>11} {:>18} {:>6}  {}",
        "Account", "Type", "Rate", "Final value", "Rows", "Paid off"
    );
    for account in &result.accounts {
        let _ = writeln!(out, "{}", account_line(account));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Net worth: {}", format_currency(result.net_worth()));
    let _ = writeln!(
        out,
        "Journal: {} entries ({} compounding, {} transfers)",
        result.journal.len(),
        result.compounding_entries().count(),
        result.transfer_entries().count(),
    );
    out
}

/// What `daybook check` prints for a valid scenario
pub fn render_check(simulation: &Simulation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} accounts", simulation.accounts().len());
    for account in simulation.accounts() {
        let rule = account.compounding();
        let _ = writeln!(
            out,
            "  {:<20} {:<8} opening {}, {} per period, compounding {} ({}x/year)",
            account.name(),
            flavor_label(account.flavor()),
            format_currency(account.initial_balance()),
            format_rate(account.periodic_rate()),
            rule,
            rule.periods_per_year(),
        );
    }
    let external = simulation
        .transfers()
        .iter()
        .filter(|t| t.from().is_external() || t.to().is_external())
        .count();
    let _ = writeln!(
        out,
        "{} transfers, {} touching external labels",
        simulation.transfers().len(),
        external
    );
    for transfer in simulation.transfers() {
        let from = transfer.from().label(simulation.accounts()).unwrap_or("?");
        let to = transfer.to().label(simulation.accounts()).unwrap_or("?");
        let _ = writeln!(
            out,
            "  {} -> {}: {} on {}",
            from,
            to,
            format_currency(transfer.amount()),
            transfer.schedule(),
        );
    }
    out
}
