use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use daybook::report::{render, render_check};
use daybook::util::io::atomic_write;
use daybook::{OutputFormat, Overrides, init_logging, load_scenario};
use daybook_core::Simulation;
use jiff::civil::Date;

#[derive(Parser, Debug)]
#[command(name = "daybook")]
#[command(about = "Day-by-day projection of accounts, loans and recurring transfers")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario and print or save the result
    Run {
        scenario: PathBuf,

        /// First grid date (YYYY-MM-DD); overrides the scenario
        #[arg(long)]
        start: Option<Date>,

        /// Horizon in 365-day years; overrides the scenario
        #[arg(long)]
        years: Option<usize>,

        /// Keep empty ledger rows
        #[arg(long)]
        no_cleanup: bool,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a scenario without running it
    Check { scenario: PathBuf },
}

fn run(
    scenario: &Path,
    overrides: &Overrides,
    format: OutputFormat,
    output: Option<&Path>,
) -> color_eyre::Result<()> {
    let mut config = load_scenario(scenario)?;
    overrides.apply(&mut config);

    let grid = config
        .date_grid()
        .wrap_err_with(|| format!("invalid horizon in {}", scenario.display()))?;
    let mut simulation = Simulation::from_config(&config)
        .wrap_err_with(|| format!("invalid scenario {}", scenario.display()))?;
    simulation.run(&grid).wrap_err("simulation failed")?;
    let result = simulation
        .result()
        .ok_or_else(|| color_eyre::eyre::eyre!("simulation produced no result"))?;

    let report = render(&result, format)?;
    match output {
        Some(path) => {
            atomic_write(path, &report)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => print!("{report}"),
    }
    Ok(())
}

fn check(scenario: &Path) -> color_eyre::Result<()> {
    let config = load_scenario(scenario)?;
    let simulation = Simulation::from_config(&config)
        .wrap_err_with(|| format!("invalid scenario {}", scenario.display()))?;
    print!("{}", render_check(&simulation));
    println!("{} ok", scenario.display());
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    match args.command {
        Command::Run {
            scenario,
            start,
            years,
            no_cleanup,
            format,
            output,
        } => {
            let overrides = Overrides {
                start,
                years,
                no_cleanup,
            };
            run(&scenario, &overrides, format, output.as_deref())
        }
        Command::Check { scenario } => check(&scenario),
    }
}
