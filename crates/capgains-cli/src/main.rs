mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::capital_gains::{BondArgs, CapitalGainsArgs, CiiArgs, HoldingPeriodArgs};

/// Real-estate capital-gains tax and exemption planning
#[derive(Parser)]
#[command(
    name = "cgt",
    version,
    about = "Real-estate capital-gains tax and exemption planning",
    long_about = "A CLI for computing capital-gains tax on a property sale with decimal \
                  precision. Classifies the holding period, indexes costs with the CII, \
                  compares tax regimes and projects 54/54EC/54F reinvestment strategies."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Tax policy file (JSON or YAML) overriding the built-in rates and CII table
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Increase log verbosity on stderr
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute tax, regime choice and exemption strategies for a sale
    CapitalGains(CapitalGainsArgs),
    /// Look up the cost inflation index for a date
    Cii(CiiArgs),
    /// Classify a holding period as short or long term
    HoldingPeriod(HoldingPeriodArgs),
    /// Project a 54EC bond investment against a fixed-deposit baseline
    BondProjection(BondArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy = match cli.policy.as_deref().map(input::file::read_policy).transpose() {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let policy = policy.as_ref();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::CapitalGains(args) => commands::capital_gains::run_capital_gains(args, policy),
        Commands::Cii(args) => commands::capital_gains::run_cii(args, policy),
        Commands::HoldingPeriod(args) => commands::capital_gains::run_holding_period(args, policy),
        Commands::BondProjection(args) => {
            commands::capital_gains::run_bond_projection(args, policy)
        }
        Commands::Version => {
            println!("cgt {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
