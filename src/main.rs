use clap::{Parser, Subcommand};

mod chart;
mod cmd;
mod data;
mod tax;
mod utils;

use cmd::depreciation::DepreciationCommand;
use cmd::report::ChartCommand;
use cmd::schema::SchemaCommand;
use cmd::tax::TaxCommand;

/// Compare corporate tax under the standard rate and a tax holiday,
/// and asset depreciation under straight-line and declining-balance methods.
#[derive(Parser, Debug)]
#[command(name = "fiscalc", version, about)]
struct Opts {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tax per transaction under each fiscal scenario
    Tax(TaxCommand),
    /// Depreciation schedule per asset
    Depreciation(DepreciationCommand),
    /// Render both comparison charts as an HTML report (default)
    Chart(ChartCommand),
    /// Print the expected input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let command = opts
        .command
        .unwrap_or_else(|| Command::Chart(ChartCommand::default()));

    match command {
        Command::Tax(tax) => tax.exec(),
        Command::Depreciation(depreciation) => depreciation.exec(),
        Command::Chart(chart) => chart.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
