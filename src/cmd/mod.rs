pub mod depreciation;
pub mod report;
pub mod schema;
pub mod tax;

use crate::data::{Dataset, DatasetPaths};
use crate::tax::PeriodWindow;
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

/// Input tables. Each defaults to the built-in sample; "-" reads that table from stdin.
#[derive(Args, Debug, Clone, Default)]
pub struct DatasetArgs {
    /// Transactions CSV (year,revenue,operating_expense,depreciation,scenario)
    #[arg(long)]
    transactions: Option<PathBuf>,

    /// Fiscal policy CSV (year,tax_rate,holiday_start,holiday_end)
    #[arg(long)]
    policies: Option<PathBuf>,

    /// Fixed assets CSV (asset_id,category,acquisition_value,useful_life,method)
    #[arg(long)]
    assets: Option<PathBuf>,
}

impl DatasetArgs {
    pub fn load(&self) -> anyhow::Result<Dataset> {
        let paths = DatasetPaths {
            transactions: self.transactions.clone(),
            policies: self.policies.clone(),
            assets: self.assets.clone(),
        };
        Dataset::load(&paths).context("failed to load input data")
    }
}

/// Years to evaluate depreciation for
#[derive(Args, Debug, Clone, Copy)]
pub struct WindowArgs {
    /// Calendar year of depreciation period 1
    #[arg(long, default_value_t = 2023)]
    first_year: i32,

    /// Number of periods to evaluate
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
    periods: u32,
}

impl Default for WindowArgs {
    fn default() -> Self {
        let window = PeriodWindow::default();
        WindowArgs {
            first_year: window.first_year,
            periods: window.periods,
        }
    }
}

impl WindowArgs {
    pub fn window(&self) -> PeriodWindow {
        PeriodWindow {
            first_year: self.first_year,
            periods: self.periods,
        }
    }
}
