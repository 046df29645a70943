//! Depreciation command - straight-line vs declining-balance schedules

use crate::cmd::{DatasetArgs, WindowArgs};
use crate::tax::{calculate_depreciation, DepreciationRecord};
use crate::utils::{format_amount, write_csv};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct DepreciationCommand {
    #[command(flatten)]
    data: DatasetArgs,

    #[command(flatten)]
    window: WindowArgs,

    /// Filter by asset category (case-insensitive)
    #[arg(short, long)]
    category: Option<String>,

    /// Output as JSON instead of formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

#[derive(Debug, Clone, Tabled)]
struct DepreciationRow {
    #[tabled(rename = "Asset")]
    asset_id: String,

    #[tabled(rename = "Category")]
    category: String,

    #[tabled(rename = "Method")]
    method: String,

    #[tabled(rename = "Year")]
    year: i32,

    #[tabled(rename = "Period")]
    period: u32,

    #[tabled(rename = "Book Value")]
    book_value: String,

    #[tabled(rename = "Depreciation")]
    depreciation: String,
}

impl From<&DepreciationRecord> for DepreciationRow {
    fn from(record: &DepreciationRecord) -> Self {
        DepreciationRow {
            asset_id: record.asset_id.clone(),
            category: record.category.clone(),
            method: record.method.display().to_string(),
            year: record.year,
            period: record.period,
            book_value: format_amount(record.book_value),
            depreciation: format_amount(record.depreciation_amount),
        }
    }
}

#[derive(Debug, Serialize)]
struct DepreciationOutput<'a> {
    fingerprint: &'a str,
    first_year: i32,
    periods: u32,
    records: &'a [DepreciationRecord],
}

impl DepreciationCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let dataset = self.data.load()?;
        let window = self.window.window();
        let mut records = calculate_depreciation(&dataset.assets, window)?;

        if let Some(ref category) = self.category {
            records.retain(|r| r.category.eq_ignore_ascii_case(category));
        }

        if self.json {
            let output = DepreciationOutput {
                fingerprint: dataset.fingerprint(),
                first_year: window.first_year,
                periods: window.periods,
                records: &records,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if self.csv {
            write_csv(&records, io::stdout())?;
        } else {
            print_table(&records);
        }
        Ok(())
    }
}

fn print_table(records: &[DepreciationRecord]) {
    println!();
    println!("ASSET DEPRECIATION");
    println!();

    if records.is_empty() {
        println!("No depreciation records");
        println!();
        return;
    }

    let rows: Vec<DepreciationRow> = records.iter().map(DepreciationRow::from).collect();
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
    println!();

    let mut by_year: BTreeMap<i32, Decimal> = BTreeMap::new();
    for record in records {
        *by_year.entry(record.year).or_default() += record.depreciation_amount;
    }
    for (year, total) in by_year {
        println!("Total {}: {}", year, format_amount(total));
    }
    println!();
}
