//! Tax command - standard rate vs tax holiday per transaction

use crate::cmd::DatasetArgs;
use crate::data::{Scenario, Warning};
use crate::tax::{calculate_tax, TaxRecord, TaxReport};
use crate::utils::{format_amount, format_rate, round_amount, write_csv};
use rust_decimal::Decimal;
use clap::Args;
use serde::Serialize;
use std::io;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TaxCommand {
    #[command(flatten)]
    data: DatasetArgs,

    /// Only show records for this year
    #[arg(short, long)]
    year: Option<i32>,

    /// Output as JSON instead of formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

/// Row for the tax table output
#[derive(Debug, Clone, Tabled)]
struct TaxRow {
    #[tabled(rename = "Year")]
    year: i32,

    #[tabled(rename = "Scenario")]
    scenario: String,

    #[tabled(rename = "Taxable Profit")]
    taxable_profit: String,

    #[tabled(rename = "Rate")]
    rate: String,

    #[tabled(rename = "Exempt")]
    exempt: String,

    #[tabled(rename = "Tax")]
    tax: String,
}

impl From<&TaxRecord> for TaxRow {
    fn from(record: &TaxRecord) -> Self {
        TaxRow {
            year: record.year,
            scenario: record.scenario.to_string(),
            taxable_profit: format_amount(record.taxable_profit),
            rate: format_rate(record.tax_rate),
            exempt: if record.exempt { "yes" } else { "no" }.to_string(),
            tax: format_amount(record.tax_amount),
        }
    }
}

#[derive(Debug, Serialize)]
struct TaxOutput<'a> {
    fingerprint: &'a str,
    records: Vec<&'a TaxRecord>,
    total_normal: String,
    total_tax_holiday: String,
    warnings: &'a [Warning],
}

impl TaxCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let dataset = self.data.load()?;
        let report = calculate_tax(&dataset.transactions, &dataset.policies);
        let report = filter_year(report, self.year);

        if self.json {
            let output = TaxOutput {
                fingerprint: dataset.fingerprint(),
                records: report.records.iter().collect(),
                total_normal: json_total(report.total(Scenario::Normal)),
                total_tax_holiday: json_total(report.total(Scenario::TaxHoliday)),
                warnings: &report.warnings,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if self.csv {
            write_csv(&report.records, io::stdout())?;
        } else {
            print_table(&report);
        }
        Ok(())
    }
}

/// Plain two-decimal total, no separators
fn json_total(amount: Decimal) -> String {
    format!("{:.2}", round_amount(amount))
}

fn filter_year(report: TaxReport, year: Option<i32>) -> TaxReport {
    let Some(year) = year else {
        return report;
    };
    TaxReport {
        records: report.records.into_iter().filter(|r| r.year == year).collect(),
        warnings: report
            .warnings
            .into_iter()
            .filter(|w| match w {
                Warning::MissingPolicy { year: y, .. } => *y == year,
            })
            .collect(),
    }
}

fn print_table(report: &TaxReport) {
    println!();
    println!("TAX COMPARISON");
    println!();

    if report.records.is_empty() {
        println!("No tax records");
    } else {
        let rows: Vec<TaxRow> = report.records.iter().map(TaxRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
    println!();

    println!(
        "Total tax (normal): {} | (tax_holiday): {}",
        format_amount(report.total(Scenario::Normal)),
        format_amount(report.total(Scenario::TaxHoliday))
    );
    for (year, saving) in report.savings_by_year() {
        println!("  Holiday saving {}: {}", year, format_amount(saving));
    }

    if !report.warnings.is_empty() {
        println!();
        for warning in &report.warnings {
            println!("\u{26A0} {}", warning);
        }
    }
    println!();
}
