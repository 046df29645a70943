//! Schema command - print expected input formats

use crate::data::{AssetRecord, PolicyRecord, TransactionRecord};
use clap::{Args, ValueEnum};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "csv-fields")]
    format: SchemaFormat,

    /// Only print the given table
    #[arg(short, long, value_enum)]
    table: Option<Table>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for a row of each table
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Table {
    Transactions,
    Policies,
    Assets,
}

impl Table {
    const ALL: [Table; 3] = [Table::Transactions, Table::Policies, Table::Assets];

    fn name(&self) -> &'static str {
        match self {
            Table::Transactions => "transactions",
            Table::Policies => "policies",
            Table::Assets => "assets",
        }
    }

    fn fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Table::Transactions => TRANSACTION_FIELDS,
            Table::Policies => POLICY_FIELDS,
            Table::Assets => ASSET_FIELDS,
        }
    }

    fn json_schema(&self) -> schemars::schema::RootSchema {
        match self {
            Table::Transactions => schema_for!(TransactionRecord),
            Table::Policies => schema_for!(PolicyRecord),
            Table::Assets => schema_for!(AssetRecord),
        }
    }
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let tables: Vec<Table> = match self.table {
            Some(table) => vec![table],
            None => Table::ALL.to_vec(),
        };
        match self.format {
            SchemaFormat::JsonSchema => print_json_schema(&tables),
            SchemaFormat::CsvHeader => {
                print_csv_headers(&tables);
                Ok(())
            }
            SchemaFormat::CsvFields => {
                print_csv_fields(&tables);
                Ok(())
            }
        }
    }
}

fn print_json_schema(tables: &[Table]) -> anyhow::Result<()> {
    let schemas: serde_json::Map<String, serde_json::Value> = tables
        .iter()
        .map(|t| -> anyhow::Result<(String, serde_json::Value)> {
            Ok((t.name().to_string(), serde_json::to_value(t.json_schema())?))
        })
        .collect::<anyhow::Result<_>>()?;
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}

fn print_csv_headers(tables: &[Table]) {
    for table in tables {
        let columns: Vec<&str> = table.fields().iter().map(|(name, _)| *name).collect();
        if tables.len() > 1 {
            println!("# {}", table.name());
        }
        println!("{}", columns.join(","));
    }
}

fn print_csv_fields(tables: &[Table]) {
    for table in tables {
        let title = format!("{} CSV", table.name());
        println!("{}", title);
        println!("{}", "=".repeat(title.len()));
        println!();
        for (name, description) in table.fields() {
            println!("{:20} {}", name, description);
        }
        println!();
    }
    println!("All columns are required. Rates are fractions (0.22 = 22%).");
}

const TRANSACTION_FIELDS: &[(&str, &str)] = &[
    ("year", "Fiscal year (e.g., 2023)"),
    ("revenue", "Gross revenue"),
    ("operating_expense", "Operating expenses"),
    ("depreciation", "Depreciation expense deducted before tax"),
    ("scenario", "normal or tax_holiday"),
];

const POLICY_FIELDS: &[(&str, &str)] = &[
    ("year", "Fiscal year the policy applies to (one row per year)"),
    ("tax_rate", "Corporate tax rate as a fraction"),
    ("holiday_start", "First year of the tax holiday (inclusive)"),
    ("holiday_end", "Last year of the tax holiday (inclusive)"),
];

const ASSET_FIELDS: &[(&str, &str)] = &[
    ("asset_id", "Asset identifier"),
    ("category", "Asset category, groups the depreciation chart"),
    ("acquisition_value", "Cost at acquisition"),
    ("useful_life", "Useful life in years (at least 1)"),
    ("method", "straight_line or declining_balance"),
];
