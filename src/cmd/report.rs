//! Chart report generation
//!
//! Generates a self-contained HTML file with both comparison charts as inline SVG.

use crate::chart::{escape_xml, group_depreciation_by_category, group_tax_by_scenario, render_svg};
use crate::cmd::{DatasetArgs, WindowArgs};
use crate::data::{Scenario, Warning};
use crate::tax::{calculate_depreciation, calculate_tax, DepreciationRecord, TaxReport};
use crate::utils::{format_amount, format_rate};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct ChartCommand {
    #[command(flatten)]
    data: DatasetArgs,

    #[command(flatten)]
    window: WindowArgs,

    /// Output file path (default: temp file opened in the browser)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the report without launching a browser
    #[arg(long)]
    no_open: bool,
}

impl ChartCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let dataset = self.data.load()?;
        let tax_report = calculate_tax(&dataset.transactions, &dataset.policies);
        let depreciation = calculate_depreciation(&dataset.assets, self.window.window())?;

        let html = generate(&tax_report, &depreciation, dataset.fingerprint());

        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)
                .with_context(|| format!("failed to write chart report to {}", output_path.display()))?;
            log::info!("Wrote {} bytes", html.len());
            println!("Chart report written to: {}", output_path.display());
        } else {
            let temp_path = std::env::temp_dir().join("fiscalc-report.html");
            std::fs::write(&temp_path, &html)
                .with_context(|| format!("failed to write chart report to {}", temp_path.display()))?;
            if self.no_open {
                println!("Chart report written to: {}", temp_path.display());
            } else {
                opener::open(&temp_path)
                    .with_context(|| format!("failed to open {} in a browser", temp_path.display()))?;
                println!("Opened chart report in browser: {}", temp_path.display());
            }
        }

        Ok(())
    }
}

/// Generate the HTML report content
pub fn generate(tax_report: &TaxReport, depreciation: &[DepreciationRecord], fingerprint: &str) -> String {
    let tax_svg = render_svg(&group_tax_by_scenario(&tax_report.records));
    let depreciation_svg = render_svg(&group_depreciation_by_category(depreciation));
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Tax and Depreciation Report</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>Tax and Depreciation Report</h1>
        <p class="subtitle">Fiscal years: {years}</p>
    </header>
    <main>
        <section class="summary-cards">
            <div class="card">
                <h3>Tax (normal)</h3>
                <p class="value">{total_normal}</p>
            </div>
            <div class="card">
                <h3>Tax (tax_holiday)</h3>
                <p class="value">{total_holiday}</p>
            </div>
            <div class="card">
                <h3>Depreciation</h3>
                <p class="value">{total_depreciation}</p>
            </div>
        </section>
{warnings}
        <section class="chart">
{tax_svg}
        </section>
        <section class="table">
            <table>
                <thead><tr><th>Year</th><th>Scenario</th><th>Taxable Profit</th><th>Rate</th><th>Tax</th></tr></thead>
                <tbody>
{tax_rows}
                </tbody>
            </table>
        </section>
        <section class="chart">
{depreciation_svg}
        </section>
        <section class="table">
            <table>
                <thead><tr><th>Asset</th><th>Category</th><th>Method</th><th>Year</th><th>Book Value</th><th>Depreciation</th></tr></thead>
                <tbody>
{depreciation_rows}
                </tbody>
            </table>
        </section>
    </main>
    <footer>
        Generated {generated} &middot; input sha256 <code>{fingerprint}</code>
    </footer>
</body>
</html>
"##,
        css = CSS,
        years = format_years(&tax_report.years()),
        total_normal = format_amount(tax_report.total(Scenario::Normal)),
        total_holiday = format_amount(tax_report.total(Scenario::TaxHoliday)),
        total_depreciation = format_amount(depreciation.iter().map(|r| r.depreciation_amount).sum()),
        warnings = render_warnings(&tax_report.warnings),
        tax_svg = tax_svg,
        tax_rows = render_tax_rows(tax_report),
        depreciation_svg = depreciation_svg,
        depreciation_rows = render_depreciation_rows(depreciation),
        generated = generated,
        fingerprint = fingerprint,
    )
}

fn format_years(years: &[i32]) -> String {
    if years.is_empty() {
        return "none".to_string();
    }
    years.iter().map(|y| y.to_string()).collect::<Vec<_>>().join(", ")
}

fn render_tax_rows(report: &TaxReport) -> String {
    report
        .records
        .iter()
        .map(|r| {
            format!(
                "                    <tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                r.year,
                r.scenario,
                format_amount(r.taxable_profit),
                format_rate(r.tax_rate),
                format_amount(r.tax_amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_depreciation_rows(records: &[DepreciationRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "                    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                escape_xml(&r.asset_id),
                escape_xml(&r.category),
                r.method.display(),
                r.year,
                format_amount(r.book_value),
                format_amount(r.depreciation_amount)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_warnings(warnings: &[Warning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let items: Vec<String> = warnings
        .iter()
        .map(|w| format!("                <li>{}</li>", escape_xml(&w.to_string())))
        .collect();
    format!(
        "        <section class=\"warnings\">\n            <ul>\n{}\n            </ul>\n        </section>",
        items.join("\n")
    )
}

const CSS: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; color: #333; line-height: 1.5; }
header { background: #2c3e50; color: white; padding: 1.5rem 2rem; }
header h1 { font-size: 1.5rem; font-weight: 500; }
header .subtitle { font-size: 0.9rem; opacity: 0.8; }
main { padding: 2rem; max-width: 1100px; margin: 0 auto; }
.summary-cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1rem; margin-bottom: 2rem; }
.card { background: white; border-radius: 8px; padding: 1.25rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.card h3 { font-size: 0.85rem; color: #666; font-weight: 500; margin-bottom: 0.5rem; }
.card .value { font-size: 1.4rem; font-weight: 600; }
.warnings { background: #fff3cd; border: 1px solid #ffe69c; border-radius: 8px; padding: 1rem 1.5rem; margin-bottom: 2rem; }
.warnings ul { list-style: none; }
.chart { background: white; border-radius: 8px; padding: 1rem; margin-bottom: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.chart svg { width: 100%; height: auto; }
.table { margin-bottom: 2.5rem; }
table { width: 100%; border-collapse: collapse; background: white; border-radius: 8px; overflow: hidden; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
th { background: #f8f9fa; text-align: left; padding: 0.6rem 1rem; font-size: 0.8rem; color: #555; border-bottom: 2px solid #dee2e6; }
td { padding: 0.5rem 1rem; border-bottom: 1px solid #eee; font-size: 0.9rem; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
footer { text-align: center; color: #888; font-size: 0.8rem; padding: 1rem 2rem 2rem; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Dataset;
    use crate::tax::PeriodWindow;

    fn sample_report() -> String {
        let dataset = Dataset::sample().unwrap();
        let tax_report = calculate_tax(&dataset.transactions, &dataset.policies);
        let depreciation = calculate_depreciation(&dataset.assets, PeriodWindow::default()).unwrap();
        generate(&tax_report, &depreciation, dataset.fingerprint())
    }

    #[test]
    fn report_embeds_both_charts() {
        let html = sample_report();
        assert_eq!(html.matches("<svg").count(), 2);
        assert!(html.contains("Tax Comparison: Standard Rate vs Tax Holiday"));
        assert!(html.contains("Asset Depreciation: Straight-Line vs Declining-Balance"));
        assert!(html.contains("2023 (tax_holiday)"));
        assert!(html.contains("2024 (Kendaraan Operasional)"));
    }

    #[test]
    fn report_tables_and_totals() {
        let html = sample_report();
        assert!(html.contains("127,600,000.00"));
        assert!(html.contains("37,500,000.00"));
        assert!(html.contains("Declining-Balance"));
        assert!(!html.contains("class=\"warnings\""));
        assert!(html.contains("Fiscal years: 2023, 2024"));
    }

    #[test]
    fn report_lists_warnings() {
        let mut tax_report = TaxReport::default();
        tax_report.warnings.push(Warning::MissingPolicy {
            year: 2030,
            scenario: Scenario::Normal,
        });
        let html = generate(&tax_report, &[], "abc");
        assert!(html.contains("class=\"warnings\""));
        assert!(html.contains("No fiscal policy for 2030"));
        assert!(html.contains("<code>abc</code>"));
    }
}
