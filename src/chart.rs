//! Grouped bar charts rendered as standalone SVG

use crate::tax::{DepreciationRecord, TaxRecord};
use crate::utils::format_compact;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 540.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 130.0;
const TICK_TARGET: f64 = 5.0;

const PALETTE: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: Decimal,
}

/// Bars sharing a legend entry and colour
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl BarChart {
    pub fn bar_count(&self) -> usize {
        self.series.iter().map(|s| s.bars.len()).sum()
    }
}

/// Tax per year, one series per scenario
pub fn group_tax_by_scenario(records: &[TaxRecord]) -> BarChart {
    BarChart {
        title: "Tax Comparison: Standard Rate vs Tax Holiday".to_string(),
        x_label: "Year (Scenario)".to_string(),
        y_label: "Tax".to_string(),
        series: group_by(
            records,
            |r| r.scenario.to_string(),
            |r| r.year,
            |r| r.tax_amount,
        ),
    }
}

/// Depreciation per year, one series per asset category
pub fn group_depreciation_by_category(records: &[DepreciationRecord]) -> BarChart {
    BarChart {
        title: "Asset Depreciation: Straight-Line vs Declining-Balance".to_string(),
        x_label: "Year (Asset Category)".to_string(),
        y_label: "Depreciation".to_string(),
        series: group_by(
            records,
            |r| r.category.clone(),
            |r| r.year,
            |r| r.depreciation_amount,
        ),
    }
}

/// Series in first-seen group order; bars keep record order within a group
fn group_by<T>(
    records: &[T],
    group: impl Fn(&T) -> String,
    year: impl Fn(&T) -> i32,
    value: impl Fn(&T) -> Decimal,
) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for record in records {
        let name = group(record);
        let bar = Bar {
            label: format!("{} ({})", year(record), name),
            value: value(record),
        };
        match series.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.bars.push(bar),
            None => series.push(Series {
                name,
                bars: vec![bar],
            }),
        }
    }
    series
}

/// Render the chart as a self-contained `<svg>` element
pub fn render_svg(chart: &BarChart) -> String {
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let values: Vec<f64> = chart
        .series
        .iter()
        .flat_map(|s| s.bars.iter().map(|b| to_f64(b.value)))
        .collect();
    let (lo, hi, step) = axis_range(&values);
    let y_of = |v: f64| MARGIN_TOP + plot_h * (hi - v) / (hi - lo);

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" font-family="sans-serif" font-size="12">"#
    ));
    svg.push('\n');
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"#ffffff\"/>\n"
    ));
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"30\" text-anchor=\"middle\" font-size=\"18\" font-weight=\"bold\">{}</text>\n",
        WIDTH / 2.0,
        escape_xml(&chart.title)
    ));

    // gridlines and y ticks
    let mut tick = lo;
    while tick <= hi + step / 2.0 {
        let y = y_of(tick);
        svg.push_str(&format!(
            "<line x1=\"{MARGIN_LEFT}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#e0e0e0\"/>\n",
            MARGIN_LEFT + plot_w
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>\n",
            MARGIN_LEFT - 8.0,
            y + 4.0,
            format_compact(tick)
        ));
        tick += step;
    }

    let total = chart.bar_count();
    if total > 0 {
        let slot = plot_w / total as f64;
        let bar_w = slot * 0.7;
        let zero_y = y_of(0.0);
        let mut index = 0usize;
        for (series_idx, series) in chart.series.iter().enumerate() {
            let colour = PALETTE[series_idx % PALETTE.len()];
            for bar in &series.bars {
                let v = to_f64(bar.value);
                let x = MARGIN_LEFT + slot * index as f64 + (slot - bar_w) / 2.0;
                let top = y_of(v.max(0.0));
                let height = (y_of(v.min(0.0)) - top).max(0.0);
                svg.push_str(&format!(
                    "<rect x=\"{x:.1}\" y=\"{top:.1}\" width=\"{bar_w:.1}\" height=\"{height:.1}\" fill=\"{colour}\" fill-opacity=\"0.75\"><title>{}: {}</title></rect>\n",
                    escape_xml(&bar.label),
                    bar.value
                ));
                let label_x = x + bar_w / 2.0;
                let label_y = MARGIN_TOP + plot_h + 14.0;
                svg.push_str(&format!(
                    "<text x=\"{label_x:.1}\" y=\"{label_y:.1}\" text-anchor=\"end\" transform=\"rotate(-35 {label_x:.1} {label_y:.1})\">{}</text>\n",
                    escape_xml(&bar.label)
                ));
                index += 1;
            }
        }
        svg.push_str(&format!(
            "<line x1=\"{MARGIN_LEFT}\" y1=\"{zero_y:.1}\" x2=\"{:.1}\" y2=\"{zero_y:.1}\" stroke=\"#333333\"/>\n",
            MARGIN_LEFT + plot_w
        ));
    }

    svg.push_str(&format!(
        "<line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{:.1}\" stroke=\"#333333\"/>\n",
        MARGIN_TOP + plot_h
    ));

    // axis titles
    svg.push_str(&format!(
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"14\">{}</text>\n",
        MARGIN_LEFT + plot_w / 2.0,
        HEIGHT - 12.0,
        escape_xml(&chart.x_label)
    ));
    let y_mid = MARGIN_TOP + plot_h / 2.0;
    svg.push_str(&format!(
        "<text x=\"20\" y=\"{y_mid:.1}\" text-anchor=\"middle\" font-size=\"14\" transform=\"rotate(-90 20 {y_mid:.1})\">{}</text>\n",
        escape_xml(&chart.y_label)
    ));

    // legend, top right
    for (i, series) in chart.series.iter().enumerate() {
        let colour = PALETTE[i % PALETTE.len()];
        let y = MARGIN_TOP + 8.0 + 20.0 * i as f64;
        let x = WIDTH - MARGIN_RIGHT - 200.0;
        svg.push_str(&format!(
            "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"14\" height=\"14\" fill=\"{colour}\" fill-opacity=\"0.75\"/>\n"
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\">{}</text>\n",
            x + 20.0,
            y + 11.0,
            escape_xml(&series.name)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Axis bounds that include zero and land on a round tick step
fn axis_range(values: &[f64]) -> (f64, f64, f64) {
    let min = values.iter().copied().fold(0.0_f64, f64::min);
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    let span = if max - min > 0.0 { max - min } else { 1.0 };
    let step = nice_step(span / TICK_TARGET);
    let lo = (min / step).floor() * step;
    let mut hi = (max / step).ceil() * step;
    if hi <= lo {
        hi = lo + step;
    }
    (lo, hi, step)
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
