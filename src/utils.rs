use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: serde::Serialize,
    W: std::io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Amount rounded half away from zero to cents
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two decimal places with thousands separators, e.g. `-1,234,567.80`
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_amount(amount);
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Fractional rate as a percentage, e.g. `0.22` -> `22%`
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).normalize())
}

/// Compact axis label, e.g. `75000000` -> `75M`
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e9 {
        (value / 1e9, "B")
    } else if abs >= 1e6 {
        (value / 1e6, "M")
    } else if abs >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    let text = format!("{scaled:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(dec!(55000000)), "55,000,000.00");
        assert_eq!(format_amount(dec!(127600000.5)), "127,600,000.50");
        assert_eq!(format_amount(dec!(999)), "999.00");
        assert_eq!(format_amount(dec!(1000)), "1,000.00");
        assert_eq!(format_amount(dec!(-22)), "-22.00");
        assert_eq!(format_amount(Decimal::ZERO), "0.00");
    }

    #[test]
    fn format_amount_rounds_to_cents() {
        assert_eq!(format_amount(dec!(99.99) * dec!(0.175)), "17.50");
        assert_eq!(format_amount(dec!(17.49825)), "17.50");
        assert_eq!(format_amount(dec!(0.999)), "1.00");
        assert_eq!(format_amount(dec!(999.995)), "1,000.00");
        assert_eq!(format_amount(dec!(0.125)), "0.13");
        assert_eq!(format_amount(dec!(-1.005)), "-1.01");
    }

    #[test]
    fn format_amount_drops_sign_when_rounded_to_zero() {
        assert_eq!(format_amount(dec!(-0.0022)), "0.00");
        assert_eq!(format_amount(dec!(-0.004)), "0.00");
        assert_eq!(format_amount(dec!(-0.005)), "-0.01");
    }

    #[test]
    fn format_rate_as_percent() {
        assert_eq!(format_rate(dec!(0.22)), "22%");
        assert_eq!(format_rate(dec!(0.175)), "17.5%");
    }

    #[test]
    fn format_compact_suffixes() {
        assert_eq!(format_compact(75_000_000.0), "75M");
        assert_eq!(format_compact(37_500_000.0), "37.5M");
        assert_eq!(format_compact(1_500.0), "1.5K");
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(2_000_000_000.0), "2B");
    }
}
