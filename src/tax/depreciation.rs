use crate::data::{AssetRecord, DepreciationMethod};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DepreciationError {
    #[error("useful life must be at least one year")]
    ZeroUsefulLife,
    #[error("period index starts at 1, got {0}")]
    InvalidPeriod(u32),
    #[error("{periods} periods from {first_year} run past the last representable year")]
    WindowOverflow { first_year: i32, periods: u32 },
    #[error("depreciation arithmetic overflowed")]
    Overflow,
    #[error("asset {asset_id}: {source}")]
    Asset {
        asset_id: String,
        source: Box<DepreciationError>,
    },
}

/// Constant yearly expense: acquisition value divided by useful life
pub fn straight_line(value: Decimal, useful_life: u32) -> Result<Decimal, DepreciationError> {
    if useful_life == 0 {
        return Err(DepreciationError::ZeroUsefulLife);
    }
    Ok(value / Decimal::from(useful_life))
}

/// Double-declining rate, `2 / useful_life`
pub fn declining_rate(useful_life: u32) -> Result<Decimal, DepreciationError> {
    if useful_life == 0 {
        return Err(DepreciationError::ZeroUsefulLife);
    }
    Ok(dec!(2) / Decimal::from(useful_life))
}

/// Book value at the start of a 1-based period: `value * (1 - rate)^(period - 1)`
pub fn book_value(value: Decimal, useful_life: u32, period: u32) -> Result<Decimal, DepreciationError> {
    if period == 0 {
        return Err(DepreciationError::InvalidPeriod(period));
    }
    let factor = Decimal::ONE - declining_rate(useful_life)?;
    let mut book = value;
    for _ in 1..period {
        book = book.checked_mul(factor).ok_or(DepreciationError::Overflow)?;
    }
    Ok(book)
}

/// Declining-balance expense for a 1-based period, never negative
pub fn declining_balance(value: Decimal, useful_life: u32, period: u32) -> Result<Decimal, DepreciationError> {
    let rate = declining_rate(useful_life)?;
    let book = book_value(value, useful_life, period)?;
    let depreciation = book.checked_mul(rate).ok_or(DepreciationError::Overflow)?;
    Ok(depreciation.max(Decimal::ZERO))
}

/// Calendar years evaluated, mapped to 1-based period indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub first_year: i32,
    pub periods: u32,
}

impl Default for PeriodWindow {
    fn default() -> Self {
        PeriodWindow {
            first_year: 2023,
            periods: 2,
        }
    }
}

impl PeriodWindow {
    /// Calendar year of a 1-based period, `None` if it does not fit an `i32`
    pub fn year_of(&self, period: u32) -> Option<i32> {
        let offset = i32::try_from(period.checked_sub(1)?).ok()?;
        self.first_year.checked_add(offset)
    }

    /// (year, period) pairs in ascending order
    pub fn iter(&self) -> Result<impl Iterator<Item = (i32, u32)>, DepreciationError> {
        if self.periods > 0 && self.year_of(self.periods).is_none() {
            return Err(DepreciationError::WindowOverflow {
                first_year: self.first_year,
                periods: self.periods,
            });
        }
        let first_year = self.first_year;
        // the last year fits, so every earlier offset does too
        Ok((1..=self.periods).map(move |period| (first_year + (period - 1) as i32, period)))
    }
}

/// Computed depreciation for one asset in one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepreciationRecord {
    pub asset_id: String,
    pub category: String,
    pub method: DepreciationMethod,
    pub year: i32,
    pub period: u32,
    /// Book value at the start of the period
    pub book_value: Decimal,
    pub depreciation_amount: Decimal,
}

/// Depreciation for every asset over every year of the window, in asset order
pub fn calculate_depreciation(
    assets: &[AssetRecord],
    window: PeriodWindow,
) -> Result<Vec<DepreciationRecord>, DepreciationError> {
    // reject an unrepresentable window even when there are no assets
    let _ = window.iter()?;
    let mut records = Vec::new();
    for asset in assets {
        let schedule = asset_schedule(asset, window).map_err(|e| DepreciationError::Asset {
            asset_id: asset.asset_id.clone(),
            source: Box::new(e),
        })?;
        records.extend(schedule);
    }
    Ok(records)
}

/// One asset over the window, carrying the declining book value between periods
fn asset_schedule(
    asset: &AssetRecord,
    window: PeriodWindow,
) -> Result<Vec<DepreciationRecord>, DepreciationError> {
    let value = asset.acquisition_value;
    let life = asset.useful_life;
    let mut book = value;
    let mut records = Vec::new();

    for (year, period) in window.iter()? {
        let (opening, amount) = match asset.method {
            DepreciationMethod::StraightLine => {
                let amount = straight_line(value, life)?;
                let used = amount
                    .checked_mul(Decimal::from(period - 1))
                    .ok_or(DepreciationError::Overflow)?;
                let remaining = value.checked_sub(used).ok_or(DepreciationError::Overflow)?;
                (remaining.max(Decimal::ZERO), amount)
            }
            DepreciationMethod::DecliningBalance => {
                let rate = declining_rate(life)?;
                if period > 1 {
                    book = book
                        .checked_mul(Decimal::ONE - rate)
                        .ok_or(DepreciationError::Overflow)?;
                }
                let amount = book.checked_mul(rate).ok_or(DepreciationError::Overflow)?;
                (book, amount.max(Decimal::ZERO))
            }
        };
        log::debug!(
            "Depreciation asset {} ({}) {} period {}: book={}, amount={}",
            asset.asset_id,
            asset.method,
            year,
            period,
            opening,
            amount
        );
        records.push(DepreciationRecord {
            asset_id: asset.asset_id.clone(),
            category: asset.category.clone(),
            method: asset.method,
            year,
            period,
            book_value: opening,
            depreciation_amount: amount,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(id: &str, value: Decimal, life: u32, method: DepreciationMethod) -> AssetRecord {
        AssetRecord {
            asset_id: id.to_string(),
            category: format!("Category {id}"),
            acquisition_value: value,
            useful_life: life,
            method,
        }
    }

    #[test]
    fn straight_line_divides_by_life() {
        assert_eq!(straight_line(dec!(100000000), 5).unwrap(), dec!(20000000));
    }

    #[test]
    fn straight_line_is_constant_across_periods() {
        let machine = asset("1", dec!(100000000), 5, DepreciationMethod::StraightLine);
        let window = PeriodWindow {
            first_year: 2023,
            periods: 7,
        };
        let records = calculate_depreciation(&[machine], window).unwrap();
        assert_eq!(records.len(), 7);
        assert!(records
            .iter()
            .all(|r| r.depreciation_amount == dec!(20000000)));
        assert_eq!(records[1].book_value, dec!(80000000));
        // opening book value bottoms out after the useful life
        assert_eq!(records[6].book_value, Decimal::ZERO);
    }

    #[test]
    fn declining_balance_first_two_periods() {
        assert_eq!(declining_rate(4).unwrap(), dec!(0.5));
        assert_eq!(declining_balance(dec!(150000000), 4, 1).unwrap(), dec!(75000000));
        assert_eq!(book_value(dec!(150000000), 4, 2).unwrap(), dec!(75000000));
        assert_eq!(declining_balance(dec!(150000000), 4, 2).unwrap(), dec!(37500000));
    }

    #[test]
    fn declining_balance_is_non_negative_and_decreasing() {
        for life in [3u32, 4, 5, 8, 10] {
            let mut previous = None;
            for period in 1..=20 {
                let amount = declining_balance(dec!(150000000), life, period).unwrap();
                assert!(amount >= Decimal::ZERO);
                if let Some(prev) = previous {
                    assert!(amount < prev, "life {life} period {period}: {amount} !< {prev}");
                }
                previous = Some(amount);
            }
        }
    }

    #[test]
    fn declining_balance_short_lives_stay_non_negative() {
        // life 1 gives rate 2: book value flips sign every period
        for period in 1..=6 {
            assert!(declining_balance(dec!(1000), 1, period).unwrap() >= Decimal::ZERO);
        }
        // life 2 gives rate 1: everything goes in the first period
        assert_eq!(declining_balance(dec!(1000), 2, 1).unwrap(), dec!(1000));
        assert_eq!(declining_balance(dec!(1000), 2, 2).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn zero_life_and_zero_period_are_errors() {
        assert_eq!(straight_line(dec!(1000), 0), Err(DepreciationError::ZeroUsefulLife));
        assert_eq!(declining_balance(dec!(1000), 0, 1), Err(DepreciationError::ZeroUsefulLife));
        assert_eq!(book_value(dec!(1000), 4, 0), Err(DepreciationError::InvalidPeriod(0)));

        let broken = asset("7", dec!(1000), 0, DepreciationMethod::StraightLine);
        let err = calculate_depreciation(&[broken], PeriodWindow::default()).unwrap_err();
        assert_eq!(err.to_string(), "asset 7: useful life must be at least one year");
    }

    #[test]
    fn window_maps_years_to_periods() {
        let pairs: Vec<_> = PeriodWindow::default().iter().unwrap().collect();
        assert_eq!(pairs, vec![(2023, 1), (2024, 2)]);
    }

    #[test]
    fn window_past_last_year_is_an_error() {
        let edge = PeriodWindow {
            first_year: i32::MAX,
            periods: 1,
        };
        assert_eq!(edge.iter().unwrap().collect::<Vec<_>>(), vec![(i32::MAX, 1)]);

        let overflowing = PeriodWindow {
            first_year: i32::MAX,
            periods: 2,
        };
        assert!(matches!(
            overflowing.iter(),
            Err(DepreciationError::WindowOverflow { periods: 2, .. })
        ));
        assert_eq!(
            calculate_depreciation(&[], overflowing),
            Err(DepreciationError::WindowOverflow {
                first_year: i32::MAX,
                periods: 2
            })
        );

        let too_many = PeriodWindow {
            first_year: 0,
            periods: u32::MAX,
        };
        assert!(too_many.iter().is_err());
        assert_eq!(too_many.year_of(0), None);
    }

    #[test]
    fn carried_schedule_matches_closed_form() {
        let window = PeriodWindow {
            first_year: 2023,
            periods: 12,
        };
        for life in [1u32, 2, 3, 7] {
            let truck = asset("9", dec!(150000000), life, DepreciationMethod::DecliningBalance);
            let records = calculate_depreciation(&[truck], window).unwrap();
            for r in &records {
                assert_eq!(r.book_value, book_value(dec!(150000000), life, r.period).unwrap());
                assert_eq!(
                    r.depreciation_amount,
                    declining_balance(dec!(150000000), life, r.period).unwrap()
                );
            }
        }
    }

    #[test]
    fn oversized_value_overflows_as_error() {
        assert_eq!(declining_balance(Decimal::MAX, 1, 1), Err(DepreciationError::Overflow));

        let huge = asset("8", Decimal::MAX, 1, DepreciationMethod::DecliningBalance);
        let err = calculate_depreciation(&[huge], PeriodWindow::default()).unwrap_err();
        assert_eq!(err.to_string(), "asset 8: depreciation arithmetic overflowed");
    }

    #[test]
    fn sample_assets_over_default_window() {
        let assets = [
            asset("1", dec!(100000000), 5, DepreciationMethod::StraightLine),
            asset("2", dec!(150000000), 4, DepreciationMethod::DecliningBalance),
        ];
        let records = calculate_depreciation(&assets, PeriodWindow::default()).unwrap();
        let amounts: Vec<_> = records
            .iter()
            .map(|r| (r.asset_id.as_str(), r.year, r.depreciation_amount))
            .collect();
        assert_eq!(
            amounts,
            vec![
                ("1", 2023, dec!(20000000)),
                ("1", 2024, dec!(20000000)),
                ("2", 2023, dec!(75000000)),
                ("2", 2024, dec!(37500000)),
            ]
        );
    }
}
