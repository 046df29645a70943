use crate::data::{PolicyRecord, Scenario, TransactionRecord, Warning};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Tax at the standard corporate rate
pub fn standard_tax(profit: Decimal, rate: Decimal) -> Decimal {
    profit * rate
}

/// Tax under a holiday regime: nothing is due inside `start..=end`, the standard rate outside it
pub fn holiday_tax(profit: Decimal, year: i32, rate: Decimal, start: i32, end: i32) -> Decimal {
    if (start..=end).contains(&year) {
        Decimal::ZERO
    } else {
        standard_tax(profit, rate)
    }
}

/// Fiscal policies indexed by year. The first row for a year wins.
#[derive(Debug)]
pub struct PolicyTable<'a> {
    by_year: HashMap<i32, &'a PolicyRecord>,
}

impl<'a> PolicyTable<'a> {
    pub fn new(policies: &'a [PolicyRecord]) -> Self {
        let mut by_year = HashMap::new();
        for policy in policies {
            by_year.entry(policy.year).or_insert(policy);
        }
        PolicyTable { by_year }
    }

    pub fn get(&self, year: i32) -> Option<&'a PolicyRecord> {
        self.by_year.get(&year).copied()
    }
}

/// Computed tax for one transaction row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxRecord {
    pub year: i32,
    pub scenario: Scenario,
    pub taxable_profit: Decimal,
    pub tax_rate: Decimal,
    /// True when the holiday window zeroed the liability
    pub exempt: bool,
    pub tax_amount: Decimal,
}

/// Tax records in transaction order, plus warnings for skipped rows
#[derive(Debug, Default, Serialize)]
pub struct TaxReport {
    pub records: Vec<TaxRecord>,
    pub warnings: Vec<Warning>,
}

impl TaxReport {
    /// Total tax for a scenario across all years
    pub fn total(&self, scenario: Scenario) -> Decimal {
        self.records
            .iter()
            .filter(|r| r.scenario == scenario)
            .map(|r| r.tax_amount)
            .sum()
    }

    /// Distinct years with at least one record, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.records.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Normal tax minus holiday tax per year, for years where both scenarios have records
    pub fn savings_by_year(&self) -> Vec<(i32, Decimal)> {
        let mut totals: BTreeMap<i32, (Option<Decimal>, Option<Decimal>)> = BTreeMap::new();
        for record in &self.records {
            let entry = totals.entry(record.year).or_default();
            let slot = match record.scenario {
                Scenario::Normal => &mut entry.0,
                Scenario::TaxHoliday => &mut entry.1,
            };
            *slot = Some(slot.unwrap_or(Decimal::ZERO) + record.tax_amount);
        }
        totals
            .into_iter()
            .filter_map(|(year, pair)| match pair {
                (Some(normal), Some(holiday)) => Some((year, normal - holiday)),
                _ => None,
            })
            .collect()
    }
}

/// Calculate tax for each transaction against the policy for its year
pub fn calculate_tax(transactions: &[TransactionRecord], policies: &[PolicyRecord]) -> TaxReport {
    let table = PolicyTable::new(policies);
    let mut report = TaxReport::default();

    for tx in transactions {
        let Some(policy) = table.get(tx.year) else {
            log::warn!(
                "No fiscal policy for {}, skipping {} transaction",
                tx.year,
                tx.scenario
            );
            report.warnings.push(Warning::MissingPolicy {
                year: tx.year,
                scenario: tx.scenario,
            });
            continue;
        };

        let profit = tx.taxable_profit();
        let tax_amount = match tx.scenario {
            Scenario::Normal => standard_tax(profit, policy.tax_rate),
            Scenario::TaxHoliday => holiday_tax(
                profit,
                tx.year,
                policy.tax_rate,
                policy.holiday_start,
                policy.holiday_end,
            ),
        };
        let exempt = tx.scenario == Scenario::TaxHoliday && policy.in_holiday(tx.year);

        log::debug!(
            "Tax {} {}: profit={}, rate={}, exempt={}, tax={}",
            tx.year,
            tx.scenario,
            profit,
            policy.tax_rate,
            exempt,
            tax_amount
        );

        report.records.push(TaxRecord {
            year: tx.year,
            scenario: tx.scenario,
            taxable_profit: profit,
            tax_rate: policy.tax_rate,
            exempt,
            tax_amount,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(year: i32, revenue: Decimal, opex: Decimal, dep: Decimal, scenario: Scenario) -> TransactionRecord {
        TransactionRecord {
            year,
            revenue,
            operating_expense: opex,
            depreciation_expense: dep,
            scenario,
        }
    }

    fn policy(year: i32, rate: Decimal, start: i32, end: i32) -> PolicyRecord {
        PolicyRecord {
            year,
            tax_rate: rate,
            holiday_start: start,
            holiday_end: end,
        }
    }

    #[test]
    fn standard_tax_is_profit_times_rate() {
        for (profit, rate) in [
            (dec!(0), dec!(0.22)),
            (dec!(250000000), dec!(0.22)),
            (dec!(1234.56), dec!(0)),
            (dec!(1234.56), dec!(1)),
            (dec!(99.99), dec!(0.175)),
        ] {
            assert_eq!(standard_tax(profit, rate), profit * rate);
        }
    }

    #[test]
    fn holiday_tax_is_zero_inside_window() {
        for year in 2023..=2027 {
            assert_eq!(
                holiday_tax(dec!(290000000), year, dec!(0.22), 2023, 2027),
                Decimal::ZERO
            );
        }
    }

    #[test]
    fn holiday_tax_is_standard_outside_window() {
        for year in [2020, 2022, 2028, 2035] {
            assert_eq!(
                holiday_tax(dec!(290000000), year, dec!(0.22), 2023, 2027),
                standard_tax(dec!(290000000), dec!(0.22))
            );
        }
    }

    #[test]
    fn normal_scenario_pays_standard_rate() {
        let report = calculate_tax(
            &[tx(2023, dec!(500000000), dec!(200000000), dec!(50000000), Scenario::Normal)],
            &[policy(2023, dec!(0.22), 2023, 2027)],
        );
        assert_eq!(report.records.len(), 1);
        let record = &report.records[0];
        assert_eq!(record.taxable_profit, dec!(250000000));
        assert_eq!(record.tax_amount, dec!(55000000));
        assert!(!record.exempt);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn holiday_scenario_inside_window_pays_nothing() {
        let report = calculate_tax(
            &[tx(2023, dec!(600000000), dec!(250000000), dec!(60000000), Scenario::TaxHoliday)],
            &[policy(2023, dec!(0.22), 2023, 2027)],
        );
        assert_eq!(report.records[0].taxable_profit, dec!(290000000));
        assert_eq!(report.records[0].tax_amount, Decimal::ZERO);
        assert!(report.records[0].exempt);
    }

    #[test]
    fn holiday_scenario_outside_window_pays_standard_rate() {
        let report = calculate_tax(
            &[tx(2028, dec!(1000), dec!(0), dec!(0), Scenario::TaxHoliday)],
            &[policy(2028, dec!(0.22), 2023, 2027)],
        );
        assert_eq!(report.records[0].tax_amount, dec!(220));
        assert!(!report.records[0].exempt);
    }

    #[test]
    fn missing_policy_skips_row_with_warning() {
        let report = calculate_tax(
            &[
                tx(2023, dec!(1000), dec!(0), dec!(0), Scenario::Normal),
                tx(2030, dec!(1000), dec!(0), dec!(0), Scenario::TaxHoliday),
            ],
            &[policy(2023, dec!(0.22), 2023, 2027)],
        );
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].year, 2023);
        assert_eq!(
            report.warnings,
            vec![Warning::MissingPolicy {
                year: 2030,
                scenario: Scenario::TaxHoliday
            }]
        );
    }

    #[test]
    fn first_policy_for_a_year_wins() {
        let policies = [
            policy(2023, dec!(0.22), 2023, 2027),
            policy(2023, dec!(0.30), 2023, 2027),
        ];
        let table = PolicyTable::new(&policies);
        assert_eq!(table.get(2023).map(|p| p.tax_rate), Some(dec!(0.22)));
        assert!(table.get(2024).is_none());
    }

    #[test]
    fn loss_is_taxed_by_the_same_formula() {
        let report = calculate_tax(
            &[tx(2023, dec!(100), dec!(200), dec!(0), Scenario::Normal)],
            &[policy(2023, dec!(0.22), 2023, 2027)],
        );
        assert_eq!(report.records[0].tax_amount, dec!(-22));
    }

    #[test]
    fn report_totals_and_savings() {
        let transactions = [
            tx(2023, dec!(500000000), dec!(200000000), dec!(50000000), Scenario::Normal),
            tx(2023, dec!(600000000), dec!(250000000), dec!(60000000), Scenario::TaxHoliday),
            tx(2024, dec!(700000000), dec!(300000000), dec!(70000000), Scenario::Normal),
            tx(2024, dec!(800000000), dec!(350000000), dec!(80000000), Scenario::TaxHoliday),
            tx(2025, dec!(100), dec!(0), dec!(0), Scenario::Normal),
        ];
        let policies = [
            policy(2023, dec!(0.22), 2023, 2027),
            policy(2024, dec!(0.22), 2023, 2027),
            policy(2025, dec!(0.22), 2023, 2027),
        ];
        let report = calculate_tax(&transactions, &policies);

        assert_eq!(report.total(Scenario::Normal), dec!(127600022));
        assert_eq!(report.total(Scenario::TaxHoliday), Decimal::ZERO);
        assert_eq!(report.years(), vec![2023, 2024, 2025]);
        assert_eq!(
            report.savings_by_year(),
            vec![(2023, dec!(55000000)), (2024, dec!(72600000))]
        );
    }
}
