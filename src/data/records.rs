use super::loader::LoadError;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Fiscal regime a transaction row is evaluated under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Standard corporate rate applies every year
    Normal,
    /// Zero tax while the year falls inside the policy's holiday window
    TaxHoliday,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::TaxHoliday => "tax_holiday",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "normal" | "standard" => Ok(Scenario::Normal),
            "tax_holiday" | "holiday" => Ok(Scenario::TaxHoliday),
            _ => Err(LoadError::UnknownScenario(s.to_string())),
        }
    }
}

/// Accounting method used to spread an asset's cost over its useful life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    StraightLine,
    DecliningBalance,
}

impl DepreciationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "straight_line",
            DepreciationMethod::DecliningBalance => "declining_balance",
        }
    }

    /// Human readable name for tables and chart legends
    pub fn display(&self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "Straight-Line",
            DepreciationMethod::DecliningBalance => "Declining-Balance",
        }
    }
}

impl std::fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DepreciationMethod {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "straight_line" | "garis_lurus" => Ok(DepreciationMethod::StraightLine),
            "declining_balance" | "double_declining" | "saldo_menurun" => {
                Ok(DepreciationMethod::DecliningBalance)
            }
            _ => Err(LoadError::UnknownMethod(s.to_string())),
        }
    }
}

/// One year of company results under a given fiscal scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TransactionRecord {
    /// Fiscal year, used as the key into the policy table
    pub year: i32,
    /// Gross revenue for the year
    #[schemars(with = "f64")]
    pub revenue: Decimal,
    /// Operating expenses for the year
    #[schemars(with = "f64")]
    pub operating_expense: Decimal,
    /// Depreciation expense deducted before tax
    #[serde(rename = "depreciation")]
    #[schemars(with = "f64")]
    pub depreciation_expense: Decimal,
    /// normal or tax_holiday
    #[serde(deserialize_with = "deserialize_from_str")]
    pub scenario: Scenario,
}

impl TransactionRecord {
    /// Revenue minus operating expense minus depreciation expense
    pub fn taxable_profit(&self) -> Decimal {
        self.revenue - self.operating_expense - self.depreciation_expense
    }
}

/// Tax rate and holiday window in force for a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyRecord {
    /// Fiscal year this policy applies to
    pub year: i32,
    /// Corporate tax rate as a fraction (0.22 = 22%)
    #[schemars(with = "f64")]
    pub tax_rate: Decimal,
    /// First year of the tax holiday (inclusive)
    pub holiday_start: i32,
    /// Last year of the tax holiday (inclusive)
    pub holiday_end: i32,
}

impl PolicyRecord {
    pub fn in_holiday(&self, year: i32) -> bool {
        (self.holiday_start..=self.holiday_end).contains(&year)
    }
}

/// Fixed asset subject to depreciation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetRecord {
    /// Asset identifier
    pub asset_id: String,
    /// Asset category, used to group the depreciation chart
    pub category: String,
    /// Cost at acquisition
    #[schemars(with = "f64")]
    pub acquisition_value: Decimal,
    /// Useful life in years
    pub useful_life: u32,
    /// straight_line or declining_balance
    #[serde(deserialize_with = "deserialize_from_str")]
    pub method: DepreciationMethod,
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
