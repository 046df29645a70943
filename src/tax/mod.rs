pub mod corporate;
pub mod depreciation;

pub use corporate::{calculate_tax, TaxRecord, TaxReport};
pub use depreciation::{calculate_depreciation, DepreciationRecord, PeriodWindow};
