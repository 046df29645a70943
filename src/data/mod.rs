pub mod loader;
pub mod records;
pub mod warnings;

// Flat public surface for input tables and domain types.
pub use loader::{Dataset, DatasetPaths};
pub use records::{AssetRecord, DepreciationMethod, PolicyRecord, Scenario, TransactionRecord};
pub use warnings::Warning;
