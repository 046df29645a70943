use super::records::{AssetRecord, PolicyRecord, TransactionRecord};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

const SAMPLE_TRANSACTIONS: &str = include_str!("sample/transactions.csv");
const SAMPLE_POLICIES: &str = include_str!("sample/policies.csv");
const SAMPLE_ASSETS: &str = include_str!("sample/assets.csv");

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid {table} data: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("unknown scenario '{0}' (expected normal or tax_holiday)")]
    UnknownScenario(String),
    #[error("unknown depreciation method '{0}' (expected straight_line or declining_balance)")]
    UnknownMethod(String),
    #[error("only one table can be read from stdin")]
    StdinReused,
    #[error("no input received on stdin for {0}")]
    EmptyStdin(&'static str),
}

/// Optional file overrides for each table. `None` uses the built-in sample, `-` reads stdin.
#[derive(Debug, Clone, Default)]
pub struct DatasetPaths {
    pub transactions: Option<PathBuf>,
    pub policies: Option<PathBuf>,
    pub assets: Option<PathBuf>,
}

impl DatasetPaths {
    fn has_overrides(&self) -> bool {
        self.transactions.is_some() || self.policies.is_some() || self.assets.is_some()
    }

    fn stdin_count(&self) -> usize {
        [&self.transactions, &self.policies, &self.assets]
            .into_iter()
            .flatten()
            .filter(|p| is_stdin(p))
            .count()
    }
}

/// The three input tables, immutable once loaded
#[derive(Debug, Clone)]
pub struct Dataset {
    pub transactions: Vec<TransactionRecord>,
    pub policies: Vec<PolicyRecord>,
    pub assets: Vec<AssetRecord>,
    fingerprint: String,
}

impl Dataset {
    /// Built-in sample data
    pub fn sample() -> Result<Self, LoadError> {
        Self::from_sources(SAMPLE_TRANSACTIONS, SAMPLE_POLICIES, SAMPLE_ASSETS)
    }

    pub fn load(paths: &DatasetPaths) -> Result<Self, LoadError> {
        if !paths.has_overrides() {
            return Self::sample();
        }
        if paths.stdin_count() > 1 {
            return Err(LoadError::StdinReused);
        }
        let transactions = read_source("transactions", paths.transactions.as_deref(), SAMPLE_TRANSACTIONS)?;
        let policies = read_source("policies", paths.policies.as_deref(), SAMPLE_POLICIES)?;
        let assets = read_source("assets", paths.assets.as_deref(), SAMPLE_ASSETS)?;
        Self::from_sources(&transactions, &policies, &assets)
    }

    pub fn from_sources(transactions: &str, policies: &str, assets: &str) -> Result<Self, LoadError> {
        let dataset = Dataset {
            transactions: read_csv("transactions", transactions.as_bytes())?,
            policies: read_csv("policies", policies.as_bytes())?,
            assets: read_csv("assets", assets.as_bytes())?,
            fingerprint: fingerprint(&[transactions, policies, assets]),
        };
        log::info!(
            "Loaded {} transactions, {} policies, {} assets",
            dataset.transactions.len(),
            dataset.policies.len(),
            dataset.assets.len()
        );
        Ok(dataset)
    }

    /// SHA-256 of the three source texts, hex encoded
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Deserialize every row of a CSV table with a header line
pub fn read_csv<T, R>(table: &'static str, reader: R) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let records = rdr
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|source| LoadError::Csv { table, source })?;
    log::debug!("Read {} {} records", records.len(), table);
    Ok(records)
}

fn read_source(table: &'static str, path: Option<&Path>, sample: &str) -> Result<String, LoadError> {
    match path {
        None => Ok(sample.to_string()),
        Some(path) if is_stdin(path) => {
            let mut buffer = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut buffer)
                .map_err(|source| LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
            if buffer.trim().is_empty() {
                return Err(LoadError::EmptyStdin(table));
            }
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn fingerprint(sources: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for source in sources {
        hasher.update(source.as_bytes());
        // separator so moving a line between tables changes the digest
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}
