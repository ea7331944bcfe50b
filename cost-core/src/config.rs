use crate::cost::{ProviderRate, ProviderRateTable};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Provider seat rates read from TOML:
///
/// ```toml
/// [[providers]]
/// name = "AWS"
/// small_seat = 0.0385
/// large_seat = 0.0504
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFile {
    pub providers: Vec<ProviderRate>,
}

impl From<&ProviderRateTable> for RateFile {
    fn from(table: &ProviderRateTable) -> Self {
        Self {
            providers: table.providers().to_vec(),
        }
    }
}

pub fn parse_rates(content: &str) -> Result<ProviderRateTable> {
    let file: RateFile = toml::from_str(content)?;
    ProviderRateTable::from_providers(file.providers)
}

pub fn load_rates(path: &Path) -> Result<ProviderRateTable> {
    let content = std::fs::read_to_string(path)?;
    parse_rates(&content)
}

/// The rate file to use, or the built-in table when none is given.
pub fn resolve_rates(path: Option<&Path>) -> Result<ProviderRateTable> {
    match path {
        Some(path) => load_rates(path),
        None => Ok(ProviderRateTable::new()),
    }
}
