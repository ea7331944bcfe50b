use crate::error::{CostError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::calculator::SeatTier;

/// Hourly price of one seat at each tier for a single provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRate {
    pub name: String,
    /// 1 core / 4 GB seat, per hour.
    pub small_seat: f64,
    /// 1 core / 8 GB seat, per hour.
    pub large_seat: f64,
}

impl ProviderRate {
    pub fn new(name: impl Into<String>, small_seat: f64, large_seat: f64) -> Self {
        Self {
            name: name.into(),
            small_seat,
            large_seat,
        }
    }

    pub fn rate(&self, tier: SeatTier) -> f64 {
        match tier {
            SeatTier::Small => self.small_seat,
            SeatTier::Large => self.large_seat,
        }
    }
}

/// Seat prices per provider. Provider order is preserved and decides the
/// order of cost columns in the output.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRateTable {
    providers: Vec<ProviderRate>,
}

impl ProviderRateTable {
    /// The built-in table.
    ///
    /// Each rate is the average hourly VM price across a range of instance
    /// sizes, divided by the number of 1C/4G or 1C/8G seats the instance
    /// holds. HCC is the on-premises reference.
    pub fn new() -> Self {
        Self {
            providers: vec![
                ProviderRate::new("AWS", 0.0385, 0.0504),
                ProviderRate::new("GCP", 0.035, 0.0475),
                ProviderRate::new("MSFT", 0.055, 0.07125),
                ProviderRate::new("DO", 0.0446, 0.05952),
                ProviderRate::new("IBM", 0.053, 0.0685),
                ProviderRate::new("HCC", 0.004516267, 0.007016981),
            ],
        }
    }

    /// Build a table from explicit entries, rejecting anything that could not
    /// be billed sensibly.
    pub fn from_providers(providers: Vec<ProviderRate>) -> Result<Self> {
        if providers.is_empty() {
            return Err(CostError::InvalidConfig(
                "rate table must list at least one provider".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for provider in &providers {
            if provider.name.trim().is_empty() {
                return Err(CostError::InvalidConfig("provider name is empty".to_string()));
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(CostError::InvalidConfig(format!(
                    "provider {} is listed twice",
                    provider.name
                )));
            }
            let rates = [
                ("small_seat", provider.small_seat),
                ("large_seat", provider.large_seat),
            ];
            for (label, rate) in rates {
                if !rate.is_finite() || rate < 0.0 {
                    return Err(CostError::InvalidConfig(format!(
                        "provider {}: {} rate {} must be a non-negative number",
                        provider.name, label, rate
                    )));
                }
            }
        }

        Ok(Self { providers })
    }

    pub fn providers(&self) -> &[ProviderRate] {
        &self.providers
    }

    pub fn get(&self, name: &str) -> Option<&ProviderRate> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRateTable {
    fn default() -> Self {
        Self::new()
    }
}
