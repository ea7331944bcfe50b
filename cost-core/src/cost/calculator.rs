use super::pricing::ProviderRateTable;
use crate::error::EstimationError;
use serde::{Deserialize, Serialize};

/// Billing tier chosen from a job's memory-to-core ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatTier {
    /// 1 core / 4 GB.
    Small,
    /// 1 core / 8 GB.
    Large,
}

impl SeatTier {
    /// Jobs above 4 GB per core move to the large seat. Exactly 4 GB per core
    /// stays on the small seat.
    pub fn for_job(cores: f64, memory_gb: f64) -> Self {
        if memory_gb / cores > 4.0 {
            SeatTier::Large
        } else {
            SeatTier::Small
        }
    }

    pub fn memory_per_seat_gb(&self) -> f64 {
        match self {
            SeatTier::Small => 4.0,
            SeatTier::Large => 8.0,
        }
    }
}

/// How a job is billed, independent of any provider's price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billing {
    pub tier: SeatTier,
    pub seats: f64,
    pub billed_hours: f64,
}

impl Billing {
    pub fn for_job(cores: f64, memory_gb: f64, hours: f64) -> Result<Self, EstimationError> {
        if !cores.is_finite() {
            return Err(EstimationError::NotFinite("cores"));
        }
        if !memory_gb.is_finite() {
            return Err(EstimationError::NotFinite("memory"));
        }
        if !hours.is_finite() {
            return Err(EstimationError::NotFinite("hours"));
        }
        if cores <= 0.0 {
            return Err(EstimationError::NonPositiveCores(cores));
        }
        if memory_gb < 0.0 {
            return Err(EstimationError::NegativeMemory(memory_gb));
        }
        if hours < 0.0 {
            return Err(EstimationError::NegativeHours(hours));
        }

        let tier = SeatTier::for_job(cores, memory_gb);
        // Memory-bound jobs pay for enough seats to hold their footprint.
        let seats = cores.max(memory_gb / tier.memory_per_seat_gb());
        // Providers bill whole hours.
        let billed_hours = hours.ceil();

        Ok(Self {
            tier,
            seats,
            billed_hours,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCost {
    pub provider: String,
    pub cost: f64,
}

/// Cost of one job per provider, in rate-table order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostEstimate {
    pub costs: Vec<ProviderCost>,
}

impl CostEstimate {
    pub fn get(&self, provider: &str) -> Option<f64> {
        self.costs
            .iter()
            .find(|c| c.provider == provider)
            .map(|c| c.cost)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderCost> {
        self.costs.iter()
    }
}

/// Estimate what running a job of this shape would cost at each provider.
pub fn estimate(
    rates: &ProviderRateTable,
    cores: f64,
    memory_gb: f64,
    hours: f64,
) -> Result<CostEstimate, EstimationError> {
    let billing = Billing::for_job(cores, memory_gb, hours)?;

    let costs = rates
        .providers()
        .iter()
        .map(|provider| ProviderCost {
            provider: provider.name.clone(),
            cost: provider.rate(billing.tier) * billing.billed_hours * billing.seats,
        })
        .collect();

    Ok(CostEstimate { costs })
}
