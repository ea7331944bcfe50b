pub mod calculator;
pub mod pricing;

pub use calculator::{estimate, Billing, CostEstimate, ProviderCost, SeatTier};
pub use pricing::{ProviderRate, ProviderRateTable};
