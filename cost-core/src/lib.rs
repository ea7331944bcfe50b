//! Estimate what HPC jobs would have cost in the cloud, from scheduler
//! accounting records.

pub mod units;
pub mod job;
pub mod cost;
pub mod batch;
pub mod report;
pub mod config;
pub mod error;
pub mod observability;

pub use batch::{AggregateStats, BatchOutcome, BatchProcessor, ResultRow};
pub use cost::{estimate, CostEstimate, ProviderRateTable};
pub use error::{CostError, Result};
pub use job::{normalize, NormalizedJob, RawJobRecord};
