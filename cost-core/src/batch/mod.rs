pub mod processor;
pub mod row;
pub mod stats;

pub use processor::{process_record, BatchOutcome, BatchProcessor};
pub use row::ResultRow;
pub use stats::{AggregateStats, ColumnStats};
