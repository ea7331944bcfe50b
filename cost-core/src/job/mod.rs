pub mod normalizer;

pub use normalizer::normalize;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column names of a `sacct -P` accounting dump.
pub mod columns {
    pub const JOB_ID: &str = "JobID";
    pub const REQ_NODES: &str = "ReqNodes";
    pub const ALLOC_CPUS: &str = "AllocCPUS";
    pub const ELAPSED: &str = "Elapsed";
    pub const TIMELIMIT: &str = "Timelimit";
    pub const REQ_MEM: &str = "ReqMem";
    pub const MAX_RSS: &str = "MaxRSS";
    pub const CPU_TIME_RAW: &str = "CPUTimeRAW";

    /// Columns every input table must carry. `JobID` is optional.
    pub const REQUIRED: [&str; 7] = [
        REQ_NODES,
        ALLOC_CPUS,
        ELAPSED,
        TIMELIMIT,
        REQ_MEM,
        MAX_RSS,
        CPU_TIME_RAW,
    ];
}

/// One accounting row, keyed by column name, exactly as read.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawJobRecord {
    /// Zero-based position in the input, used to locate failures.
    pub row: usize,
    fields: HashMap<String, String>,
}

impl RawJobRecord {
    pub fn new(row: usize, fields: HashMap<String, String>) -> Self {
        Self { row, fields }
    }

    pub fn from_pairs<K, V, I>(row: usize, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { row, fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// The scheduler's job id, if the input carries one and it is non-empty.
    pub fn job_id(&self) -> Option<&str> {
        self.get(columns::JOB_ID).filter(|id| !id.trim().is_empty())
    }
}

/// Resource figures of one job in canonical units. All fields are finite and
/// non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedJob {
    pub nodes: f64,
    pub cores: f64,
    pub elapsed_hours: f64,
    pub requested_hours: f64,
    pub req_mem_gb: f64,
    pub used_mem_gb: f64,
}
