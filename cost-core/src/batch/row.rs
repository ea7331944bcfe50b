use crate::cost::{CostEstimate, ProviderRateTable};
use crate::error::Basis;
use crate::job::NormalizedJob;
use serde::{Deserialize, Serialize};

pub const JOB_ID: &str = "JobID";
pub const NODES: &str = "Nodes";
pub const TOTAL_CORES: &str = "Total Cores";
pub const CPU_TIME: &str = "CPU Time";
pub const MEMORY_REQUESTED: &str = "Total Memory Requested (GB)";
pub const MEMORY_USED: &str = "Total Memory Used (GB)";
pub const TIME_USED: &str = "Time Used (Hrs)";
pub const TIME_REQUESTED: &str = "Time Requested (Hrs)";

/// `<Provider>-Usage` / `<Provider>-Requested`.
pub fn cost_column(provider: &str, basis: Basis) -> String {
    format!("{}-{}", provider, basis)
}

/// One successfully priced job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Position of the source record in the input.
    pub row: usize,
    pub job_id: Option<String>,
    pub job: NormalizedJob,
    /// `CPUTimeRAW`, passed through untouched.
    pub cpu_time: String,
    pub usage: CostEstimate,
    pub requested: CostEstimate,
}

impl ResultRow {
    /// Output header for a table priced with `rates`.
    pub fn header(rates: &ProviderRateTable) -> Vec<String> {
        let mut header: Vec<String> = [
            JOB_ID,
            NODES,
            TOTAL_CORES,
            CPU_TIME,
            MEMORY_REQUESTED,
            MEMORY_USED,
            TIME_USED,
            TIME_REQUESTED,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        header.extend(Self::cost_columns(rates));
        header
    }

    /// Names of the columns that are summed and averaged, in output order.
    /// Identifiers and time columns are left out.
    pub fn aggregate_columns(rates: &ProviderRateTable) -> Vec<String> {
        let mut columns: Vec<String> = [NODES, TOTAL_CORES, MEMORY_REQUESTED, MEMORY_USED]
            .iter()
            .map(|s| s.to_string())
            .collect();
        columns.extend(Self::cost_columns(rates));
        columns
    }

    fn cost_columns(rates: &ProviderRateTable) -> Vec<String> {
        [Basis::Usage, Basis::Requested]
            .iter()
            .flat_map(|basis| rates.names().map(move |name| cost_column(name, *basis)))
            .collect()
    }

    /// Values matching [`ResultRow::aggregate_columns`].
    pub fn aggregate_values(&self) -> Vec<f64> {
        let mut values = vec![
            self.job.nodes,
            self.job.cores,
            self.job.req_mem_gb,
            self.job.used_mem_gb,
        ];
        values.extend(self.usage.iter().map(|c| c.cost));
        values.extend(self.requested.iter().map(|c| c.cost));
        values
    }

    /// Cells matching [`ResultRow::header`].
    pub fn record(&self) -> Vec<String> {
        let mut cells = vec![
            self.job_id.clone().unwrap_or_default(),
            self.job.nodes.to_string(),
            self.job.cores.to_string(),
            self.cpu_time.clone(),
            self.job.req_mem_gb.to_string(),
            self.job.used_mem_gb.to_string(),
            self.job.elapsed_hours.to_string(),
            self.job.requested_hours.to_string(),
        ];
        cells.extend(self.usage.iter().map(|c| c.cost.to_string()));
        cells.extend(self.requested.iter().map(|c| c.cost.to_string()));
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{estimate, ProviderRate};

    fn table() -> ProviderRateTable {
        ProviderRateTable::from_providers(vec![
            ProviderRate::new("A", 1.0, 2.0),
            ProviderRate::new("B", 0.5, 1.0),
        ])
        .unwrap()
    }

    fn sample() -> ResultRow {
        let rates = table();
        let job = NormalizedJob {
            nodes: 1.0,
            cores: 2.0,
            elapsed_hours: 1.5,
            requested_hours: 4.0,
            req_mem_gb: 8.0,
            used_mem_gb: 2.0,
        };
        ResultRow {
            row: 0,
            job_id: Some("77".to_string()),
            usage: estimate(&rates, job.cores, job.used_mem_gb, job.elapsed_hours).unwrap(),
            requested: estimate(&rates, job.cores, job.req_mem_gb, job.requested_hours).unwrap(),
            job,
            cpu_time: "10800".to_string(),
        }
    }

    #[test]
    fn test_header_flattens_providers() {
        let header = ResultRow::header(&table());
        assert_eq!(header.len(), 8 + 4);
        assert_eq!(&header[8..], ["A-Usage", "B-Usage", "A-Requested", "B-Requested"]);
    }

    #[test]
    fn test_record_lines_up_with_header() {
        let row = sample();
        let cells = row.record();
        assert_eq!(cells.len(), ResultRow::header(&table()).len());
        assert_eq!(cells[0], "77");
        assert_eq!(cells[3], "10800");
        assert_eq!(cells[6], "1.5");
        // usage: 2 small seats, 2 billed hours
        assert_eq!(cells[8], "4");
        // requested: 2 small seats, 4 billed hours, provider B
        assert_eq!(cells[11], "4");
    }

    #[test]
    fn test_aggregate_columns_skip_time_and_ids() {
        let columns = ResultRow::aggregate_columns(&table());
        for excluded in [JOB_ID, CPU_TIME, TIME_USED, TIME_REQUESTED] {
            assert!(!columns.iter().any(|c| c == excluded));
        }
        assert_eq!(columns.len(), sample().aggregate_values().len());
    }
}
