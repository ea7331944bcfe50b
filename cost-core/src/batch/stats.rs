use super::row::ResultRow;
use crate::cost::ProviderRateTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub total: f64,
    /// `None` when no job contributed.
    pub mean: Option<f64>,
}

/// Column totals and means over every successfully priced job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub rows: usize,
    pub columns: Vec<ColumnStats>,
}

impl AggregateStats {
    pub fn from_rows(rows: &[ResultRow], rates: &ProviderRateTable) -> Self {
        let names = ResultRow::aggregate_columns(rates);
        let mut totals = vec![0.0; names.len()];

        for row in rows {
            for (total, value) in totals.iter_mut().zip(row.aggregate_values()) {
                *total += value;
            }
        }

        let count = rows.len();
        let columns = names
            .into_iter()
            .zip(totals)
            .map(|(name, total)| ColumnStats {
                name,
                total,
                mean: (count > 0).then(|| total / count as f64),
            })
            .collect();

        Self { rows: count, columns }
    }

    pub fn get(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{estimate, ProviderRate};
    use crate::job::NormalizedJob;

    fn rates() -> ProviderRateTable {
        ProviderRateTable::from_providers(vec![ProviderRate::new("X", 1.0, 2.0)]).unwrap()
    }

    fn row(cores: f64, hours: f64) -> ResultRow {
        let rates = rates();
        let job = NormalizedJob {
            nodes: 1.0,
            cores,
            elapsed_hours: hours,
            requested_hours: hours,
            req_mem_gb: cores,
            used_mem_gb: cores,
        };
        ResultRow {
            row: 0,
            job_id: None,
            job,
            cpu_time: "0".to_string(),
            usage: estimate(&rates, cores, cores, hours).unwrap(),
            requested: estimate(&rates, cores, cores, hours).unwrap(),
        }
    }

    #[test]
    fn test_totals_and_means() {
        let rows = vec![row(2.0, 1.0), row(4.0, 3.0)];
        let stats = AggregateStats::from_rows(&rows, &rates());

        assert_eq!(stats.rows, 2);
        let cores = stats.get("Total Cores").unwrap();
        assert_eq!(cores.total, 6.0);
        assert_eq!(cores.mean, Some(3.0));

        // 2*1 + 4*3
        let usage = stats.get("X-Usage").unwrap();
        assert_eq!(usage.total, 14.0);
        assert_eq!(usage.mean, Some(7.0));

        assert!(stats.get("Time Used (Hrs)").is_none());
        assert!(stats.get("CPU Time").is_none());
    }

    #[test]
    fn test_empty_batch_has_no_mean() {
        let stats = AggregateStats::from_rows(&[], &rates());
        assert_eq!(stats.rows, 0);
        assert!(!stats.columns.is_empty());
        assert!(stats.columns.iter().all(|c| c.total == 0.0 && c.mean.is_none()));
    }
}
