use crate::batch::{AggregateStats, BatchOutcome, ColumnStats, ResultRow};
use crate::cost::ProviderRateTable;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Write one comma-separated line per priced job, header first.
pub fn write_results<W: Write>(
    sink: W,
    rates: &ProviderRateTable,
    rows: &[ResultRow],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(ResultRow::header(rates))?;
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_results_to_path(
    path: &Path,
    rates: &ProviderRateTable,
    rows: &[ResultRow],
) -> Result<()> {
    let file = File::create(path)?;
    write_results(BufWriter::new(file), rates, rows)
}

/// Run summary written next to the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub rows_read: usize,
    pub rows_succeeded: usize,
    pub rows_failed: usize,
    pub columns: Vec<ColumnStats>,
}

impl Summary {
    /// `rejected` counts rows dropped before pricing (malformed lines).
    pub fn new(input: &Path, outcome: &BatchOutcome, rejected: usize) -> Self {
        Self {
            generated_at: Utc::now(),
            input: input.display().to_string(),
            rows_read: outcome.records_seen() + rejected,
            rows_succeeded: outcome.rows.len(),
            rows_failed: outcome.failures.len() + rejected,
            columns: outcome.stats.columns.clone(),
        }
    }
}

pub fn write_summary(path: &Path, summary: &Summary) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn log_summary(stats: &AggregateStats) {
    info!(rows = stats.rows, "Aggregate totals");
    for column in &stats.columns {
        info!(
            column = %column.name,
            total = column.total,
            mean = column.mean,
            "Column summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchProcessor;
    use crate::cost::ProviderRate;
    use crate::job::RawJobRecord;

    fn outcome() -> (ProviderRateTable, BatchOutcome) {
        let rates =
            ProviderRateTable::from_providers(vec![ProviderRate::new("X", 1.0, 2.0)]).unwrap();
        let records = vec![
            RawJobRecord::from_pairs(
                0,
                [
                    ("JobID", "7"),
                    ("ReqNodes", "1"),
                    ("AllocCPUS", "2"),
                    ("Elapsed", "03:24:00"),
                    ("Timelimit", "4"),
                    ("ReqMem", "4G"),
                    ("MaxRSS", "4G"),
                    ("CPUTimeRAW", "24480"),
                ],
            ),
            RawJobRecord::from_pairs(1, [("JobID", "8")]),
        ];
        let outcome = BatchProcessor::new(rates.clone()).process(&records);
        (rates, outcome)
    }

    #[test]
    fn test_write_results_csv() {
        let (rates, outcome) = outcome();
        let mut buffer = Vec::new();
        write_results(&mut buffer, &rates, &outcome.rows).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            concat!(
                "JobID,Nodes,Total Cores,CPU Time,",
                "Total Memory Requested (GB),Total Memory Used (GB),",
                "Time Used (Hrs),Time Requested (Hrs),X-Usage,X-Requested",
            )
        );
        assert!(lines[1].starts_with("7,1,2,24480,4,4,"));
        assert!(lines[1].ends_with(",8,8"));
    }

    #[test]
    fn test_summary_counts_and_json() {
        let (_, outcome) = outcome();
        let summary = Summary::new(Path::new("jobs.txt"), &outcome, 2);
        assert_eq!(summary.rows_read, 4);
        assert_eq!(summary.rows_succeeded, 1);
        assert_eq!(summary.rows_failed, 3);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary(&path, &summary).unwrap();

        let loaded: Summary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, summary);
        assert_eq!(loaded.columns.iter().find(|c| c.name == "X-Usage").unwrap().total, 8.0);
    }
}
