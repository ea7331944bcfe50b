use super::row::ResultRow;
use super::stats::AggregateStats;
use crate::cost::{estimate, ProviderRateTable};
use crate::error::{Basis, CostError, JobFailure, Result};
use crate::job::{columns, normalize, RawJobRecord};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Everything a batch run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// Priced jobs in input order.
    pub rows: Vec<ResultRow>,
    /// Jobs left out, in input order.
    pub failures: Vec<JobFailure>,
    pub stats: AggregateStats,
}

impl BatchOutcome {
    pub fn records_seen(&self) -> usize {
        self.rows.len() + self.failures.len()
    }
}

/// Normalize one record and price it twice: once from what the job used,
/// once from what it asked for.
pub fn process_record(
    rates: &ProviderRateTable,
    record: &RawJobRecord,
) -> std::result::Result<ResultRow, JobFailure> {
    let job = normalize(record)?;
    let job_id = record.job_id().map(str::to_string);

    let failed = |basis: Basis| {
        let job_id = job_id.clone();
        move |source| JobFailure::Estimation {
            row: record.row,
            job_id,
            basis,
            source,
        }
    };

    let usage = estimate(rates, job.cores, job.used_mem_gb, job.elapsed_hours)
        .map_err(failed(Basis::Usage))?;
    let requested = estimate(rates, job.cores, job.req_mem_gb, job.requested_hours)
        .map_err(failed(Basis::Requested))?;

    Ok(ResultRow {
        row: record.row,
        job_id,
        job,
        cpu_time: record
            .get(columns::CPU_TIME_RAW)
            .unwrap_or_default()
            .to_string(),
        usage,
        requested,
    })
}

/// Prices a whole accounting table. A bad job is logged and skipped; it never
/// stops the rest of the batch.
pub struct BatchProcessor {
    rates: Arc<ProviderRateTable>,
}

impl BatchProcessor {
    pub fn new(rates: ProviderRateTable) -> Self {
        Self {
            rates: Arc::new(rates),
        }
    }

    pub fn rates(&self) -> &ProviderRateTable {
        &self.rates
    }

    pub fn process(&self, records: &[RawJobRecord]) -> BatchOutcome {
        let started = Instant::now();
        info!(records = records.len(), "Pricing jobs");

        let results = records
            .iter()
            .map(|record| process_record(&self.rates, record))
            .collect();

        self.finish(results, started)
    }

    /// Same result as [`BatchProcessor::process`], with the records split into
    /// contiguous chunks priced on the blocking pool.
    pub async fn process_parallel(
        &self,
        records: Vec<RawJobRecord>,
        workers: usize,
    ) -> Result<BatchOutcome> {
        let started = Instant::now();
        let total = records.len();
        let chunk_size = total.div_ceil(workers.max(1)).max(1);
        info!(records = total, workers, chunk_size, "Pricing jobs in parallel");

        let mut handles = Vec::new();
        let mut remaining = records.into_iter();
        loop {
            let chunk: Vec<RawJobRecord> = remaining.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            let rates = Arc::clone(&self.rates);
            handles.push(tokio::task::spawn_blocking(move || {
                chunk
                    .iter()
                    .map(|record| process_record(&rates, record))
                    .collect::<Vec<_>>()
            }));
        }

        // Awaiting in spawn order keeps input order.
        let mut results = Vec::with_capacity(total);
        for handle in handles {
            let chunk = handle
                .await
                .map_err(|e| CostError::Worker(e.to_string()))?;
            results.extend(chunk);
        }

        Ok(self.finish(results, started))
    }

    fn finish(
        &self,
        results: Vec<std::result::Result<ResultRow, JobFailure>>,
        started: Instant,
    ) -> BatchOutcome {
        let mut rows = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for result in results {
            match result {
                Ok(row) => rows.push(row),
                Err(failure) => {
                    log_failure(&failure);
                    failures.push(failure);
                }
            }
        }

        let stats = AggregateStats::from_rows(&rows, &self.rates);

        info!(
            priced = rows.len(),
            skipped = failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Finished pricing jobs"
        );

        BatchOutcome {
            rows,
            failures,
            stats,
        }
    }
}

fn log_failure(failure: &JobFailure) {
    let (field, value) = match failure {
        JobFailure::Normalization(e) => (Some(e.source.field()), e.source.value()),
        _ => (None, None),
    };
    warn!(
        row = failure.row(),
        job_id = failure.job_id(),
        field,
        value,
        error = %failure,
        "Skipping job"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::ProviderRate;
    use crate::error::{EstimationError, ParseError};

    fn rates() -> ProviderRateTable {
        ProviderRateTable::from_providers(vec![ProviderRate::new("X", 1.0, 2.0)]).unwrap()
    }

    fn job(row: usize, cpus: &str, elapsed: &str, req_mem: &str) -> RawJobRecord {
        RawJobRecord::from_pairs(
            row,
            [
                ("JobID", format!("j{}", row)),
                ("ReqNodes", "1".to_string()),
                ("AllocCPUS", cpus.to_string()),
                ("Elapsed", elapsed.to_string()),
                ("Timelimit", "04:00:00".to_string()),
                ("ReqMem", req_mem.to_string()),
                ("MaxRSS", "1000000K".to_string()),
                ("CPUTimeRAW", "3600".to_string()),
            ],
        )
    }

    #[test]
    fn test_process_record_prices_usage_and_request() {
        let row = process_record(&rates(), &job(0, "2", "03:24:00", "2Gc")).unwrap();
        assert_eq!(row.job_id.as_deref(), Some("j0"));
        assert_eq!(row.cpu_time, "3600");
        // 2 cores, 1 GB used, 3.4 h -> 2 seats * 4 h
        assert_eq!(row.usage.get("X"), Some(8.0));
        // 2 cores, 4 GB requested, 4 h -> 2 seats * 4 h
        assert_eq!(row.requested.get("X"), Some(8.0));
    }

    #[test]
    fn test_zero_cores_is_estimation_failure() {
        let failure = process_record(&rates(), &job(5, "0", "01:00:00", "4G")).unwrap_err();
        assert_eq!(
            failure,
            JobFailure::Estimation {
                row: 5,
                job_id: Some("j5".to_string()),
                basis: Basis::Usage,
                source: EstimationError::NonPositiveCores(0.0),
            }
        );
    }

    #[test]
    fn test_one_bad_record_does_not_stop_the_batch() {
        let records = vec![
            job(0, "1", "01:00:00", "4G"),
            job(1, "2", "garbage", "4G"),
            job(2, "4", "02:00:00", "16G"),
            job(3, "8", "00:30:00", "1Gc"),
        ];
        let outcome = BatchProcessor::new(rates()).process(&records);

        assert_eq!(outcome.rows.len(), 3);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.records_seen(), 4);
        assert_eq!(outcome.failures[0].row(), 1);
        match &outcome.failures[0] {
            JobFailure::Normalization(e) => {
                assert!(matches!(e.source, ParseError::Duration { field: "Elapsed", .. }))
            }
            other => panic!("unexpected failure {:?}", other),
        }

        let order: Vec<usize> = outcome.rows.iter().map(|r| r.row).collect();
        assert_eq!(order, vec![0, 2, 3]);
        assert_eq!(outcome.stats.rows, 3);
        assert_eq!(outcome.stats.get("Total Cores").unwrap().total, 13.0);
    }

    #[test]
    fn test_rerun_is_identical() {
        let records: Vec<RawJobRecord> = (0..20)
            .map(|i| job(i, &(1 + i % 5).to_string(), &format!("{:02}:15:00", i), "3Gc"))
            .collect();
        let processor = BatchProcessor::new(ProviderRateTable::new());
        assert_eq!(processor.process(&records), processor.process(&records));
    }

    #[tokio::test]
    async fn test_parallel_matches_sequential() {
        let records: Vec<RawJobRecord> = (0..37)
            .map(|i| {
                let elapsed = if i % 9 == 4 {
                    "bad".to_string()
                } else {
                    format!("{}-01:00:00", i % 3)
                };
                job(i, &(1 + i % 7).to_string(), &elapsed, "5Gc")
            })
            .collect();
        let processor = BatchProcessor::new(ProviderRateTable::new());

        let sequential = processor.process(&records);
        for workers in [1, 2, 4, 64] {
            let parallel = processor.process_parallel(records.clone(), workers).await.unwrap();
            assert_eq!(parallel, sequential);
        }
    }

    #[tokio::test]
    async fn test_parallel_empty_input() {
        let outcome = BatchProcessor::new(rates()).process_parallel(Vec::new(), 4).await.unwrap();
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.stats.rows, 0);
    }
}
