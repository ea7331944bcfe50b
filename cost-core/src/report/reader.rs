use crate::error::{CostError, JobFailure, Result};
use crate::job::{columns, RawJobRecord};
use csv::ReaderBuilder;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Records read from an accounting dump, plus rows too broken to become a
/// record at all.
#[derive(Debug, Default)]
pub struct JobTable {
    pub records: Vec<RawJobRecord>,
    pub rejected: Vec<JobFailure>,
}

impl JobTable {
    pub fn rows_read(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

/// Read `sacct -P` output: pipe-delimited, unquoted, header first.
///
/// Bytes that are not UTF-8 are replaced rather than rejected; older
/// accounting dumps are often Latin-1.
pub fn read_jobs<R: Read>(source: R) -> Result<JobTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .quoting(false)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| lossy(h).trim().to_string())
        .collect();

    for column in columns::REQUIRED {
        if !headers.iter().any(|h| h == column) {
            return Err(CostError::MissingColumn(column.to_string()));
        }
    }
    debug!(?headers, "Read accounting header");

    let mut table = JobTable::default();
    for (row, result) in reader.byte_records().enumerate() {
        let record = result?;

        if record.len() != headers.len() {
            let failure = JobFailure::Malformed {
                row,
                reason: format!("expected {} fields, found {}", headers.len(), record.len()),
            };
            warn!(row, error = %failure, "Skipping job");
            table.rejected.push(failure);
            continue;
        }

        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|value| lossy(value).into_owned()))
            .collect();
        table.records.push(RawJobRecord::new(row, fields));
    }

    Ok(table)
}

pub fn read_jobs_from_path(path: &Path) -> Result<JobTable> {
    let file = File::open(path)?;
    read_jobs(file)
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
