use super::{columns, NormalizedJob, RawJobRecord};
use crate::error::{NormalizationError, ParseError};
use crate::units::{parse_gigabytes, parse_hours};

/// Derive a [`NormalizedJob`] from one accounting record.
///
/// Requested memory is resolved against the allocated cores and requested
/// nodes. `MaxRSS` is an observed absolute value and is never scoped.
pub fn normalize(record: &RawJobRecord) -> Result<NormalizedJob, NormalizationError> {
    build(record).map_err(|source| NormalizationError {
        row: record.row,
        job_id: record.job_id().map(str::to_string),
        source,
    })
}

fn build(record: &RawJobRecord) -> Result<NormalizedJob, ParseError> {
    let nodes = count(record, columns::REQ_NODES)?;
    let cores = count(record, columns::ALLOC_CPUS)?;

    let raw = field(record, columns::ELAPSED)?;
    let elapsed_hours = checked(
        columns::ELAPSED,
        raw,
        parse_hours(raw).map_err(|e| e.in_field(columns::ELAPSED))?,
    )?;

    let raw = field(record, columns::TIMELIMIT)?;
    let requested_hours = checked(
        columns::TIMELIMIT,
        raw,
        parse_hours(raw).map_err(|e| e.in_field(columns::TIMELIMIT))?,
    )?;

    let raw = field(record, columns::REQ_MEM)?;
    let req_mem_gb = checked(
        columns::REQ_MEM,
        raw,
        parse_gigabytes(raw, cores, nodes).map_err(|e| e.in_field(columns::REQ_MEM))?,
    )?;

    let raw = field(record, columns::MAX_RSS)?;
    let used_mem_gb = checked(
        columns::MAX_RSS,
        raw,
        parse_gigabytes(raw, 1.0, 1.0).map_err(|e| e.in_field(columns::MAX_RSS))?,
    )?;

    Ok(NormalizedJob {
        nodes,
        cores,
        elapsed_hours,
        requested_hours,
        req_mem_gb,
        used_mem_gb,
    })
}

fn field<'a>(record: &'a RawJobRecord, name: &'static str) -> Result<&'a str, ParseError> {
    match record.get(name).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ParseError::Missing { field: name }),
    }
}

fn count(record: &RawJobRecord, name: &'static str) -> Result<f64, ParseError> {
    let raw = field(record, name)?;
    let value = raw.parse::<f64>().map_err(|_| ParseError::Number {
        field: name,
        value: raw.to_string(),
    })?;
    checked(name, raw, value)
}

/// Reject parsed values that are negative or not finite, reporting the text
/// as it appeared in the input.
fn checked(name: &'static str, raw: &str, value: f64) -> Result<f64, ParseError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParseError::OutOfRange {
            field: name,
            value: raw.to_string(),
        })
    }
}
