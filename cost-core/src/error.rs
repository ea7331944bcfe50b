use thiserror::Error;
use csv::Error as CsvError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;
use toml::de::Error as TomlError;

/// A scheduler field that could not be turned into a number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("{field}: invalid duration {value:?}: {reason}")]
    Duration {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: invalid memory amount {value:?}: {reason}")]
    Memory {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field}: invalid number {value:?}")]
    Number { field: &'static str, value: String },

    #[error("{field}: value {value:?} is negative or not finite")]
    OutOfRange { field: &'static str, value: String },

    #[error("{field}: missing value")]
    Missing { field: &'static str },
}

impl ParseError {
    /// Re-labels the error with the column it came from.
    pub fn in_field(self, name: &'static str) -> Self {
        match self {
            ParseError::Duration { value, reason, .. } => ParseError::Duration {
                field: name,
                value,
                reason,
            },
            ParseError::Memory { value, reason, .. } => ParseError::Memory {
                field: name,
                value,
                reason,
            },
            ParseError::Number { value, .. } => ParseError::Number { field: name, value },
            ParseError::OutOfRange { value, .. } => ParseError::OutOfRange { field: name, value },
            ParseError::Missing { .. } => ParseError::Missing { field: name },
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            ParseError::Duration { field, .. }
            | ParseError::Memory { field, .. }
            | ParseError::Number { field, .. }
            | ParseError::OutOfRange { field, .. }
            | ParseError::Missing { field } => field,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            ParseError::Duration { value, .. }
            | ParseError::Memory { value, .. }
            | ParseError::Number { value, .. }
            | ParseError::OutOfRange { value, .. } => Some(value),
            ParseError::Missing { .. } => None,
        }
    }
}

/// A raw record that could not be normalized.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("row {row}{}: {source}", job_label(.job_id))]
pub struct NormalizationError {
    pub row: usize,
    pub job_id: Option<String>,
    #[source]
    pub source: ParseError,
}

/// Inputs the seat pricing model refuses to bill.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimationError {
    #[error("core count must be positive, got {0}")]
    NonPositiveCores(f64),

    #[error("memory must be non-negative, got {0} GB")]
    NegativeMemory(f64),

    #[error("duration must be non-negative, got {0} hours")]
    NegativeHours(f64),

    #[error("{0} is not a finite number")]
    NotFinite(&'static str),
}

/// Which resource figures a cost estimate was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    Usage,
    Requested,
}

impl Basis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Basis::Usage => "Usage",
            Basis::Requested => "Requested",
        }
    }
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single job was left out of the results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JobFailure {
    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error("row {row}{}: {basis} estimate: {source}", job_label(.job_id))]
    Estimation {
        row: usize,
        job_id: Option<String>,
        basis: Basis,
        #[source]
        source: EstimationError,
    },

    #[error("row {row}: malformed record: {reason}")]
    Malformed { row: usize, reason: String },
}

impl JobFailure {
    pub fn row(&self) -> usize {
        match self {
            JobFailure::Normalization(e) => e.row,
            JobFailure::Estimation { row, .. } | JobFailure::Malformed { row, .. } => *row,
        }
    }

    pub fn job_id(&self) -> Option<&str> {
        match self {
            JobFailure::Normalization(e) => e.job_id.as_deref(),
            JobFailure::Estimation { job_id, .. } => job_id.as_deref(),
            JobFailure::Malformed { .. } => None,
        }
    }
}

fn job_label(job_id: &Option<String>) -> String {
    match job_id {
        Some(id) => format!(" (job {})", id),
        None => String::new(),
    }
}

/// Failures at the file boundary. These abort the run.
#[derive(Error, Debug)]
pub enum CostError {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Config error: {0}")]
    Config(#[from] TomlError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] JsonError),

    #[error("Input is missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, CostError>;
