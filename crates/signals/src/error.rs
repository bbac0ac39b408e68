//! Unified error handling for signal computations.
//!
//! Every failure here is a deterministic function of malformed input, so
//! errors are reported once and never retried. Arithmetic edge cases
//! (zero velocity, zero prior-period sales) are handled by policy and never
//! surface as errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::segmentation::SegmentationError;

/// Which input table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Sales,
    Stock,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sales => f.write_str("sales"),
            Self::Stock => f.write_str("stock"),
        }
    }
}

/// A required column is missing or holds a value of the wrong type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The header row lacks a column the computation needs.
    #[error("{table} table is missing required column `{column}`")]
    MissingColumn {
        /// Table being read.
        table: Table,
        /// Name of the absent column.
        column: &'static str,
    },

    /// A cell could not be read as the column's type.
    #[error("{table} table line {line}: {message}")]
    InvalidValue {
        /// Table being read.
        table: Table,
        /// 1-based file line (the header is line 1).
        line: u64,
        /// What was wrong with the value.
        message: String,
    },
}

/// A date cell is not a `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{table} table line {line}: `{value}` is not a YYYY-MM-DD date")]
    InvalidDate {
        /// Table being read.
        table: Table,
        /// 1-based file line (the header is line 1).
        line: u64,
        /// The offending cell.
        value: String,
    },
}

/// Top-level error type for the signals library.
#[derive(Debug, Error)]
pub enum SignalsError {
    /// Input table has the wrong shape.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Input table has an unparseable date.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Input file could not be opened.
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        /// Path that was being opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Input stream failed while being read.
    #[error("Failed to read {table} table: {source}")]
    Read {
        /// Table being read.
        table: Table,
        /// Underlying CSV reader failure.
        #[source]
        source: csv::Error,
    },

    /// Segmentation collaborator returned an unusable assignment.
    #[error("Segmentation error: {0}")]
    Segmentation(#[from] SegmentationError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = SignalsError> = std::result::Result<T, E>;
