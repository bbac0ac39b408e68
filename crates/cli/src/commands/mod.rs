//! CLI subcommands.

use std::io::{self, Write};

use serde::Serialize;
use shelf_signals::{ConfigError, SignalsError};
use thiserror::Error;

pub mod features;
pub mod forecast;
pub mod trends;

/// Errors surfaced by a subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Signals(#[from] SignalsError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid argument {0}: {1}")]
    InvalidArgument(&'static str, String),
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Write `value` to stdout as pretty-printed JSON followed by a newline.
fn write_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
