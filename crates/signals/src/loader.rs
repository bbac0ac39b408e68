//! CSV table loaders.
//!
//! Parses the sales and stock tables into typed records.
//!
//! Sales columns: `product_id, product_name, date, quantity_sold` are
//! required; `customer_id, unit_price, total_price` are read when present.
//!
//! Stock columns: `product_id, product_name, current_stock`, all required.
//!
//! A completely empty input (no header row) loads as an empty table. A
//! header row missing a required column is a [`SchemaError`]; a malformed
//! number is a [`SchemaError`]; a malformed date is a [`ParseError`]. Any of
//! these aborts the load with no partial result.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{Position, StringRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shelf_signals_core::{CustomerId, ProductId, SaleRecord, StockRecord};
use tracing::{debug, instrument};

use crate::error::{ParseError, Result, SchemaError, SignalsError, Table};

/// Columns the engines read from the sales table.
pub const SALES_REQUIRED_COLUMNS: &[&str] =
    &["product_id", "product_name", "date", "quantity_sold"];

/// Columns of the stock table.
pub const STOCK_REQUIRED_COLUMNS: &[&str] = &["product_id", "product_name", "current_stock"];

#[derive(Debug, Deserialize)]
struct SaleRow {
    product_id: ProductId,
    product_name: String,
    #[serde(default)]
    customer_id: Option<CustomerId>,
    date: String,
    quantity_sold: u32,
    #[serde(default)]
    unit_price: Option<String>,
    #[serde(default)]
    total_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StockRow {
    product_id: ProductId,
    product_name: String,
    current_stock: u32,
}

/// Load sales records from a CSV reader.
///
/// # Errors
///
/// Returns [`SignalsError::Schema`] if a required column is missing or a
/// numeric cell is malformed, and [`SignalsError::Parse`] if a date cell is
/// not a calendar date.
#[instrument(skip(reader))]
pub fn load_sales<R: Read>(reader: R) -> Result<Vec<SaleRecord>> {
    let records = read_table(reader, Table::Sales, SALES_REQUIRED_COLUMNS, |row: SaleRow, line| {
        Ok(SaleRecord {
            product_id: row.product_id,
            product_name: row.product_name,
            customer_id: row.customer_id,
            date: parse_date(&row.date, Table::Sales, line)?,
            quantity_sold: row.quantity_sold,
            unit_price: parse_price(row.unit_price.as_deref(), "unit_price", line)?,
            total_price: parse_price(row.total_price.as_deref(), "total_price", line)?,
        })
    })?;

    debug!(records = records.len(), "Loaded sales table");
    Ok(records)
}

/// Load sales records from a CSV file path.
///
/// # Errors
///
/// Returns [`SignalsError::Io`] if the file cannot be opened, otherwise the
/// same errors as [`load_sales`].
pub fn load_sales_file(path: impl AsRef<Path>) -> Result<Vec<SaleRecord>> {
    load_sales(open(path.as_ref())?)
}

/// Load stock records from a CSV reader.
///
/// # Errors
///
/// Returns [`SignalsError::Schema`] if a required column is missing or a
/// stock level is not a non-negative integer.
#[instrument(skip(reader))]
pub fn load_stock<R: Read>(reader: R) -> Result<Vec<StockRecord>> {
    let records = read_table(reader, Table::Stock, STOCK_REQUIRED_COLUMNS, |row: StockRow, _| {
        Ok(StockRecord {
            product_id: row.product_id,
            product_name: row.product_name,
            current_stock: row.current_stock,
        })
    })?;

    debug!(records = records.len(), "Loaded stock table");
    Ok(records)
}

/// Load stock records from a CSV file path.
///
/// # Errors
///
/// Returns [`SignalsError::Io`] if the file cannot be opened, otherwise the
/// same errors as [`load_stock`].
pub fn load_stock_file(path: impl AsRef<Path>) -> Result<Vec<StockRecord>> {
    load_stock(open(path.as_ref())?)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| SignalsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_table<R, Row, T, F>(
    reader: R,
    table: Table,
    required: &[&'static str],
    convert: F,
) -> Result<Vec<T>>
where
    R: Read,
    Row: DeserializeOwned,
    F: Fn(Row, u64) -> Result<T>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| SignalsError::Read { table, source })?
        .clone();

    // No header row at all: an empty table, not a malformed one
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    for &column in required {
        if !headers.iter().any(|header| header == column) {
            return Err(SchemaError::MissingColumn { table, column }.into());
        }
    }

    let mut record = StringRecord::new();
    let mut records = Vec::new();
    loop {
        match csv_reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                let line = e.position().map_or(0, Position::line);
                return Err(row_error(table, line, e));
            }
        }

        // Line the record starts on; quoted cells may span several lines
        let line = record.position().map_or(0, Position::line);
        let row: Row = record
            .deserialize(Some(&headers))
            .map_err(|e| row_error(table, line, e))?;
        records.push(convert(row, line)?);
    }

    Ok(records)
}

fn row_error(table: Table, line: u64, error: csv::Error) -> SignalsError {
    if error.is_io_error() {
        SignalsError::Read {
            table,
            source: error,
        }
    } else {
        SchemaError::InvalidValue {
            table,
            line,
            message: error.to_string(),
        }
        .into()
    }
}

/// Parse a `YYYY-MM-DD` date, also accepting a trailing `HH:MM:SS` time.
fn parse_date(value: &str, table: Table, line: u64) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| {
            ParseError::InvalidDate {
                table,
                line,
                value: value.to_string(),
            }
            .into()
        })
}

fn parse_price(value: Option<&str>, column: &str, line: u64) -> Result<Option<Decimal>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let invalid = |message: String| SchemaError::InvalidValue {
        table: Table::Sales,
        line,
        message,
    };

    let price = Decimal::from_str(value)
        .map_err(|e| invalid(format!("{column} `{value}` is not a decimal: {e}")))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid(format!("{column} must not be negative, got {value}")).into());
    }
    Ok(Some(price))
}
