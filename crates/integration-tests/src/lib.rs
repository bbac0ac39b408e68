//! Integration tests for Shelf Signals.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shelf-signals-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `forecast_scenarios` - Replenishment forecasts from CSV tables
//! - `trend_scenarios` - Period-over-period trend ranking from CSV tables
//! - `segmentation_boundary` - Customer features and clusterer contract
//! - `input_errors` - Schema and parse failures abort without results
//!
//! This library holds the CSV fixture builders the tests share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::fmt::Write;

use chrono::{Days, NaiveDate};
use shelf_signals::loader::{load_sales, load_stock};
use shelf_signals_core::{SaleRecord, StockRecord};

/// Header of a fully populated sales table.
pub const SALES_HEADER: &str =
    "customer_id,product_id,product_name,date,quantity_sold,unit_price,total_price";

/// Header of a stock table.
pub const STOCK_HEADER: &str = "product_id,product_name,current_stock";

/// Builds a sales CSV one row at a time.
#[derive(Debug, Clone)]
pub struct SalesCsv {
    body: String,
}

impl Default for SalesCsv {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesCsv {
    /// Start a table with the full sales header.
    #[must_use]
    pub fn new() -> Self {
        Self {
            body: format!("{SALES_HEADER}\n"),
        }
    }

    /// Add a sale with customer 1 and a unit price of 2.50.
    #[must_use]
    pub fn sale(self, product_id: i64, date: NaiveDate, quantity: u32) -> Self {
        self.customer_sale(1, product_id, date, quantity, "2.50")
    }

    /// Add one sale per day from `start`, `days` days long, each of `quantity`.
    #[must_use]
    pub fn daily(mut self, product_id: i64, start: NaiveDate, days: u64, quantity: u32) -> Self {
        for offset in 0..days {
            if let Some(date) = start.checked_add_days(Days::new(offset)) {
                self = self.sale(product_id, date, quantity);
            }
        }
        self
    }

    /// Add a fully specified sale.
    #[must_use]
    pub fn customer_sale(
        mut self,
        customer_id: i64,
        product_id: i64,
        date: NaiveDate,
        quantity: u32,
        unit_price: &str,
    ) -> Self {
        let total = unit_price
            .parse::<rust_decimal::Decimal>()
            .map(|p| p * rust_decimal::Decimal::from(quantity))
            .unwrap_or_default();
        let _ = writeln!(
            self.body,
            "{customer_id},{product_id},Product {product_id},{date},{quantity},{unit_price},{total}"
        );
        self
    }

    /// The CSV text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.body
    }

    /// Parse the CSV through the library loader.
    ///
    /// # Panics
    ///
    /// Panics if the fixture itself is malformed.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn load(&self) -> Vec<SaleRecord> {
        load_sales(self.body.as_bytes()).expect("sales fixture should load")
    }
}

/// Build and load a stock table from `(product_id, current_stock)` pairs.
///
/// # Panics
///
/// Panics if the fixture itself is malformed.
#[must_use]
#[allow(clippy::expect_used)]
pub fn stock(levels: &[(i64, u32)]) -> Vec<StockRecord> {
    let mut body = format!("{STOCK_HEADER}\n");
    for (product_id, current) in levels {
        let _ = writeln!(body, "{product_id},Product {product_id},{current}");
    }
    load_stock(body.as_bytes()).expect("stock fixture should load")
}

/// Shorthand for a calendar date.
///
/// # Panics
///
/// Panics on an invalid date.
#[must_use]
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}
