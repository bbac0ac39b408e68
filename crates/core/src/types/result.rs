//! Structured results produced by the engines.
//!
//! All results serialize to flat JSON objects: IDs as integers, dates as
//! `YYYY-MM-DD` strings and decimals as JSON numbers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, ProductId};
use super::status::{Priority, SegmentLabel, Trend};

/// Replenishment forecast for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_id: ProductId,
    pub product_name: String,
    pub current_stock: u32,
    /// Units per day over the trailing window, rounded to 2 places.
    /// Always strictly positive.
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_daily_sales: Decimal,
    pub predicted_stockout_in_days: u64,
    pub predicted_stockout_date: NaiveDate,
    pub suggested_refill_qty: u64,
    pub priority: Priority,
    /// Date the trailing velocity window ended on.
    pub velocity_reference_date: NaiveDate,
}

/// Period-over-period sales movement for a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendResult {
    pub product_id: ProductId,
    pub product_name: String,
    pub sales_this_period: u64,
    pub sales_last_period: u64,
    /// Rounded to 2 places.
    #[serde(with = "rust_decimal::serde::float")]
    pub growth_percent: Decimal,
    pub trend: Trend,
}

/// Per-customer behaviour features handed to a clustering routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFeatures {
    pub customer_id: CustomerId,
    pub total_quantity: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub mean_unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spend: Decimal,
}

/// A customer with its assigned segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSegment {
    pub customer_id: CustomerId,
    pub quantity_sold: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    /// Group id as returned by the clustering routine. Not stable across runs.
    pub segment: usize,
    pub segment_label: SegmentLabel,
}
