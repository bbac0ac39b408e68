//! Input rows and the aggregates derived from them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, ProductId};

/// One transaction line from the sales table.
///
/// `customer_id`, `unit_price` and `total_price` are optional because the
/// forecasting and trend engines only read product, date and quantity;
/// sales exports without customer data are still valid input for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub product_id: ProductId,
    pub product_name: String,
    pub customer_id: Option<CustomerId>,
    pub date: NaiveDate,
    pub quantity_sold: u32,
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
}

/// Current on-hand quantity for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_id: ProductId,
    pub product_name: String,
    pub current_stock: u32,
}

/// Units sold of one product on one day, summed over that day's records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAggregate {
    pub product_id: ProductId,
    pub date: NaiveDate,
    pub quantity_sold: u64,
}
