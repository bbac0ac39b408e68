//! Core types for Shelf Signals.
//!
//! This module provides type-safe wrappers for the retail domain: the input
//! tables, the derived aggregates and the structured results.

pub mod id;
pub mod record;
pub mod result;
pub mod status;
pub mod window;

pub use id::*;
pub use record::{DailyAggregate, SaleRecord, StockRecord};
pub use result::{CustomerFeatures, CustomerSegment, ForecastResult, TrendResult};
pub use status::*;
pub use window::DateWindow;
