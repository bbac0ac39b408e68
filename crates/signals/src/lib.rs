//! Shelf Signals - retail operational signals from transaction logs.
//!
//! Turns a sales table (and, for forecasting, a stock snapshot) into
//! structured, JSON-serializable results:
//!
//! - [`forecast`] - when each product runs out and how much to reorder
//! - [`trends`] - which products are rising, falling or steady versus the
//!   previous period
//! - [`segmentation`] - the boundary to an external customer clustering
//!   routine
//!
//! # Architecture
//!
//! Every operation is a synchronous batch computation over read-only input
//! slices. [`aggregate::SalesAggregator`] is the shared leaf that both
//! engines use for windowed per-product totals. The only inputs that are
//! not data, the current date and the zero-velocity fallback, are injected
//! through the [`clock::Clock`] and [`velocity::VelocityFallback`] traits.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use shelf_signals::clock::FixedClock;
//! use shelf_signals::forecast::{ForecastConfig, ReplenishmentForecaster};
//! use shelf_signals::loader::{load_sales, load_stock};
//!
//! let sales = load_sales(
//!     "product_id,product_name,date,quantity_sold\n1,Dried Mango,2024-01-07,7\n".as_bytes(),
//! )?;
//! let stock = load_stock("product_id,product_name,current_stock\n1,Dried Mango,14\n".as_bytes())?;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap_or_default();
//! let forecasts = ReplenishmentForecaster::new(ForecastConfig::default())
//!     .with_clock(FixedClock(today))
//!     .forecast(&stock, &sales);
//!
//! assert_eq!(forecasts.len(), 1);
//! assert_eq!(forecasts.first().map(|f| f.predicted_stockout_in_days), Some(2));
//! # Ok::<(), shelf_signals::SignalsError>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregate;
pub mod clock;
pub mod config;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod segmentation;
pub mod trends;
pub mod velocity;

pub use config::{ConfigError, SignalsConfig};
pub use error::{ParseError, Result, SchemaError, SignalsError, Table};
pub use forecast::{ForecastConfig, ReplenishmentForecaster};
pub use segmentation::{Clusterer, SegmentationAdapter, SegmentationError};
pub use trends::{TrendAnalyzer, TrendConfig};
