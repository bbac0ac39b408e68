//! Shelf Signals Core - Shared types library.
//!
//! This crate provides common types used across all Shelf Signals components:
//! - `signals` - Aggregation, replenishment forecasting and trend analysis
//! - `cli` - Command-line entry point that reads CSV tables and prints JSON
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no CSV parsing, no clocks.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, input records, derived results and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
