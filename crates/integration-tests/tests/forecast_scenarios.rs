//! Integration tests for replenishment forecasting.
//!
//! These tests load CSV tables through the public loader and run the
//! forecaster end to end with a pinned clock.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use rust_decimal_macros::dec;
use shelf_signals::SignalsConfig;
use shelf_signals::clock::FixedClock;
use shelf_signals::forecast::{ForecastConfig, ReplenishmentForecaster, VelocityReference};
use shelf_signals_core::{Priority, ProductId};
use shelf_signals_integration_tests::{SalesCsv, date, stock};

fn forecaster() -> ReplenishmentForecaster<FixedClock> {
    ReplenishmentForecaster::new(ForecastConfig::default()).with_clock(FixedClock(date(2024, 3, 1)))
}

// =============================================================================
// Reference Scenario
// =============================================================================

#[test]
fn test_week_of_single_sales_with_two_weeks_of_stock() {
    let sales = SalesCsv::new().daily(1, date(2024, 1, 1), 7, 1).load();
    let results = forecaster().forecast(&stock(&[(1, 14)]), &sales);

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.product_id, ProductId::new(1));
    assert_eq!(result.avg_daily_sales, dec!(1.0));
    assert_eq!(result.predicted_stockout_in_days, 14);
    assert_eq!(result.suggested_refill_qty, 7);
    assert_eq!(result.priority, Priority::Low);
    assert_eq!(result.predicted_stockout_date, date(2024, 3, 15));
}

#[test]
fn test_forecast_json_output() {
    let sales = SalesCsv::new().daily(1, date(2024, 1, 1), 7, 1).load();
    let results = forecaster().forecast(&stock(&[(1, 14)]), &sales);
    let json = serde_json::to_value(&results).unwrap();

    let entry = &json[0];
    assert_eq!(entry["product_id"], 1);
    assert_eq!(entry["product_name"], "Product 1");
    assert_eq!(entry["current_stock"], 14);
    assert_eq!(entry["avg_daily_sales"], 1.0);
    assert_eq!(entry["predicted_stockout_in_days"], 14);
    assert_eq!(entry["predicted_stockout_date"], "2024-03-15");
    assert_eq!(entry["suggested_refill_qty"], 7);
    assert_eq!(entry["priority"], "LOW");
}

// =============================================================================
// Exclusion Policy
// =============================================================================

#[test]
fn test_products_without_sales_are_excluded() {
    let sales = SalesCsv::new().sale(1, date(2024, 1, 1), 2).load();
    let results = forecaster().forecast(&stock(&[(1, 5), (2, 5), (3, 0)]), &sales);

    let ids: Vec<_> = results.iter().map(|r| r.product_id).collect();
    assert_eq!(ids, vec![ProductId::new(1)]);
}

#[test]
fn test_every_result_is_stocked_and_positive_velocity() {
    let sales = SalesCsv::new()
        .daily(1, date(2024, 1, 1), 10, 3)
        .daily(2, date(2024, 1, 5), 2, 0)
        .sale(4, date(2024, 1, 2), 1)
        .load();
    let stocked = stock(&[(1, 40), (2, 3), (3, 9)]);
    let results = forecaster().forecast(&stocked, &sales);

    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(stocked.iter().any(|s| s.product_id == result.product_id));
        assert!(result.avg_daily_sales > dec!(0));
    }
}

// =============================================================================
// Fallback Velocity
// =============================================================================

#[test]
fn test_zero_sales_window_uses_one_unit_per_day() {
    let sales = SalesCsv::new().daily(1, date(2024, 1, 1), 7, 0).load();
    let results = forecaster().forecast(&stock(&[(1, 20)]), &sales);

    assert_eq!(results[0].avg_daily_sales, dec!(1));
    assert_eq!(results[0].suggested_refill_qty, 7);
    assert_eq!(results[0].predicted_stockout_in_days, 20);
}

// =============================================================================
// Priority Boundaries
// =============================================================================

#[test]
fn test_priority_boundaries_at_one_unit_per_day() {
    let sales = SalesCsv::new()
        .sale(3, date(2024, 1, 1), 1)
        .sale(4, date(2024, 1, 1), 1)
        .sale(7, date(2024, 1, 1), 1)
        .sale(8, date(2024, 1, 1), 1)
        .load();
    let results = forecaster().forecast(&stock(&[(3, 3), (4, 4), (7, 7), (8, 8)]), &sales);

    let by_days: Vec<_> = results
        .iter()
        .map(|r| (r.predicted_stockout_in_days, r.priority))
        .collect();
    assert_eq!(
        by_days,
        vec![
            (3, Priority::High),
            (4, Priority::Medium),
            (7, Priority::Medium),
            (8, Priority::Low),
        ]
    );
}

// =============================================================================
// Reference Date Conventions
// =============================================================================

#[test]
fn test_velocity_reference_and_projection_date_are_independent() {
    // Heavy sales early in January, light sales late in January
    let sales = SalesCsv::new()
        .daily(1, date(2024, 1, 1), 7, 10)
        .daily(1, date(2024, 1, 25), 7, 2)
        .load();
    let stocked = stock(&[(1, 20)]);

    let latest = forecaster().forecast(&stocked, &sales);
    assert_eq!(latest[0].velocity_reference_date, date(2024, 1, 31));
    assert_eq!(latest[0].avg_daily_sales, dec!(2));
    assert_eq!(latest[0].predicted_stockout_date, date(2024, 3, 11));

    let config = ForecastConfig {
        reference: VelocityReference::Fixed(date(2024, 1, 7)),
        ..ForecastConfig::default()
    };
    let pinned = ReplenishmentForecaster::new(config)
        .with_clock(FixedClock(date(2024, 3, 1)))
        .forecast(&stocked, &sales);
    assert_eq!(pinned[0].velocity_reference_date, date(2024, 1, 7));
    assert_eq!(pinned[0].avg_daily_sales, dec!(10));
    assert_eq!(pinned[0].predicted_stockout_in_days, 2);
    assert_eq!(pinned[0].predicted_stockout_date, date(2024, 3, 3));
}

#[test]
fn test_longer_velocity_window() {
    let sales = SalesCsv::new()
        .daily(1, date(2024, 1, 1), 7, 10)
        .daily(1, date(2024, 1, 8), 7, 2)
        .load();
    let config = ForecastConfig {
        velocity_window_days: 14,
        ..ForecastConfig::default()
    };
    let results = ReplenishmentForecaster::new(config)
        .with_clock(FixedClock(date(2024, 3, 1)))
        .forecast(&stock(&[(1, 60)]), &sales);

    assert_eq!(results[0].avg_daily_sales, dec!(6));
    assert_eq!(results[0].predicted_stockout_in_days, 10);
    assert_eq!(results[0].suggested_refill_qty, 42);
}

#[test]
fn test_year_long_window_from_env_keeps_rate_positive() {
    let config = SignalsConfig::from_lookup(|key| {
        (key == "SIGNALS_VELOCITY_WINDOW_DAYS").then(|| "365".to_string())
    })
    .unwrap();
    let sales = SalesCsv::new()
        .sale(1, date(2023, 1, 1), 1)
        .daily(1, date(2023, 1, 2), 336, 0)
        .load();
    let results = ReplenishmentForecaster::new(config.forecast)
        .with_clock(FixedClock(date(2024, 3, 1)))
        .forecast(&stock(&[(1, 10)]), &sales);

    assert_eq!(results[0].avg_daily_sales, dec!(0.01));
    assert_eq!(results[0].predicted_stockout_in_days, 3370);
    assert_eq!(results[0].suggested_refill_qty, 0);

    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json[0]["avg_daily_sales"], 0.01);
}

// =============================================================================
// Empty Input
// =============================================================================

#[test]
fn test_empty_sales_table_yields_empty_forecast() {
    let sales = SalesCsv::new().load();
    assert!(forecaster().forecast(&stock(&[(1, 5)]), &sales).is_empty());
}
