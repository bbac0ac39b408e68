//! Replenishment forecasting.
//!
//! For every stocked product with sales history:
//! 1. Sum sales per day
//! 2. Average the daily totals over a trailing window ending on the
//!    velocity reference date (by default the product's latest sale)
//! 3. Resolve a missing or zero average through the [`VelocityFallback`]
//! 4. Project days until stockout and count them forward from the [`Clock`]
//! 5. Size a refill to cover a fixed number of days of demand
//! 6. Classify urgency from the stockout horizon
//!
//! Stocked products with no sales at all are skipped, not forecast with a
//! default velocity.

use std::collections::{BTreeMap, HashSet};

use chrono::{Days, NaiveDate};
use shelf_signals_core::{
    DailyAggregate, DateWindow, ForecastResult, Priority, ProductId, SaleRecord, StockRecord,
};
use tracing::{debug, info, instrument};

use crate::aggregate::SalesAggregator;
use crate::clock::{Clock, SystemClock};
use crate::velocity::{UnitVelocityFallback, Velocity, VelocityFallback, resolve_velocity};

/// Stockout horizons (in whole days) that separate urgency levels.
///
/// Each bound is inclusive for the more urgent label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityThresholds {
    /// Horizons up to and including this are [`Priority::High`].
    pub high_max_days: u64,
    /// Horizons up to and including this (and above `high_max_days`) are
    /// [`Priority::Medium`].
    pub medium_max_days: u64,
}

impl Default for PriorityThresholds {
    fn default() -> Self {
        Self {
            high_max_days: 3,
            medium_max_days: 7,
        }
    }
}

impl PriorityThresholds {
    /// Classify a stockout horizon.
    #[must_use]
    pub const fn classify(&self, stockout_days: u64) -> Priority {
        if stockout_days <= self.high_max_days {
            Priority::High
        } else if stockout_days <= self.medium_max_days {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// Which date the trailing velocity window ends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VelocityReference {
    /// Each product's most recent sale date.
    #[default]
    LatestSale,
    /// The same fixed date for every product.
    Fixed(NaiveDate),
}

/// Tunables for [`ReplenishmentForecaster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastConfig {
    /// Length of the trailing velocity window in days.
    pub velocity_window_days: u32,
    /// Days of demand a suggested refill should cover.
    pub refill_cover_days: u32,
    /// Urgency cut-offs.
    pub priority_thresholds: PriorityThresholds,
    /// End date of the velocity window.
    pub reference: VelocityReference,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            velocity_window_days: 7,
            refill_cover_days: 7,
            priority_thresholds: PriorityThresholds::default(),
            reference: VelocityReference::LatestSale,
        }
    }
}

/// Projects stockouts and refill quantities from sales velocity.
///
/// Velocity is measured against historical sale dates while the stockout
/// date is projected from the clock's "today". The two dates are configured
/// independently through [`VelocityReference`] and the [`Clock`].
#[derive(Debug, Clone)]
pub struct ReplenishmentForecaster<C = SystemClock, F = UnitVelocityFallback> {
    config: ForecastConfig,
    clock: C,
    fallback: F,
}

impl ReplenishmentForecaster {
    /// Create a forecaster using the wall clock and the one-unit-per-day
    /// fallback.
    #[must_use]
    pub const fn new(config: ForecastConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
            fallback: UnitVelocityFallback,
        }
    }
}

impl<C: Clock, F: VelocityFallback> ReplenishmentForecaster<C, F> {
    /// Replace the clock stockout dates are projected from.
    #[must_use]
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ReplenishmentForecaster<C2, F> {
        ReplenishmentForecaster {
            config: self.config,
            clock,
            fallback: self.fallback,
        }
    }

    /// Replace the policy for missing or zero velocity.
    #[must_use]
    pub fn with_fallback<F2: VelocityFallback>(
        self,
        fallback: F2,
    ) -> ReplenishmentForecaster<C, F2> {
        ReplenishmentForecaster {
            config: self.config,
            clock: self.clock,
            fallback,
        }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast replenishment for every stocked product with sales history.
    ///
    /// Results follow the stock table's order. When a product appears in
    /// the stock table more than once, its first row is used. Sales for
    /// products that are not stocked are ignored.
    #[instrument(skip_all, fields(stock = stock.len(), sales = sales.len()))]
    pub fn forecast(&self, stock: &[StockRecord], sales: &[SaleRecord]) -> Vec<ForecastResult> {
        let mut daily_by_product: BTreeMap<ProductId, Vec<DailyAggregate>> = BTreeMap::new();
        for day in SalesAggregator::new(sales).daily_by_product() {
            daily_by_product.entry(day.product_id).or_default().push(day);
        }

        let today = self.clock.today();
        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for item in stock {
            if !seen.insert(item.product_id) {
                continue;
            }

            let Some(daily) = daily_by_product.get(&item.product_id) else {
                debug!(product_id = %item.product_id, "No sales history, skipping");
                continue;
            };

            if let Some(result) = self.forecast_product(item, daily, today) {
                results.push(result);
            }
        }

        info!(forecasts = results.len(), "Replenishment forecast complete");
        results
    }

    fn forecast_product(
        &self,
        item: &StockRecord,
        daily: &[DailyAggregate],
        today: NaiveDate,
    ) -> Option<ForecastResult> {
        let reference = match self.config.reference {
            VelocityReference::LatestSale => daily.iter().map(|d| d.date).max()?,
            VelocityReference::Fixed(date) => date,
        };

        let observed = trailing_velocity(daily, reference, self.config.velocity_window_days);
        let velocity = resolve_velocity(&self.fallback, observed);
        if observed != Some(velocity) {
            debug!(
                product_id = %item.product_id,
                observed = ?observed,
                "Trailing velocity unusable, fallback applied"
            );
        }

        let stockout_days = velocity.days_to_deplete(u64::from(item.current_stock));
        let predicted_stockout_date = today
            .checked_add_days(Days::new(stockout_days))
            .unwrap_or(NaiveDate::MAX);

        Some(ForecastResult {
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            current_stock: item.current_stock,
            avg_daily_sales: velocity.per_day_rounded(),
            predicted_stockout_in_days: stockout_days,
            predicted_stockout_date,
            suggested_refill_qty: velocity.demand_over(u64::from(self.config.refill_cover_days)),
            priority: self.config.priority_thresholds.classify(stockout_days),
            velocity_reference_date: reference,
        })
    }
}

/// Mean of daily totals that fall in the `days`-long window ending on
/// `reference`. Days without any sale records do not count toward the mean.
fn trailing_velocity(
    daily: &[DailyAggregate],
    reference: NaiveDate,
    days: u32,
) -> Option<Velocity> {
    let window = DateWindow::trailing(reference, days);
    let (units, sale_days) = daily
        .iter()
        .filter(|d| window.contains(d.date))
        .fold((0_u64, 0_u64), |(units, count), d| (units + d.quantity_sold, count + 1));
    Velocity::new(units, sale_days)
}
