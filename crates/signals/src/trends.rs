//! Period-over-period sales trend analysis.
//!
//! Compares each product's sales in the latest `period_days` against the
//! `period_days` before that. Both windows are anchored on the latest sale
//! date in the whole table, not on each product's own history.

use rust_decimal::Decimal;
use shelf_signals_core::{DateWindow, ProductId, SaleRecord, Trend, TrendResult};
use tracing::{debug, info, instrument};

use crate::aggregate::SalesAggregator;

/// Tunables for [`TrendAnalyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendConfig {
    /// Growth strictly above this is rising, strictly below its negation is
    /// falling. The bounds themselves are steady.
    pub threshold_percent: Decimal,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            threshold_percent: Decimal::TEN,
        }
    }
}

impl TrendConfig {
    /// Classify a growth percentage.
    #[must_use]
    pub fn classify(&self, growth_percent: Decimal) -> Trend {
        if growth_percent > self.threshold_percent {
            Trend::Rising
        } else if growth_percent < -self.threshold_percent {
            Trend::Falling
        } else {
            Trend::Steady
        }
    }
}

/// Growth of `this_sales` over `prev_sales` in percent, rounded to 2 places.
///
/// Zero prior sales divide by one instead, so a product going from 0 to 50
/// units reports 5000% growth.
#[must_use]
pub fn growth_percent(this_sales: u64, prev_sales: u64) -> Decimal {
    let delta = Decimal::from(this_sales) - Decimal::from(prev_sales);
    let base = Decimal::from(prev_sales.max(1));
    (delta * Decimal::ONE_HUNDRED / base).round_dp(2)
}

/// Ranks products by recent sales and labels their trend.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    /// Create an analyzer.
    #[must_use]
    pub const fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// The `top_n` best-selling products of the latest period, with growth
    /// against the period before.
    ///
    /// Only products sold in the latest period are ranked. Results are
    /// ordered by latest-period sales descending, ties by ascending product
    /// id.
    #[instrument(skip(self, sales), fields(sales = sales.len()))]
    pub fn analyze(
        &self,
        sales: &[SaleRecord],
        top_n: usize,
        period_days: u32,
    ) -> Vec<TrendResult> {
        let aggregator = SalesAggregator::new(sales);
        let Some(max_date) = aggregator.max_date() else {
            debug!("Empty sales table, no trends");
            return Vec::new();
        };

        let (this_window, prev_window) = DateWindow::trailing_pair(max_date, period_days);
        debug!(?this_window, ?prev_window, "Trend windows");

        let this_totals = aggregator.product_totals(this_window);
        let prev_totals = aggregator.product_totals(prev_window);
        let names = aggregator.product_names();

        let mut ranked: Vec<(ProductId, u64, u64)> = this_totals
            .iter()
            .map(|(id, totals)| {
                let prev = prev_totals.get(id).map_or(0, |t| t.quantity_sold);
                (*id, totals.quantity_sold, prev)
            })
            .collect();

        // Stable sort keeps ascending product id among equal sales
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(top_n);

        let results: Vec<TrendResult> = ranked
            .into_iter()
            .map(|(product_id, this_sales, prev_sales)| {
                let growth = growth_percent(this_sales, prev_sales);
                TrendResult {
                    product_id,
                    product_name: names
                        .get(&product_id)
                        .copied()
                        .unwrap_or_default()
                        .to_string(),
                    sales_this_period: this_sales,
                    sales_last_period: prev_sales,
                    growth_percent: growth,
                    trend: self.config.classify(growth),
                }
            })
            .collect();

        info!(products = results.len(), %max_date, "Trend analysis complete");
        results
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn sale(product: i64, day: NaiveDate, qty: u32) -> SaleRecord {
        SaleRecord {
            product_id: ProductId::new(product),
            product_name: format!("Product {product}"),
            customer_id: None,
            date: day,
            quantity_sold: qty,
            unit_price: None,
            total_price: None,
        }
    }

    fn analyzer() -> TrendAnalyzer {
        TrendAnalyzer::new(TrendConfig::default())
    }

    #[test]
    fn test_growth_from_zero_divides_by_one() {
        assert_eq!(growth_percent(50, 0), dec!(5000));
        assert_eq!(growth_percent(0, 0), dec!(0));
    }

    #[test]
    fn test_growth_flat_and_falling() {
        assert_eq!(growth_percent(100, 100), dec!(0));
        assert_eq!(growth_percent(50, 100), dec!(-50));
    }

    #[test]
    fn test_growth_rounds_to_two_places() {
        // 1/3 growth
        assert_eq!(growth_percent(4, 3), dec!(33.33));
        assert_eq!(growth_percent(2, 3), dec!(-33.33));
    }

    #[test]
    fn test_trend_boundaries() {
        let config = TrendConfig::default();
        assert_eq!(config.classify(dec!(10.00)), Trend::Steady);
        assert_eq!(config.classify(dec!(10.01)), Trend::Rising);
        assert_eq!(config.classify(dec!(-10.00)), Trend::Steady);
        assert_eq!(config.classify(dec!(-10.01)), Trend::Falling);
        assert_eq!(config.classify(dec!(0)), Trend::Steady);
    }

    #[test]
    fn test_windows_are_adjacent_and_disjoint() {
        // max date Jan 14: this period Jan 8..=14, previous Jan 1..=7
        let sales = vec![
            sale(1, date(1, 14), 10),
            sale(1, date(1, 8), 5),
            sale(1, date(1, 7), 3),
            sale(1, date(1, 1), 2),
            sale(1, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(), 1000),
        ];
        let results = analyzer().analyze(&sales, 5, 7);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].sales_this_period, 15);
        assert_eq!(results[0].sales_last_period, 5);
        assert_eq!(results[0].growth_percent, dec!(200));
        assert_eq!(results[0].trend, Trend::Rising);
    }

    #[test]
    fn test_new_product_reports_growth_against_one() {
        let sales = vec![sale(2, date(1, 14), 50)];
        let results = analyzer().analyze(&sales, 5, 7);

        assert_eq!(results[0].sales_last_period, 0);
        assert_eq!(results[0].growth_percent, dec!(5000));
        assert_eq!(results[0].trend, Trend::Rising);
    }

    #[test]
    fn test_flat_product_is_steady() {
        let sales = vec![sale(3, date(1, 14), 100), sale(3, date(1, 7), 100)];
        let results = analyzer().analyze(&sales, 5, 7);

        assert_eq!(results[0].growth_percent, dec!(0));
        assert_eq!(results[0].trend, Trend::Steady);
    }

    #[test]
    fn test_previous_only_products_are_excluded() {
        let sales = vec![sale(1, date(1, 14), 1), sale(2, date(1, 7), 500)];
        let results = analyzer().analyze(&sales, 5, 7);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product_id, ProductId::new(1));
    }

    #[test]
    fn test_max_date_is_global_not_per_product() {
        // Product 2 last sold on Jan 7, which is the previous period
        // relative to the table-wide max date of Jan 14
        let sales = vec![
            sale(1, date(1, 14), 1),
            sale(2, date(1, 7), 9),
            sale(2, date(1, 6), 9),
        ];
        let results = analyzer().analyze(&sales, 5, 7);
        assert!(results.iter().all(|r| r.product_id != ProductId::new(2)));
    }

    #[test]
    fn test_ranking_and_truncation() {
        let sales = vec![
            sale(1, date(1, 14), 5),
            sale(2, date(1, 14), 20),
            sale(3, date(1, 13), 10),
            sale(4, date(1, 12), 1),
        ];
        let results = analyzer().analyze(&sales, 3, 7);

        let ids: Vec<_> = results.iter().map(|r| r.product_id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_keep_ascending_product_id() {
        let sales = vec![
            sale(9, date(1, 14), 5),
            sale(4, date(1, 14), 5),
            sale(7, date(1, 14), 5),
        ];
        let results = analyzer().analyze(&sales, 3, 7);

        let ids: Vec<_> = results.iter().map(|r| r.product_id.as_i64()).collect();
        assert_eq!(ids, vec![4, 7, 9]);
    }

    #[test]
    fn test_result_length_never_exceeds_top_n() {
        let sales: Vec<_> = (1..=10).map(|p| sale(p, date(1, 14), 1)).collect();
        assert_eq!(analyzer().analyze(&sales, 4, 7).len(), 4);
        assert_eq!(analyzer().analyze(&sales, 20, 7).len(), 10);
        assert!(analyzer().analyze(&sales, 0, 7).is_empty());
    }

    #[test]
    fn test_zero_period_yields_nothing() {
        let sales = vec![sale(1, date(1, 14), 5)];
        assert!(analyzer().analyze(&sales, 5, 0).is_empty());
    }

    #[test]
    fn test_empty_sales_yield_nothing() {
        assert!(analyzer().analyze(&[], 5, 7).is_empty());
    }

    #[test]
    fn test_product_name_comes_from_sales() {
        let sales = vec![sale(1, date(1, 14), 5)];
        let results = analyzer().analyze(&sales, 5, 7);
        assert_eq!(results[0].product_name, "Product 1");
    }

    #[test]
    fn test_custom_threshold() {
        let analyzer = TrendAnalyzer::new(TrendConfig {
            threshold_percent: dec!(50),
        });
        assert_eq!(analyzer.config().threshold_percent, dec!(50));
        let sales = vec![sale(1, date(1, 14), 14), sale(1, date(1, 7), 10)];
        let results = analyzer.analyze(&sales, 5, 7);
        assert_eq!(results[0].growth_percent, dec!(40));
        assert_eq!(results[0].trend, Trend::Steady);
    }

    #[test]
    fn test_one_day_periods_do_not_double_count() {
        let sales = vec![
            sale(1, date(1, 14), 10),
            sale(1, date(1, 13), 4),
            sale(1, date(1, 12), 100),
        ];
        let results = analyzer().analyze(&sales, 5, 1);

        assert_eq!(results[0].sales_this_period, 10);
        assert_eq!(results[0].sales_last_period, 4);
        assert_eq!(results[0].growth_percent, dec!(150));
    }
}
