//! Sales aggregation.
//!
//! Groups sale records by an arbitrary key, optionally restricted to a
//! [`DateWindow`], and sums or averages their metrics. Groups come back in
//! ascending key order. Both engines and the segmentation adapter build on
//! these tables; nothing here mutates its input.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shelf_signals_core::{
    CustomerFeatures, CustomerId, DailyAggregate, DateWindow, ProductId, SaleRecord,
};

/// Summed and averaged metrics for one group of sale records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupTotals {
    /// Records in the group.
    pub records: usize,
    /// Sum of `quantity_sold`.
    pub quantity_sold: u64,
    /// Sum of `total_price` over records that carry one.
    pub total_price: Decimal,
    unit_price_sum: Decimal,
    unit_price_count: usize,
}

impl GroupTotals {
    fn add(&mut self, record: &SaleRecord) {
        self.records += 1;
        self.quantity_sold += u64::from(record.quantity_sold);
        if let Some(total) = record.total_price {
            self.total_price += total;
        }
        if let Some(unit) = record.unit_price {
            self.unit_price_sum += unit;
            self.unit_price_count += 1;
        }
    }

    /// Mean `unit_price` over records that carry one.
    #[must_use]
    pub fn mean_unit_price(&self) -> Option<Decimal> {
        (self.unit_price_count > 0)
            .then(|| self.unit_price_sum / Decimal::from(self.unit_price_count))
    }
}

/// Read-only view over a sales table that produces aggregate tables.
#[derive(Debug, Clone, Copy)]
pub struct SalesAggregator<'a> {
    records: &'a [SaleRecord],
}

impl<'a> SalesAggregator<'a> {
    /// Wrap a sales table.
    #[must_use]
    pub const fn new(records: &'a [SaleRecord]) -> Self {
        Self { records }
    }

    /// Whether the table has no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest sale date in the table.
    #[must_use]
    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    /// Group records inside `window` by `key` and total each group.
    ///
    /// Records for which `key` returns `None` are left out.
    pub fn aggregate<K, F>(&self, window: DateWindow, key: F) -> BTreeMap<K, GroupTotals>
    where
        K: Ord,
        F: Fn(&SaleRecord) -> Option<K>,
    {
        let mut groups: BTreeMap<K, GroupTotals> = BTreeMap::new();
        for record in self.records.iter().filter(|r| window.contains(r.date)) {
            if let Some(k) = key(record) {
                groups.entry(k).or_default().add(record);
            }
        }
        groups
    }

    /// Units sold per product inside `window`.
    #[must_use]
    pub fn product_totals(&self, window: DateWindow) -> BTreeMap<ProductId, GroupTotals> {
        self.aggregate(window, |r| Some(r.product_id))
    }

    /// Units sold per product per day, ordered by product then date.
    #[must_use]
    pub fn daily_by_product(&self) -> Vec<DailyAggregate> {
        self.aggregate(DateWindow::unbounded(), |r| Some((r.product_id, r.date)))
            .into_iter()
            .map(|((product_id, date), totals)| DailyAggregate {
                product_id,
                date,
                quantity_sold: totals.quantity_sold,
            })
            .collect()
    }

    /// First product name seen for each product id.
    #[must_use]
    pub fn product_names(&self) -> BTreeMap<ProductId, &'a str> {
        let mut names = BTreeMap::new();
        for record in self.records {
            names
                .entry(record.product_id)
                .or_insert(record.product_name.as_str());
        }
        names
    }

    /// Per-customer features for segmentation, ordered by customer id.
    ///
    /// Records without a customer id are ignored. A customer with no
    /// priced records has a mean unit price of zero.
    #[must_use]
    pub fn customer_features(&self) -> Vec<CustomerFeatures> {
        self.aggregate(DateWindow::unbounded(), |r| r.customer_id)
            .into_iter()
            .map(|(customer_id, totals): (CustomerId, GroupTotals)| CustomerFeatures {
                customer_id,
                total_quantity: totals.quantity_sold,
                mean_unit_price: totals.mean_unit_price().unwrap_or_default(),
                total_spend: totals.total_price,
            })
            .collect()
    }
}
