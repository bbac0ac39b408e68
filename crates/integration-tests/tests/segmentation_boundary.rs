//! Integration tests for the customer segmentation boundary.
//!
//! Clustering is external, so these tests plug in deterministic clusterers
//! and check what the adapter hands them and what it makes of the answer.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::cell::RefCell;

use rust_decimal_macros::dec;
use shelf_signals::aggregate::SalesAggregator;
use shelf_signals::segmentation::{
    Clusterer, FEATURE_COUNT, FeatureRow, SegmentationAdapter, SegmentationError,
};
use shelf_signals_core::{CustomerId, SegmentLabel};
use shelf_signals_integration_tests::{SalesCsv, date};

/// Two frequent low spenders and one occasional big spender.
fn customers() -> SalesCsv {
    SalesCsv::new()
        .customer_sale(1, 10, date(2024, 1, 1), 10, "1.00")
        .customer_sale(1, 11, date(2024, 1, 2), 2, "3.00")
        .customer_sale(2, 10, date(2024, 1, 3), 8, "1.00")
        .customer_sale(3, 12, date(2024, 1, 4), 1, "50.00")
}

/// Puts customers with above-average spend in `high`, the rest in `low`.
struct SpendThreshold {
    high: usize,
    low: usize,
}

impl Clusterer for SpendThreshold {
    fn assign(&self, rows: &[FeatureRow], _groups: usize) -> Result<Vec<usize>, SegmentationError> {
        Ok(rows
            .iter()
            .map(|row| if row[2] > 0.0 { self.high } else { self.low })
            .collect())
    }
}

/// Returns a canned answer and records what it was given.
struct Canned {
    answer: Vec<usize>,
    seen: RefCell<Vec<FeatureRow>>,
}

impl Canned {
    fn new(answer: Vec<usize>) -> Self {
        Self {
            answer,
            seen: RefCell::new(Vec::new()),
        }
    }
}

impl Clusterer for Canned {
    fn assign(&self, rows: &[FeatureRow], _groups: usize) -> Result<Vec<usize>, SegmentationError> {
        self.seen.borrow_mut().extend_from_slice(rows);
        Ok(self.answer.clone())
    }
}

// =============================================================================
// Feature Preparation
// =============================================================================

#[test]
fn test_customer_features_from_csv() {
    let sales = customers().load();
    let features = SalesAggregator::new(&sales).customer_features();

    assert_eq!(features.len(), 3);
    let first = &features[0];
    assert_eq!(first.customer_id, CustomerId::new(1));
    assert_eq!(first.total_quantity, 12);
    assert_eq!(first.mean_unit_price, dec!(2));
    assert_eq!(first.total_spend, dec!(16));

    assert_eq!(features[2].customer_id, CustomerId::new(3));
    assert_eq!(features[2].total_spend, dec!(50));
}

#[test]
fn test_standardized_columns_have_zero_mean() {
    let clusterer = Canned::new(vec![0, 1, 1]);
    let adapter = SegmentationAdapter::new(&clusterer);
    adapter.segment(&customers().load(), 2).unwrap();

    let seen = clusterer.seen.borrow();
    assert_eq!(seen.len(), 3);
    for col in 0..FEATURE_COUNT {
        let sum: f64 = seen.iter().map(|row| row[col]).sum();
        assert!(sum.abs() < 1e-9, "column {col} mean is not zero");
    }
    // Highest spender is the only one above the spend mean
    assert!(seen[2][2] > 0.0);
    assert!(seen[0][2] < 0.0);
}

// =============================================================================
// Stable Labels
// =============================================================================

#[test]
fn test_labels_do_not_depend_on_group_ids() {
    let sales = customers().load();

    let forward = SegmentationAdapter::new(SpendThreshold { high: 1, low: 0 })
        .segment(&sales, 2)
        .unwrap();
    let swapped = SegmentationAdapter::new(SpendThreshold { high: 0, low: 1 })
        .segment(&sales, 2)
        .unwrap();

    let labels = |segments: &[shelf_signals_core::CustomerSegment]| {
        segments
            .iter()
            .map(|s| (s.customer_id, s.segment_label))
            .collect::<Vec<_>>()
    };
    assert_eq!(labels(&forward), labels(&swapped));
    assert_ne!(forward[2].segment, swapped[2].segment);

    assert_eq!(forward[0].segment_label, SegmentLabel::FrequentLowSpend);
    assert_eq!(forward[1].segment_label, SegmentLabel::FrequentLowSpend);
    assert_eq!(forward[2].segment_label, SegmentLabel::OccasionalHighSpend);
}

#[test]
fn test_segment_json_output() {
    let segments = SegmentationAdapter::new(SpendThreshold { high: 1, low: 0 })
        .segment(&customers().load(), 2)
        .unwrap();
    let json = serde_json::to_value(&segments).unwrap();

    let big = &json[2];
    assert_eq!(big["customer_id"], 3);
    assert_eq!(big["quantity_sold"], 1);
    assert_eq!(big["total_price"], 50.0);
    assert_eq!(big["segment"], 1);
    assert_eq!(big["segment_label"], "Occasional, High Spend");
}

// =============================================================================
// Contract Violations
// =============================================================================

#[test]
fn test_zero_groups_rejected() {
    let err = SegmentationAdapter::new(Canned::new(vec![]))
        .segment(&customers().load(), 0)
        .unwrap_err();
    assert_eq!(err, SegmentationError::InvalidGroupCount(0));
}

#[test]
fn test_short_assignment_rejected() {
    let err = SegmentationAdapter::new(Canned::new(vec![0, 1]))
        .segment(&customers().load(), 2)
        .unwrap_err();
    assert_eq!(
        err,
        SegmentationError::AssignmentLength {
            expected: 3,
            actual: 2
        }
    );
}

#[test]
fn test_out_of_range_group_rejected() {
    let err = SegmentationAdapter::new(Canned::new(vec![0, 1, 5]))
        .segment(&customers().load(), 2)
        .unwrap_err();
    assert_eq!(
        err,
        SegmentationError::GroupOutOfRange {
            group: 5,
            groups: 2
        }
    );
}

#[test]
fn test_no_customers_yields_no_segments() {
    let segments = SegmentationAdapter::new(Canned::new(vec![]))
        .segment(&SalesCsv::new().load(), 3)
        .unwrap();
    assert!(segments.is_empty());
}
