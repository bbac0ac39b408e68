//! Customer segmentation boundary.
//!
//! Clustering itself is delegated to an external [`Clusterer`]. This module
//! prepares its input (per-customer features, standardized), validates its
//! output and turns arbitrary group ids into stable labels.
//!
//! Group ids from general-purpose clustering carry no meaning and can be
//! permuted between runs, so labels are derived from each group's centroid:
//! groups are ranked by mean total spend, the cheapest becomes
//! [`SegmentLabel::FrequentLowSpend`], the most expensive
//! [`SegmentLabel::OccasionalHighSpend`] and everything in between
//! [`SegmentLabel::Moderate`].

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shelf_signals_core::{CustomerFeatures, CustomerSegment, SaleRecord, SegmentLabel};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::aggregate::SalesAggregator;

/// Number of features per customer: quantity, mean unit price, total spend.
pub const FEATURE_COUNT: usize = 3;

/// One standardized feature row.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Errors from the segmentation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentationError {
    /// At least one group is needed.
    #[error("group count must be at least 1, got {0}")]
    InvalidGroupCount(usize),

    /// The clusterer returned the wrong number of assignments.
    #[error("clusterer returned {actual} assignments for {expected} customers")]
    AssignmentLength {
        /// Customers submitted.
        expected: usize,
        /// Assignments received.
        actual: usize,
    },

    /// The clusterer returned a group id outside `0..groups`.
    #[error("clusterer assigned group {group}, but only {groups} groups were requested")]
    GroupOutOfRange {
        /// Offending group id.
        group: usize,
        /// Groups requested.
        groups: usize,
    },

    /// The clusterer itself failed.
    #[error("clustering failed: {0}")]
    Clusterer(String),
}

/// External clustering routine.
///
/// Receives one standardized [`FeatureRow`] per customer and must return one
/// group id in `0..groups` per row, in the same order.
pub trait Clusterer {
    /// Assign each row to a group.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures as
    /// [`SegmentationError::Clusterer`].
    fn assign(&self, rows: &[FeatureRow], groups: usize) -> Result<Vec<usize>, SegmentationError>;
}

impl<C: Clusterer + ?Sized> Clusterer for &C {
    fn assign(&self, rows: &[FeatureRow], groups: usize) -> Result<Vec<usize>, SegmentationError> {
        (**self).assign(rows, groups)
    }
}

/// Raw (unscaled) feature row for a customer.
fn feature_row(features: &CustomerFeatures) -> FeatureRow {
    #[allow(clippy::cast_precision_loss)]
    let quantity = features.total_quantity as f64;
    [
        quantity,
        features.mean_unit_price.to_f64().unwrap_or_default(),
        features.total_spend.to_f64().unwrap_or_default(),
    ]
}

/// Z-score every feature column using the population standard deviation.
///
/// A column with zero variance maps to all zeros.
#[must_use]
pub fn standardize(features: &[CustomerFeatures]) -> Vec<FeatureRow> {
    let rows: Vec<FeatureRow> = features.iter().map(feature_row).collect();
    if rows.is_empty() {
        return rows;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = rows.len() as f64;
    let mut mean = [0.0; FEATURE_COUNT];
    let mut std_dev = [0.0; FEATURE_COUNT];

    for (col, m) in mean.iter_mut().enumerate() {
        *m = rows.iter().filter_map(|r| r.get(col)).sum::<f64>() / n;
    }
    for (col, (s, m)) in std_dev.iter_mut().zip(mean).enumerate() {
        let variance = rows
            .iter()
            .filter_map(|r| r.get(col))
            .map(|v| (v - m).powi(2))
            .sum::<f64>()
            / n;
        *s = variance.sqrt();
    }

    rows.into_iter()
        .map(|row| {
            let mut scaled = [0.0; FEATURE_COUNT];
            for (out, ((value, m), s)) in scaled.iter_mut().zip(row.iter().zip(mean).zip(std_dev)) {
                *out = if s > 0.0 { (value - m) / s } else { 0.0 };
            }
            scaled
        })
        .collect()
}

/// Label for the group at `rank` (0 = lowest spend) of `ranked` non-empty
/// groups.
const fn label_for_rank(rank: usize, ranked: usize) -> SegmentLabel {
    if ranked <= 1 {
        SegmentLabel::Moderate
    } else if rank == 0 {
        SegmentLabel::FrequentLowSpend
    } else if rank + 1 == ranked {
        SegmentLabel::OccasionalHighSpend
    } else {
        SegmentLabel::Moderate
    }
}

/// Runs a [`Clusterer`] over customer features and labels the result.
#[derive(Debug, Clone)]
pub struct SegmentationAdapter<C> {
    clusterer: C,
}

impl<C: Clusterer> SegmentationAdapter<C> {
    /// Wrap a clustering routine.
    #[must_use]
    pub const fn new(clusterer: C) -> Self {
        Self { clusterer }
    }

    /// Segment every customer in `sales` into at most `groups` groups.
    ///
    /// Customers come back in ascending customer id order.
    ///
    /// # Errors
    ///
    /// Returns an error if `groups` is zero, or if the clusterer fails or
    /// returns assignments that don't match the customers submitted.
    #[instrument(skip(self, sales), fields(sales = sales.len()))]
    pub fn segment(
        &self,
        sales: &[SaleRecord],
        groups: usize,
    ) -> Result<Vec<CustomerSegment>, SegmentationError> {
        if groups == 0 {
            return Err(SegmentationError::InvalidGroupCount(groups));
        }

        let features = SalesAggregator::new(sales).customer_features();
        if features.is_empty() {
            debug!("No customers to segment");
            return Ok(Vec::new());
        }

        let rows = standardize(&features);
        let assignments = self.clusterer.assign(&rows, groups)?;
        if assignments.len() != features.len() {
            return Err(SegmentationError::AssignmentLength {
                expected: features.len(),
                actual: assignments.len(),
            });
        }
        if let Some(&group) = assignments.iter().find(|&&g| g >= groups) {
            return Err(SegmentationError::GroupOutOfRange { group, groups });
        }

        let labels = rank_labels(&features, &assignments, groups);
        let segments: Vec<CustomerSegment> = features
            .into_iter()
            .zip(assignments)
            .map(|(f, group)| CustomerSegment {
                customer_id: f.customer_id,
                quantity_sold: f.total_quantity,
                total_price: f.total_spend,
                segment: group,
                segment_label: labels.get(group).copied().unwrap_or(SegmentLabel::Moderate),
            })
            .collect();

        info!(customers = segments.len(), groups, "Segmentation complete");
        Ok(segments)
    }
}

/// Label per group id, from the rank of its mean total spend.
fn rank_labels(
    features: &[CustomerFeatures],
    assignments: &[usize],
    groups: usize,
) -> Vec<SegmentLabel> {
    let mut spend = vec![(Decimal::ZERO, 0_usize); groups];
    for (f, &group) in features.iter().zip(assignments) {
        if let Some((sum, count)) = spend.get_mut(group) {
            *sum += f.total_spend;
            *count += 1;
        }
    }

    let mut centroids: Vec<(usize, Decimal)> = spend
        .iter()
        .enumerate()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(group, (sum, count))| (group, *sum / Decimal::from(*count)))
        .collect();
    centroids.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut labels = vec![SegmentLabel::Moderate; groups];
    let ranked = centroids.len();
    for (rank, (group, centroid)) in centroids.into_iter().enumerate() {
        let label = label_for_rank(rank, ranked);
        debug!(group, %centroid, %label, "Ranked segment");
        if let Some(slot) = labels.get_mut(group) {
            *slot = label;
        }
    }
    labels
}
