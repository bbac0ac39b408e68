//! Status enums attached to derived rows.
//!
//! These are the categorical labels the engines compute: replenishment
//! urgency, period-over-period trend direction and customer segment.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Replenishment urgency derived from the stockout horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Wire representation (`HIGH`, `MEDIUM`, `LOW`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of sales between two adjacent trend windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

impl Trend {
    /// Wire representation (`RISING`, `FALLING`, `STEADY`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "RISING",
            Self::Falling => "FALLING",
            Self::Steady => "STEADY",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable customer segment.
///
/// Assigned from a cluster's spend rank, never from the raw group index a
/// clustering routine happens to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentLabel {
    #[serde(rename = "Frequent, Low Spend")]
    FrequentLowSpend,
    #[serde(rename = "Occasional, High Spend")]
    OccasionalHighSpend,
    #[serde(rename = "Moderate")]
    Moderate,
}

impl SegmentLabel {
    /// Display label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FrequentLowSpend => "Frequent, Low Spend",
            Self::OccasionalHighSpend => "Occasional, High Spend",
            Self::Moderate => "Moderate",
        }
    }
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
