//! Half-open calendar windows.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar window `(start, end]`.
///
/// The start bound is exclusive and the end bound inclusive, so two windows
/// built with [`DateWindow::trailing`] back to back never share a day. Either
/// bound may be left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateWindow {
    /// Exclusive lower bound.
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    /// A window with no bounds; every date is inside it.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Create a window from explicit bounds.
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// The `days`-long window ending on (and including) `end`.
    ///
    /// A zero-length window contains no dates.
    #[must_use]
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        Self {
            start: Some(days_before(end, days)),
            end: Some(end),
        }
    }

    /// The `days`-long window ending on `end`, and the equally long window
    /// immediately before it.
    ///
    /// The second window ends on the first one's exclusive start, so the two
    /// never share a day.
    #[must_use]
    pub fn trailing_pair(end: NaiveDate, days: u32) -> (Self, Self) {
        let boundary = days_before(end, days);
        (Self::trailing(end, days), Self::trailing(boundary, days))
    }

    /// Whether `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date > start) && self.end.is_none_or(|end| date <= end)
    }
}

fn days_before(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}
