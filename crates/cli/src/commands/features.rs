//! Customer feature export for external segmentation.

use std::path::Path;

use shelf_signals::aggregate::SalesAggregator;
use shelf_signals::loader::load_sales_file;
use tracing::warn;

use super::{CommandError, write_json};

/// Load the sales table and print one feature row per customer.
///
/// # Errors
///
/// Returns an error if the table cannot be loaded or the output cannot be
/// written.
pub fn run(sales: &Path) -> Result<(), CommandError> {
    let sales = load_sales_file(sales)?;
    let features = SalesAggregator::new(&sales).customer_features();

    if features.is_empty() && !sales.is_empty() {
        warn!("Sales table has no customer_id values; nothing to segment");
    }

    write_json(&features)
}
