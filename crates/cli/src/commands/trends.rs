//! Sales trend command.

use std::path::Path;

use shelf_signals::loader::load_sales_file;
use shelf_signals::{SignalsConfig, TrendAnalyzer};
use tracing::info;

use super::{CommandError, write_json};

/// Load the sales table, analyze trends and print the results.
///
/// `top_n` and `period_days` fall back to the configured defaults.
///
/// # Errors
///
/// Returns an error if the table cannot be loaded, `period_days` is zero or
/// the output cannot be written.
pub fn run(
    config: &SignalsConfig,
    sales: &Path,
    top_n: Option<usize>,
    period_days: Option<u32>,
) -> Result<(), CommandError> {
    let period_days = period_days.unwrap_or(config.period_days);
    if period_days == 0 {
        return Err(CommandError::InvalidArgument(
            "--period-days",
            "must be greater than zero".to_string(),
        ));
    }

    let top_n = top_n.unwrap_or(config.top_n);
    let analyzer = TrendAnalyzer::new(config.trends);
    info!(
        top_n,
        period_days,
        threshold_percent = %analyzer.config().threshold_percent,
        "Analyzing sales trends"
    );

    let sales = load_sales_file(sales)?;
    let results = analyzer.analyze(&sales, top_n, period_days);

    write_json(&results)
}
