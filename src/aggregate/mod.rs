//! Data-shaping core: turns flat reading lists into the grouped and latest
//! views the dashboard charts consume.
//!
//! Every function here is a pure transformation over borrowed input. Empty
//! input yields empty output.

mod latest;
mod monthly;
mod series;

pub use latest::{by_parameter_and_site, by_parameter_and_source, by_site, latest_per_key};
pub use monthly::{group_by_month, MonthBucket};
pub use series::{
    monthly_series, reference_lines, site_comparison, LimitKind, MonthlySeries, MonthlySeriesRow,
    ReferenceLine, SiteComparison, SiteComparisonRow, NEUTRAL_BAR_COLOR,
};
