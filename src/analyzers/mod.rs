pub mod aggregator;
pub mod distribution;
pub mod month_table;
pub mod monthly_views;
pub mod wind_series;
pub mod year_summary;

pub use aggregator::Aggregator;
pub use distribution::CategoryShare;
pub use month_table::{MonthRow, MonthTable, WeatherBucket};
pub use wind_series::{WindPoint, WindSeries};
pub use year_summary::{least_common, most_common, YearSummary};
