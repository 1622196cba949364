pub mod dashboard_pipeline;
pub mod integrity_checker;
pub mod normalizer;

pub use dashboard_pipeline::{Dashboard, DashboardPipeline, DashboardViews};
pub use integrity_checker::{IntegrityChecker, IntegrityReport, Violation, ViolationType};
pub use normalizer::{parse_date, parse_row, MalformedPolicy, Normalization, Normalizer, RejectedRow};
