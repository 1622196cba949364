use crate::analyzers::{
    Aggregator, CategoryShare, MonthTable, WeatherBucket, WindSeries, YearSummary,
};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::models::{NormalizedSet, RawObservation, RawRow};
use crate::processors::{IntegrityChecker, IntegrityReport, Normalizer, RejectedRow};
use crate::readers::CsvReader;
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use std::sync::Arc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{info, warn};

/// Everything the dashboard shows, computed from one normalized set
#[derive(Debug)]
pub struct Dashboard {
    pub config: DashboardConfig,
    pub set: Arc<NormalizedSet>,
    pub total_rows: usize,
    pub duplicates_removed: usize,
    pub rejected: Vec<RejectedRow>,
    pub integrity: IntegrityReport,
    pub views: DashboardViews,
}

/// The derived views. A failed summary does not prevent the others.
#[derive(Debug)]
pub struct DashboardViews {
    pub summary: Result<YearSummary>,
    pub monthly_mean_temp: MonthTable<i32, Option<f64>>,
    pub wind_series: Vec<WindSeries>,
    pub monthly_precip: MonthTable<i32, f64>,
    pub monthly_weather_counts: MonthTable<WeatherBucket, u32>,
    pub distribution: Vec<CategoryShare>,
}

pub struct DashboardPipeline {
    config: DashboardConfig,
    silent: bool,
}

impl DashboardPipeline {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            silent: false,
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Load a CSV file and build the dashboard
    pub async fn run_path(&self, path: &Path) -> Result<Dashboard> {
        let rows = CsvReader::new().read_rows_path(path)?;
        self.run_read_rows(rows).await
    }

    /// Normalize raw rows, check them and compute every view
    pub async fn run_rows(&self, rows: Vec<RawObservation>) -> Result<Dashboard> {
        self.run_read_rows(rows.into_iter().map(Ok).collect()).await
    }

    /// As [`DashboardPipeline::run_rows`], for rows that may have failed to decode
    pub async fn run_read_rows(&self, rows: Vec<RawRow>) -> Result<Dashboard> {
        self.config.check()?;
        let progress = ProgressReporter::new_spinner("Normalizing records...", self.silent);

        let max_workers = self.config.max_workers;
        let policy = self.config.malformed_policy;
        let normalization = spawn_blocking(move || {
            Normalizer::new()
                .with_max_workers(max_workers)
                .with_policy(policy)
                .normalize_rows(&rows)
        })
        .await??;

        if !normalization.rejected.is_empty() {
            warn!(
                "{} malformed rows were skipped",
                normalization.rejected.len()
            );
        }

        progress.set_message("Checking data integrity...");
        let integrity =
            IntegrityChecker::new(&self.config.categories).check_integrity(&normalization.set);

        progress.set_message("Computing views...");
        let total_rows = normalization.total_rows();
        let set = Arc::new(normalization.set);
        let views = self.compute_views(Arc::clone(&set)).await?;

        progress.finish_with_message(&format!("Dashboard ready ({} records)", set.len()));
        info!(
            "Dashboard built from {} records ({} years)",
            set.len(),
            set.years().len()
        );

        Ok(Dashboard {
            config: self.config.clone(),
            set,
            total_rows,
            duplicates_removed: normalization.duplicates_removed,
            rejected: normalization.rejected,
            integrity,
            views,
        })
    }

    /// Run the independent views concurrently over a shared snapshot
    pub async fn compute_views(&self, set: Arc<NormalizedSet>) -> Result<DashboardViews> {
        let year = self.config.year;
        let summary_handle = spawn_view(&set, move |agg| agg.year_summary(year));

        let mean_handle = spawn_view(&set, |agg| agg.monthly_mean_temp());

        let years = self.config.compare_years.clone();
        let checkpoints = self.config.checkpoints.clone();
        let wind_handle = spawn_view(&set, move |agg| agg.wind_series(&years, &checkpoints));

        let precip_handle = spawn_view(&set, |agg| agg.monthly_precip_by_year());

        let categories = self.config.categories.clone();
        let counts_handle = spawn_view(&set, move |agg| agg.monthly_weather_counts(&categories));

        let distribution_handle = spawn_view(&set, |agg| agg.weather_distribution());

        let (summary, mean_temp, wind_series, precip, counts, distribution) = tokio::try_join!(
            summary_handle,
            mean_handle,
            wind_handle,
            precip_handle,
            counts_handle,
            distribution_handle
        )?;

        if let Err(e) = &summary {
            warn!("Summary for {} unavailable: {}", year, e);
        }

        let compare_years = &self.config.compare_years;
        Ok(DashboardViews {
            summary,
            monthly_mean_temp: mean_temp.retain_columns(|y| compare_years.contains(y)),
            wind_series,
            monthly_precip: precip.retain_columns(|y| compare_years.contains(y)),
            monthly_weather_counts: counts,
            distribution,
        })
    }
}

fn spawn_view<T, F>(set: &Arc<NormalizedSet>, view: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: FnOnce(Aggregator<'_>) -> T + Send + 'static,
{
    let set = Arc::clone(set);
    spawn_blocking(move || view(Aggregator::new(&set)))
}
