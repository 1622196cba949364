use crate::analyzers::{CategoryShare, MonthTable, WeatherBucket, WindSeries, YearSummary};
use crate::error::Result;
use crate::models::Observation;
use crate::processors::{Dashboard, IntegrityReport, RejectedRow};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct DashboardDocument<'a> {
    year: i32,
    compare_years: &'a [i32],
    records: usize,
    total_rows: usize,
    duplicates_removed: usize,
    rejected: &'a [RejectedRow],
    summary: Option<&'a YearSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary_error: Option<String>,
    monthly_mean_temp: &'a MonthTable<i32, Option<f64>>,
    wind_series: &'a [WindSeries],
    monthly_precip: &'a MonthTable<i32, f64>,
    monthly_weather_counts: &'a MonthTable<WeatherBucket, u32>,
    distribution: &'a [CategoryShare],
    integrity: &'a IntegrityReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_data: Option<&'a [Observation]>,
}

/// JSON export of a whole dashboard
pub struct JsonWriter {
    pretty: bool,
    include_raw: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self {
            pretty: true,
            include_raw: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_raw_data(mut self, include_raw: bool) -> Self {
        self.include_raw = include_raw;
        self
    }

    pub fn to_value(&self, dashboard: &Dashboard) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.document(dashboard))?)
    }

    pub fn write_dashboard(&self, dashboard: &Dashboard, path: &Path) -> Result<()> {
        let document = self.document(dashboard);
        self.write_json(&document, path)?;
        info!("Wrote dashboard JSON to {}", path.display());
        Ok(())
    }

    /// Raw data table as a JSON array
    pub fn write_observations(&self, observations: &[Observation], path: &Path) -> Result<()> {
        self.write_json(&observations, path)?;
        info!(
            "Wrote {} observations to {}",
            observations.len(),
            path.display()
        );
        Ok(())
    }

    fn document<'a>(&self, dashboard: &'a Dashboard) -> DashboardDocument<'a> {
        let views = &dashboard.views;
        DashboardDocument {
            year: dashboard.config.year,
            compare_years: &dashboard.config.compare_years,
            records: dashboard.set.len(),
            total_rows: dashboard.total_rows,
            duplicates_removed: dashboard.duplicates_removed,
            rejected: &dashboard.rejected,
            summary: views.summary.as_ref().ok(),
            summary_error: views.summary.as_ref().err().map(|e| e.to_string()),
            monthly_mean_temp: &views.monthly_mean_temp,
            wind_series: &views.wind_series,
            monthly_precip: &views.monthly_precip,
            monthly_weather_counts: &views.monthly_weather_counts,
            distribution: &views.distribution,
            integrity: &dashboard.integrity,
            raw_data: self
                .include_raw
                .then(|| dashboard.set.observations()),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, value: &T, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut out, value)?;
        } else {
            serde_json::to_writer(&mut out, value)?;
        }
        out.flush()?;
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
