use crate::analyzers::{CategoryShare, MonthTable, WindSeries, YearSummary};
use crate::models::Observation;
use crate::processors::Dashboard;
use crate::utils::constants::DEFAULT_PREVIEW_ROWS;
use std::fmt::{Display, Write};

/// Plain-text rendering of a dashboard
pub struct ReportWriter {
    preview_rows: usize,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn render(&self, dashboard: &Dashboard) -> String {
        let views = &dashboard.views;
        let mut out = String::new();

        out.push_str("=== Weather Data Analysis ===\n");
        out.push_str(&format!(
            "Records: {} (from {} rows, {} duplicates removed, {} rejected)\n",
            dashboard.set.len(),
            dashboard.total_rows,
            dashboard.duplicates_removed,
            dashboard.rejected.len()
        ));
        if let Some((first, last)) = dashboard.set.date_range() {
            out.push_str(&format!("Period: {} to {}\n", first, last));
        }
        out.push('\n');

        match &views.summary {
            Ok(summary) => out.push_str(&self.render_summary(summary)),
            Err(e) => out.push_str(&format!(
                "--- {} Summary ---\nUnavailable: {}\n",
                dashboard.config.year, e
            )),
        }

        out.push_str("\n--- Temperature by Month (mean temp_max, °C) ---\n");
        out.push_str(&render_table(&views.monthly_mean_temp, |v| match v {
            Some(t) => format!("{:.1}", t),
            None => "-".to_string(),
        }));

        out.push_str("\n--- Weather Distribution ---\n");
        out.push_str(&self.render_distribution(&views.distribution));

        out.push_str("\n--- Wind Speed at Checkpoints ---\n");
        out.push_str(&self.render_wind(&views.wind_series));

        out.push_str("\n--- Precipitation by Month (mm) ---\n");
        out.push_str(&render_table(&views.monthly_precip, |v| format!("{:.1}", v)));

        out.push_str("\n--- Monthly Weather Breakdown (days) ---\n");
        out.push_str(&render_table(&views.monthly_weather_counts, |v| v.to_string()));

        if self.preview_rows > 0 {
            out.push_str(&format!(
                "\n--- Raw Data (first {} of {}) ---\n",
                self.preview_rows.min(dashboard.set.len()),
                dashboard.set.len()
            ));
            out.push_str(&self.render_preview(dashboard.set.observations()));
        }

        out
    }

    pub fn render_summary(&self, summary: &YearSummary) -> String {
        format!(
            "--- {} Summary ({} days) ---\n\
            - Max temperature: {:.1}°C\n\
            - Min temperature: {:.1}°C\n\
            - Max precipitation: {:.1} mm\n\
            - Min precipitation: {:.1} mm\n\
            - Max wind: {:.1} km/h\n\
            - Min wind: {:.1} km/h\n\
            - Most common weather: {}\n\
            - Least common weather: {}\n",
            summary.year,
            summary.days,
            summary.max_temp,
            summary.min_temp,
            summary.max_precip,
            summary.min_precip,
            summary.max_wind,
            summary.min_wind,
            summary.most_common_weather,
            summary.least_common_weather
        )
    }

    fn render_distribution(&self, shares: &[CategoryShare]) -> String {
        if shares.is_empty() {
            return "No records\n".to_string();
        }

        let mut out = String::new();
        for share in shares {
            let _ = writeln!(
                out,
                "{:<10} {:>5} days  {:>5.1}%",
                share.weather, share.days, share.percentage
            );
        }
        out
    }

    fn render_wind(&self, series: &[WindSeries]) -> String {
        if series.is_empty() {
            return "No samples for the selected years\n".to_string();
        }

        let mut out = String::new();
        for s in series {
            let points: Vec<String> = s
                .points
                .iter()
                .map(|p| format!("{} {:.1}", p.label, p.wind))
                .collect();
            let _ = writeln!(out, "{}: {}", s.year, points.join(", "));
        }
        out
    }

    fn render_preview(&self, observations: &[Observation]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<10} {:>7} {:>8} {:>8} {:>5}  {}",
            "date", "precip", "temp_max", "temp_min", "wind", "weather"
        );
        for obs in observations.iter().take(self.preview_rows) {
            let _ = writeln!(
                out,
                "{:<10} {:>7.1} {:>8.1} {:>8.1} {:>5.1}  {}",
                obs.date, obs.precipitation, obs.temp_max, obs.temp_min, obs.wind, obs.weather
            );
        }
        out
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Months down, columns across
fn render_table<C, V>(table: &MonthTable<C, V>, cell: impl Fn(&V) -> String) -> String
where
    C: Display + PartialEq,
{
    if table.columns().is_empty() {
        return "No data\n".to_string();
    }

    let mut out = String::from("Month");
    for column in table.columns() {
        let _ = write!(out, " {:>8}", column.to_string());
    }
    out.push('\n');

    for row in table.rows() {
        let _ = write!(out, "{:<5}", row.month.abbreviation());
        for value in &row.values {
            let _ = write!(out, " {:>8}", cell(value));
        }
        out.push('\n');
    }
    out
}
