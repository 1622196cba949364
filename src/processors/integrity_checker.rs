use crate::models::{NormalizedSet, Observation};
use crate::utils::constants::{
    MAX_PLAUSIBLE_PRECIP, MAX_PLAUSIBLE_TEMP, MAX_PLAUSIBLE_WIND, MIN_PLAUSIBLE_TEMP,
    TEMP_JUMP_THRESHOLD,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub clean_records: usize,
    pub violations: Vec<Violation>,
    /// Labels outside the configured vocabulary, with their day counts
    pub unknown_categories: BTreeMap<String, usize>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.unknown_categories.is_empty()
    }

    pub fn count(&self, kind: ViolationType) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub date: NaiveDate,
    pub kind: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    TemperatureInversion,
    TemperatureOutOfRange,
    ExtremePrecipitation,
    ExtremeWind,
    SuspiciousJump,
    ConflictingDate,
}

/// Data-quality checks over a normalized set.
///
/// Nothing here rejects a record; findings are reported so the caller can
/// decide whether the dashboard is trustworthy.
pub struct IntegrityChecker {
    categories: Vec<String>,
    temperature_jump_threshold: f64,
}

impl IntegrityChecker {
    pub fn new<S: AsRef<str>>(categories: &[S]) -> Self {
        Self {
            categories: categories.iter().map(|c| c.as_ref().to_string()).collect(),
            temperature_jump_threshold: TEMP_JUMP_THRESHOLD,
        }
    }

    pub fn with_jump_threshold(mut self, threshold: f64) -> Self {
        self.temperature_jump_threshold = threshold;
        self
    }

    pub fn check_integrity(&self, set: &NormalizedSet) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: set.len(),
            ..IntegrityReport::default()
        };

        for obs in set {
            let before = report.violations.len();
            self.check_record(obs, &mut report);
            if report.violations.len() == before {
                report.clean_records += 1;
            }

            if !self.categories.iter().any(|c| *c == obs.weather) {
                *report
                    .unknown_categories
                    .entry(obs.weather.clone())
                    .or_default() += 1;
            }
        }

        self.check_time_series(set, &mut report);
        report
    }

    fn check_record(&self, obs: &Observation, report: &mut IntegrityReport) {
        if obs.has_temperature_inversion() {
            report.violations.push(Violation {
                date: obs.date,
                kind: ViolationType::TemperatureInversion,
                details: format!(
                    "temp_min {} is above temp_max {}",
                    obs.temp_min, obs.temp_max
                ),
            });
        }

        for (temp, name) in [(obs.temp_max, "temp_max"), (obs.temp_min, "temp_min")] {
            if !(MIN_PLAUSIBLE_TEMP..=MAX_PLAUSIBLE_TEMP).contains(&temp) {
                report.violations.push(Violation {
                    date: obs.date,
                    kind: ViolationType::TemperatureOutOfRange,
                    details: format!(
                        "{} {} is outside [{}, {}]",
                        name, temp, MIN_PLAUSIBLE_TEMP, MAX_PLAUSIBLE_TEMP
                    ),
                });
            }
        }

        if obs.precipitation > MAX_PLAUSIBLE_PRECIP {
            report.violations.push(Violation {
                date: obs.date,
                kind: ViolationType::ExtremePrecipitation,
                details: format!("precipitation {} mm", obs.precipitation),
            });
        }

        if obs.wind > MAX_PLAUSIBLE_WIND {
            report.violations.push(Violation {
                date: obs.date,
                kind: ViolationType::ExtremeWind,
                details: format!("wind {}", obs.wind),
            });
        }
    }

    /// Day-to-day jumps and dates that appear with different values
    fn check_time_series(&self, set: &NormalizedSet, report: &mut IntegrityReport) {
        let mut by_date: HashMap<NaiveDate, Vec<&Observation>> = HashMap::new();
        for obs in set {
            by_date.entry(obs.date).or_default().push(obs);
        }

        let mut dates: Vec<NaiveDate> = by_date.keys().copied().collect();
        dates.sort();

        for date in &dates {
            let count = by_date[date].len();
            if count > 1 {
                report.violations.push(Violation {
                    date: *date,
                    kind: ViolationType::ConflictingDate,
                    details: format!("{} differing records share this date", count),
                });
            }
        }

        for window in dates.windows(2) {
            let (prev, curr) = (window[0], window[1]);
            if curr.signed_duration_since(prev).num_days() != 1 {
                continue;
            }

            let prev_max = by_date[&prev][0].temp_max;
            let curr_max = by_date[&curr][0].temp_max;
            let jump = (curr_max - prev_max).abs();

            if jump > self.temperature_jump_threshold {
                report.violations.push(Violation {
                    date: curr,
                    kind: ViolationType::SuspiciousJump,
                    details: format!(
                        "temp_max jumped {:.1}°C from {} to {}",
                        jump, prev, curr
                    ),
                });
            }
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();
        let pct = |n: usize| {
            if report.total_records == 0 {
                0.0
            } else {
                100.0 * n as f64 / report.total_records as f64
            }
        };

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Clean Records: {} ({:.1}%)\n",
            report.clean_records,
            pct(report.clean_records)
        ));
        summary.push_str(&format!("Violations: {}\n", report.violations.len()));

        let kinds = [
            (ViolationType::TemperatureInversion, "temperature inversions"),
            (ViolationType::TemperatureOutOfRange, "temperatures out of range"),
            (ViolationType::ExtremePrecipitation, "extreme precipitation"),
            (ViolationType::ExtremeWind, "extreme wind"),
            (ViolationType::SuspiciousJump, "suspicious jumps"),
            (ViolationType::ConflictingDate, "conflicting dates"),
        ];
        for (kind, label) in kinds {
            let n = report.count(kind);
            if n > 0 {
                summary.push_str(&format!("  - {}: {}\n", label, n));
            }
        }

        if !report.unknown_categories.is_empty() {
            summary.push_str("\nUnknown weather categories (counted as 'other'):\n");
            for (label, days) in &report.unknown_categories {
                summary.push_str(&format!("  - {}: {} days\n", label, days));
            }
        }

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {}: {}\n",
                    i + 1,
                    violation.date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new(&crate::utils::constants::DEFAULT_CATEGORIES)
    }
}
