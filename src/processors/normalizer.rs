use crate::error::{ProcessingError, Result};
use crate::models::{NormalizedSet, Observation, RawObservation, RawRow};
use crate::utils::constants::{DATETIME_FORMATS, DATE_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What to do with a row that cannot be parsed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Drop the row and report it alongside the result
    #[default]
    Skip,
    /// Fail the whole normalization on the first bad row
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    /// 1-based data row, header excluded
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Normalization {
    pub set: NormalizedSet,
    pub rejected: Vec<RejectedRow>,
    pub duplicates_removed: usize,
}

impl Normalization {
    pub fn total_rows(&self) -> usize {
        self.set.len() + self.rejected.len() + self.duplicates_removed
    }
}

pub struct Normalizer {
    max_workers: usize,
    policy: MalformedPolicy,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            max_workers: num_cpus::get(),
            policy: MalformedPolicy::default(),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parse, derive calendar fields and drop exact duplicates.
    ///
    /// Rows are parsed in parallel; the output keeps input order and the first
    /// occurrence of every duplicate.
    pub fn normalize(&self, rows: &[RawObservation]) -> Result<Normalization> {
        self.normalize_with(rows, parse_row)
    }

    /// Same as [`Normalizer::normalize`] over rows as read by the record store;
    /// an undecodable row is malformed at its position.
    pub fn normalize_rows(&self, rows: &[RawRow]) -> Result<Normalization> {
        self.normalize_with(rows, |row, raw| match raw {
            Ok(raw) => parse_row(row, raw),
            Err(reason) => Err(ProcessingError::malformed(row, reason.as_str())),
        })
    }

    fn normalize_with<T, F>(&self, rows: &[T], parse: F) -> Result<Normalization>
    where
        T: Sync,
        F: Fn(usize, &T) -> Result<Observation> + Sync,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let parsed: Vec<Result<Observation>> = pool.install(|| {
            rows.par_iter()
                .enumerate()
                .map(|(i, raw)| parse(i + 1, raw))
                .collect()
        });

        let mut observations = Vec::with_capacity(parsed.len());
        let mut rejected = Vec::new();

        for result in parsed {
            match result {
                Ok(obs) => observations.push(obs),
                Err(e) if self.policy == MalformedPolicy::Abort => return Err(e),
                Err(ProcessingError::MalformedRecord { row, reason }) => {
                    warn!("Skipping row {}: {}", row, reason);
                    rejected.push(RejectedRow { row, reason });
                }
                Err(e) => return Err(e),
            }
        }

        let parsed_count = observations.len();
        let set = NormalizedSet::from_observations(observations);
        let duplicates_removed = parsed_count - set.len();

        if duplicates_removed > 0 {
            debug!("Removed {} duplicate rows", duplicates_removed);
        }
        info!(
            "Normalized {} rows: {} kept, {} duplicates, {} rejected",
            rows.len(),
            set.len(),
            duplicates_removed,
            rejected.len()
        );

        Ok(Normalization {
            set,
            rejected,
            duplicates_removed,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one raw row into an observation
pub fn parse_row(row: usize, raw: &RawObservation) -> Result<Observation> {
    let date = parse_date(&raw.date)
        .ok_or_else(|| ProcessingError::malformed(row, format!("invalid date '{}'", raw.date)))?;

    let precipitation = parse_measurement(row, "precipitation", &raw.precipitation)?;
    let temp_max = parse_measurement(row, "temp_max", &raw.temp_max)?;
    let temp_min = parse_measurement(row, "temp_min", &raw.temp_min)?;
    let wind = parse_measurement(row, "wind", &raw.wind)?;

    Observation::new(date, precipitation, temp_max, temp_min, wind, raw.weather.as_str())
        .map_err(|e| ProcessingError::malformed(row, e.to_string()))
}

/// ISO-8601 calendar date, or a date-time whose date part is kept
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(date);
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

fn parse_measurement(row: usize, name: &str, value: &str) -> Result<f64> {
    let parsed = value.trim().parse::<f64>().map_err(|_| {
        ProcessingError::malformed(row, format!("invalid {} '{}'", name, value))
    })?;

    // "NaN" and "inf" parse fine but must not leak into the aggregates
    if !parsed.is_finite() {
        return Err(ProcessingError::malformed(
            row,
            format!("{} is not a finite number: '{}'", name, value),
        ));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Month;
    use pretty_assertions::assert_eq;

    fn raw(date: &str, temp_max: &str, weather: &str) -> RawObservation {
        RawObservation::new(date, "0.0", temp_max, "1.5", "3.0", weather)
    }

    #[test]
    fn test_parse_row_derives_calendar_fields() {
        let obs = parse_row(1, &raw("2013-03-01", "9.4", "rain")).unwrap();

        assert_eq!(obs.year, 2013);
        assert_eq!(obs.month, Month::Mar);
        assert_eq!(obs.month_day, "Mar 01");
        assert_eq!(obs.temp_max, 9.4);
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2014, 5, 1);
        assert_eq!(parse_date("2014-05-01"), expected);
        assert_eq!(parse_date(" 2014-05-01T00:00:00 "), expected);
        assert_eq!(parse_date("2014-05-01 13:45:00"), expected);
        assert_eq!(parse_date("2014-05-01T00:00:00.000"), expected);
        assert_eq!(parse_date("05/01/2014"), None);
        assert_eq!(parse_date("2014-02-30"), None);
    }

    #[test]
    fn test_malformed_rows() {
        let cases = [
            raw("not-a-date", "9.4", "rain"),
            raw("2012-01-01", "warm", "rain"),
            raw("2012-01-01", "NaN", "rain"),
            raw("2012-01-01", "", "rain"),
            raw("2012-01-01", "9.4", ""),
            RawObservation::new("2012-01-01", "-3.0", "9.4", "1.0", "3.0", "rain"),
        ];

        for (i, case) in cases.iter().enumerate() {
            let err = parse_row(i + 1, case).unwrap_err();
            match err {
                ProcessingError::MalformedRecord { row, .. } => assert_eq!(row, i + 1),
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_dedup_two_identical_plus_one_distinct() {
        let rows = vec![
            raw("2012-01-01", "10.0", "rain"),
            raw("2012-01-01", "10.0", "rain"),
            raw("2012-01-02", "14.0", "sun"),
        ];

        let result = Normalizer::new().with_max_workers(2).normalize(&rows).unwrap();

        assert_eq!(result.set.len(), 2);
        assert_eq!(result.duplicates_removed, 1);
        assert!(result.rejected.is_empty());
        assert_eq!(result.total_rows(), 3);
    }

    #[test]
    fn test_numerically_equal_text_counts_as_duplicate() {
        let rows = vec![raw("2012-01-01", "10", "rain"), raw("2012-01-01", "10.0", "rain")];
        let result = Normalizer::new().normalize(&rows).unwrap();
        assert_eq!(result.set.len(), 1);
    }

    #[test]
    fn test_order_is_stable() {
        let rows = vec![
            raw("2012-03-01", "1.0", "fog"),
            raw("2012-01-01", "2.0", "fog"),
            raw("2012-03-01", "1.0", "fog"),
            raw("2012-02-01", "3.0", "fog"),
        ];

        let result = Normalizer::new().normalize(&rows).unwrap();
        let dates: Vec<String> = result.set.iter().map(|o| o.date.to_string()).collect();
        assert_eq!(dates, vec!["2012-03-01", "2012-01-01", "2012-02-01"]);
    }

    #[test]
    fn test_idempotent() {
        let rows = vec![
            raw("2012-01-01", "10.0", "rain"),
            raw("2012-01-01", "10.0", "rain"),
            raw("2012-01-02", "14.0", "sun"),
            raw("2012-01-03", "-0.5", "snow"),
        ];

        let normalizer = Normalizer::new();
        let first = normalizer.normalize(&rows).unwrap();
        let second = normalizer.normalize(&first.set.to_raw_rows()).unwrap();

        assert_eq!(second.set, first.set);
        assert_eq!(second.duplicates_removed, 0);
    }

    #[test]
    fn test_skip_policy_reports_rejected_rows() {
        let rows = vec![
            raw("2012-01-01", "10.0", "rain"),
            raw("2012-13-01", "10.0", "rain"),
            raw("2012-01-02", "oops", "sun"),
        ];

        let result = Normalizer::new()
            .with_policy(MalformedPolicy::Skip)
            .normalize(&rows)
            .unwrap();

        assert_eq!(result.set.len(), 1);
        let rejected: Vec<usize> = result.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rejected, vec![2, 3]);
    }

    #[test]
    fn test_abort_policy_fails_on_first_bad_row() {
        let rows = vec![
            raw("2012-01-01", "10.0", "rain"),
            raw("2012-01-02", "oops", "sun"),
            raw("garbage", "10.0", "rain"),
        ];

        let err = Normalizer::new()
            .with_policy(MalformedPolicy::Abort)
            .normalize(&rows)
            .unwrap_err();

        assert!(matches!(err, ProcessingError::MalformedRecord { row: 2, .. }));
    }

    #[test]
    fn test_undecodable_row_follows_policy() {
        let rows: Vec<RawRow> = vec![
            Ok(raw("2012-01-01", "10.0", "rain")),
            Err("weather is not valid UTF-8".to_string()),
            Ok(raw("2012-01-03", "11.0", "sun")),
        ];

        let skipped = Normalizer::new().normalize_rows(&rows).unwrap();
        assert_eq!(skipped.set.len(), 2);
        assert_eq!(
            skipped.rejected,
            vec![RejectedRow {
                row: 2,
                reason: "weather is not valid UTF-8".to_string()
            }]
        );
        assert_eq!(skipped.total_rows(), 3);

        let err = Normalizer::new()
            .with_policy(MalformedPolicy::Abort)
            .normalize_rows(&rows)
            .unwrap_err();
        assert!(matches!(err, ProcessingError::MalformedRecord { row: 2, .. }));
    }

    #[test]
    fn test_unknown_category_tolerated() {
        let rows = vec![raw("2012-01-01", "10.0", "hail")];
        let result = Normalizer::new().normalize(&rows).unwrap();
        assert_eq!(result.set.observations()[0].weather, "hail");
    }
}
