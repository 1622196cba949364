use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::Aggregator;
use crate::error::{ProcessingError, Result};

/// Headline statistics for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub days: usize,
    pub max_temp: f64,
    pub min_temp: f64,
    pub max_precip: f64,
    pub min_precip: f64,
    pub max_wind: f64,
    pub min_wind: f64,
    pub most_common_weather: String,
    pub least_common_weather: String,
}

impl Aggregator<'_> {
    /// Summary over the records of `year`.
    ///
    /// `max_temp` is the highest `temp_max` and `min_temp` the lowest
    /// `temp_min`. Weather ties are broken by label: the lexically smallest
    /// category among those sharing the top (or bottom) count is reported.
    pub fn year_summary(&self, year: i32) -> Result<YearSummary> {
        let mut days = 0usize;
        let mut max_temp = f64::NEG_INFINITY;
        let mut min_temp = f64::INFINITY;
        let mut max_precip = f64::NEG_INFINITY;
        let mut min_precip = f64::INFINITY;
        let mut max_wind = f64::NEG_INFINITY;
        let mut min_wind = f64::INFINITY;
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for obs in self.set().for_year(year) {
            days += 1;
            max_temp = max_temp.max(obs.temp_max);
            min_temp = min_temp.min(obs.temp_min);
            max_precip = max_precip.max(obs.precipitation);
            min_precip = min_precip.min(obs.precipitation);
            max_wind = max_wind.max(obs.wind);
            min_wind = min_wind.min(obs.wind);
            *counts.entry(obs.weather.as_str()).or_default() += 1;
        }

        let (most_common, least_common) = match (most_common(&counts), least_common(&counts)) {
            (Some(most), Some(least)) => (most.to_string(), least.to_string()),
            _ => return Err(ProcessingError::EmptyYear { year }),
        };

        Ok(YearSummary {
            year,
            days,
            max_temp,
            min_temp,
            max_precip,
            min_precip,
            max_wind,
            min_wind,
            most_common_weather: most_common,
            least_common_weather: least_common,
        })
    }
}

/// Category with the highest count; ties go to the lexically smallest label
pub fn most_common<'a>(counts: &BTreeMap<&'a str, usize>) -> Option<&'a str> {
    let mut best: Option<(&'a str, usize)> = None;
    for (&label, &count) in counts {
        if best.map_or(true, |(_, n)| count > n) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}

/// Category with the lowest count; ties go to the lexically smallest label
pub fn least_common<'a>(counts: &BTreeMap<&'a str, usize>) -> Option<&'a str> {
    let mut best: Option<(&'a str, usize)> = None;
    for (&label, &count) in counts {
        if best.map_or(true, |(_, n)| count < n) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}
