use serde::Serialize;
use std::collections::HashSet;

use crate::analyzers::Aggregator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindPoint {
    pub label: String,
    pub wind: f64,
}

/// Wind samples of one year at the checkpoint dates, in date order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindSeries {
    pub year: i32,
    pub points: Vec<WindPoint>,
}

impl WindSeries {
    pub fn as_pairs(&self) -> Vec<(&str, f64)> {
        self.points
            .iter()
            .map(|p| (p.label.as_str(), p.wind))
            .collect()
    }
}

impl Aggregator<'_> {
    /// Wind at the given month-day labels for each requested year.
    ///
    /// Years come back in the order requested (repeats ignored). A year with
    /// no record on any checkpoint has no series at all; missing checkpoints
    /// are left out rather than zero-filled.
    pub fn wind_series<S: AsRef<str>>(&self, years: &[i32], checkpoints: &[S]) -> Vec<WindSeries> {
        let checkpoints: HashSet<&str> = checkpoints.iter().map(|c| c.as_ref()).collect();
        let mut seen_years = HashSet::new();
        let mut series = Vec::new();

        for &year in years {
            if !seen_years.insert(year) {
                continue;
            }

            let mut samples: Vec<_> = self
                .set()
                .for_year(year)
                .filter(|o| checkpoints.contains(o.month_day.as_str()))
                .collect();

            if samples.is_empty() {
                continue;
            }

            samples.sort_by_key(|o| o.date);

            series.push(WindSeries {
                year,
                points: samples
                    .into_iter()
                    .map(|o| WindPoint {
                        label: o.month_day.clone(),
                        wind: o.wind,
                    })
                    .collect(),
            });
        }

        series
    }
}
