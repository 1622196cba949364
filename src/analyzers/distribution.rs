use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::Aggregator;

/// Share of all days with a given weather label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub weather: String,
    pub days: usize,
    pub percentage: f64,
}

impl Aggregator<'_> {
    /// Day count and percentage per weather label over the whole set,
    /// most frequent first (ties by label).
    pub fn weather_distribution(&self) -> Vec<CategoryShare> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for obs in self.set() {
            *counts.entry(obs.weather.as_str()).or_default() += 1;
        }

        let total = self.set().len();
        let mut shares: Vec<CategoryShare> = counts
            .into_iter()
            .map(|(weather, days)| CategoryShare {
                weather: weather.to_string(),
                days,
                percentage: 100.0 * days as f64 / total as f64,
            })
            .collect();

        // Stable sort keeps the lexical order among equal counts
        shares.sort_by(|a, b| b.days.cmp(&a.days));
        shares
    }
}
