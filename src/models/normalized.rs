use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::models::{Observation, RawObservation};

/// Deduplicated observations with derived calendar fields.
///
/// The set is an immutable snapshot: it is built once by the normalizer and
/// only ever read afterwards, so it can be shared freely between concurrent
/// aggregations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedSet {
    observations: Vec<Observation>,
}

impl NormalizedSet {
    /// Build a set from parsed observations, keeping the first of any
    /// field-wise identical records.
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let keep: Vec<bool> = {
            let mut seen = HashSet::with_capacity(observations.len());
            observations
                .iter()
                .map(|obs| seen.insert(obs.identity_key()))
                .collect()
        };

        let observations = observations
            .into_iter()
            .zip(keep)
            .filter_map(|(obs, first)| first.then_some(obs))
            .collect();

        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct years present, ascending
    pub fn years(&self) -> Vec<i32> {
        self.observations
            .iter()
            .map(|o| o.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn for_year(&self, year: i32) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(move |o| o.year == year)
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.observations.iter().map(|o| o.date).min()?;
        let max = self.observations.iter().map(|o| o.date).max()?;
        Some((min, max))
    }

    /// Raw form of every record, suitable for feeding back into the normalizer
    pub fn to_raw_rows(&self) -> Vec<RawObservation> {
        self.observations.iter().map(RawObservation::from).collect()
    }
}

impl<'a> IntoIterator for &'a NormalizedSet {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
