use crate::models::NormalizedSet;

/// Read-only queries over a normalized set.
///
/// Every query is a pure function of the set: nothing is cached or mutated,
/// so any number of aggregators may run over the same set at once and the
/// same query always returns the same answer.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    set: &'a NormalizedSet,
}

impl<'a> Aggregator<'a> {
    pub fn new(set: &'a NormalizedSet) -> Self {
        Self { set }
    }

    pub fn set(&self) -> &'a NormalizedSet {
        self.set
    }
}
