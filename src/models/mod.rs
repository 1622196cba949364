pub mod calendar;
pub mod normalized;
pub mod observation;

pub use calendar::{month_day_label, validate_month_day_label, Month};
pub use normalized::NormalizedSet;
pub use observation::{Observation, ObservationBuilder, RawObservation, RawRow};
