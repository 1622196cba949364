use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::calendar::{month_day_label, Month};

/// One row as supplied by the record store, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub date: String,
    pub precipitation: String,
    pub temp_max: String,
    pub temp_min: String,
    pub wind: String,
    pub weather: String,
}

/// A data row as read: its cells, or why they could not be decoded
pub type RawRow = std::result::Result<RawObservation, String>;

impl RawObservation {
    pub fn new(
        date: impl Into<String>,
        precipitation: impl ToString,
        temp_max: impl ToString,
        temp_min: impl ToString,
        wind: impl ToString,
        weather: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            precipitation: precipitation.to_string(),
            temp_max: temp_max.to_string(),
            temp_min: temp_min.to_string(),
            wind: wind.to_string(),
            weather: weather.into(),
        }
    }
}

impl From<&Observation> for RawObservation {
    fn from(obs: &Observation) -> Self {
        Self::new(
            obs.date.format("%Y-%m-%d").to_string(),
            obs.precipitation,
            obs.temp_max,
            obs.temp_min,
            obs.wind,
            obs.weather.clone(),
        )
    }
}

/// A parsed daily observation with its derived calendar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    pub date: NaiveDate,

    // Precipitation (mm)
    #[validate(range(min = 0.0))]
    pub precipitation: f64,

    // Temperatures (°C)
    pub temp_max: f64,
    pub temp_min: f64,

    // Wind speed (km/h)
    #[validate(range(min = 0.0))]
    pub wind: f64,

    #[validate(length(min = 1))]
    pub weather: String,

    pub year: i32,
    pub month: Month,
    pub month_day: String,
}

impl Observation {
    /// Build an observation, deriving the calendar fields from `date`.
    pub fn new(
        date: NaiveDate,
        precipitation: f64,
        temp_max: f64,
        temp_min: f64,
        wind: f64,
        weather: impl Into<String>,
    ) -> Result<Self> {
        let measurements = [
            ("precipitation", precipitation),
            ("temp_max", temp_max),
            ("temp_min", temp_min),
            ("wind", wind),
        ];
        for (name, value) in measurements {
            if !value.is_finite() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "{} is not a finite number: {}",
                    name, value
                )));
            }
        }

        let observation = Self {
            date,
            precipitation,
            temp_max,
            temp_min,
            wind,
            weather: weather.into().trim().to_string(),
            year: date.year(),
            month: Month::of(date),
            month_day: month_day_label(date),
        };

        observation.validate()?;
        Ok(observation)
    }

    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::new()
    }

    pub fn temperature_range(&self) -> f64 {
        self.temp_max - self.temp_min
    }

    pub fn has_temperature_inversion(&self) -> bool {
        self.temp_min > self.temp_max
    }

    pub fn is_dry(&self) -> bool {
        self.precipitation == 0.0
    }

    /// Key covering every field; `-0.0` and `0.0` compare equal as they do numerically.
    pub(crate) fn identity_key(&self) -> (NaiveDate, [u64; 4], &str) {
        let bits = |v: f64| (v + 0.0).to_bits();
        (
            self.date,
            [
                bits(self.precipitation),
                bits(self.temp_max),
                bits(self.temp_min),
                bits(self.wind),
            ],
            self.weather.as_str(),
        )
    }
}

#[derive(Default)]
pub struct ObservationBuilder {
    date: Option<NaiveDate>,
    precipitation: Option<f64>,
    temp_max: Option<f64>,
    temp_min: Option<f64>,
    wind: Option<f64>,
    weather: Option<String>,
}

impl ObservationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn precipitation(mut self, precip: f64) -> Self {
        self.precipitation = Some(precip);
        self
    }

    pub fn temp_max(mut self, temp: f64) -> Self {
        self.temp_max = Some(temp);
        self
    }

    pub fn temp_min(mut self, temp: f64) -> Self {
        self.temp_min = Some(temp);
        self
    }

    pub fn temperatures(mut self, min: f64, max: f64) -> Self {
        self.temp_min = Some(min);
        self.temp_max = Some(max);
        self
    }

    pub fn wind(mut self, speed: f64) -> Self {
        self.wind = Some(speed);
        self
    }

    pub fn weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = Some(weather.into());
        self
    }

    pub fn build(self) -> Result<Observation> {
        Observation::new(
            self.date
                .ok_or_else(|| ProcessingError::MissingData("date".to_string()))?,
            self.precipitation.unwrap_or(0.0),
            self.temp_max
                .ok_or_else(|| ProcessingError::MissingData("temp_max".to_string()))?,
            self.temp_min
                .ok_or_else(|| ProcessingError::MissingData("temp_min".to_string()))?,
            self.wind.unwrap_or(0.0),
            self.weather
                .ok_or_else(|| ProcessingError::MissingData("weather".to_string()))?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_creation() {
        let date = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
        let obs = Observation::new(date, 0.0, 12.8, 5.0, 4.7, "drizzle").unwrap();

        assert_eq!(obs.year, 2012);
        assert_eq!(obs.month, Month::Jan);
        assert_eq!(obs.month_day, "Jan 01");
        assert!((obs.temperature_range() - 7.8).abs() < 1e-9);
        assert!(obs.is_dry());
    }

    #[test]
    fn test_negative_precipitation_rejected() {
        let date = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
        assert!(Observation::new(date, -1.0, 12.8, 5.0, 4.7, "rain").is_err());
        assert!(Observation::new(date, 1.0, 12.8, 5.0, -4.7, "rain").is_err());
    }

    #[test]
    fn test_negative_temp_min_allowed() {
        let date = NaiveDate::from_ymd_opt(2012, 2, 10).unwrap();
        let obs = Observation::new(date, 0.0, 1.1, -3.8, 2.0, "snow").unwrap();
        assert_eq!(obs.temp_min, -3.8);
    }

    #[test]
    fn test_non_finite_rejected() {
        let date = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
        assert!(Observation::new(date, f64::NAN, 12.8, 5.0, 4.7, "rain").is_err());
        assert!(Observation::new(date, 0.0, f64::INFINITY, 5.0, 4.7, "rain").is_err());
    }

    #[test]
    fn test_empty_weather_rejected() {
        let date = NaiveDate::from_ymd_opt(2012, 1, 1).unwrap();
        assert!(Observation::new(date, 0.0, 12.8, 5.0, 4.7, "   ").is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let obs = Observation::builder()
            .date(NaiveDate::from_ymd_opt(2013, 7, 4).unwrap())
            .temperatures(14.4, 26.1)
            .precipitation(0.0)
            .wind(2.9)
            .weather("sun")
            .build()
            .unwrap();

        assert_eq!(obs.month, Month::Jul);
        assert_eq!(obs.weather, "sun");

        let missing = Observation::builder().temp_max(1.0).build();
        assert!(matches!(missing, Err(ProcessingError::MissingData(_))));
    }

    #[test]
    fn test_raw_conversion_keeps_values() {
        let obs = Observation::builder()
            .date(NaiveDate::from_ymd_opt(2015, 12, 31).unwrap())
            .temperatures(-2.1, 5.6)
            .precipitation(0.3)
            .wind(3.5)
            .weather("fog")
            .build()
            .unwrap();

        let raw = RawObservation::from(&obs);
        assert_eq!(raw.date, "2015-12-31");
        assert_eq!(raw.temp_min, "-2.1");
        assert_eq!(raw.precipitation, "0.3");
    }
}
