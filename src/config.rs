//! Dashboard configuration.
//!
//! Everything the aggregations need from the caller lives here: the target
//! year, the years to compare, the wind checkpoints and the weather category
//! vocabulary. Values come from built-in defaults, an optional TOML/JSON file
//! and `WXDASH_*` environment variables, in that order; command-line flags are
//! applied on top by the CLI.

use std::collections::HashSet;
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::validate_month_day_label;
use crate::processors::MalformedPolicy;
use crate::utils::constants::{
    DEFAULT_CATEGORIES, DEFAULT_CHECKPOINTS, DEFAULT_COMPARE_YEARS, DEFAULT_YEAR, ENV_PREFIX,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    /// Year the summary cards are computed for
    pub year: i32,

    /// Years shown side by side in the comparison charts
    #[validate(length(min = 1))]
    pub compare_years: Vec<i32>,

    /// Month-day labels sampled for the wind series
    #[validate(length(min = 1))]
    pub checkpoints: Vec<String>,

    /// Weather categories broken out per month
    #[validate(length(min = 1))]
    pub categories: Vec<String>,

    #[validate(range(min = 1))]
    pub max_workers: usize,

    pub malformed_policy: MalformedPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            year: DEFAULT_YEAR,
            compare_years: DEFAULT_COMPARE_YEARS.to_vec(),
            checkpoints: DEFAULT_CHECKPOINTS.iter().map(|s| s.to_string()).collect(),
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            max_workers: num_cpus::get(),
            malformed_policy: MalformedPolicy::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from an optional file plus the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("compare_years")
                .with_list_parse_key("checkpoints")
                .with_list_parse_key("categories"),
        );

        let config: DashboardConfig = builder.build()?.try_deserialize()?;
        config.check()?;
        Ok(config)
    }

    /// Field rules plus the checks that span values
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        for checkpoint in &self.checkpoints {
            validate_month_day_label(checkpoint)
                .map_err(|e| ProcessingError::Config(e.to_string()))?;
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.trim().is_empty() {
                return Err(ProcessingError::Config(
                    "Weather categories must not be empty".to_string(),
                ));
            }
            if !seen.insert(category.as_str()) {
                return Err(ProcessingError::Config(format!(
                    "Weather category '{}' listed twice",
                    category
                )));
            }
        }

        Ok(())
    }

    pub fn with_year(mut self, year: Option<i32>) -> Self {
        if let Some(year) = year {
            self.year = year;
        }
        self
    }

    pub fn with_compare_years(mut self, years: Vec<i32>) -> Self {
        if !years.is_empty() {
            self.compare_years = years;
        }
        self
    }

    pub fn with_max_workers(mut self, max_workers: Option<usize>) -> Self {
        if let Some(max_workers) = max_workers {
            self.max_workers = max_workers;
        }
        self
    }

    pub fn with_malformed_policy(mut self, policy: Option<MalformedPolicy>) -> Self {
        if let Some(policy) = policy {
            self.malformed_policy = policy;
        }
        self
    }
}
