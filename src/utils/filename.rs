use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Default export filename: output/weather-dashboard-{YYMMDD}.{extension}
pub fn generate_default_output_filename(extension: &str) -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100; // Get last 2 digits of year
    let month = now.month();
    let day = now.day();

    let filename = format!(
        "weather-dashboard-{:02}{:02}{:02}.{}",
        year,
        month,
        day,
        extension.trim_start_matches('.')
    );
    PathBuf::from("output").join(filename)
}
