use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use weather_dashboard::analyzers::{Aggregator, WeatherBucket};
use weather_dashboard::config::DashboardConfig;
use weather_dashboard::models::Month;
use weather_dashboard::processors::{DashboardPipeline, MalformedPolicy, Normalizer};
use weather_dashboard::readers::CsvReader;
use weather_dashboard::writers::{CsvWriter, JsonWriter, ParquetWriter, ReportWriter};
use weather_dashboard::ProcessingError;

const DATASET: &str = "\
date,precipitation,temp_max,temp_min,wind,weather
2012-01-01,0.0,14.0,10.0,4.0,rain
2012-01-02,10.9,10.6,11.0,4.5,rain
2012-01-03,0.8,11.7,12.0,2.3,rain
2012-01-04,0.0,12.2,10.5,4.7,sun
2012-01-04,0.0,12.2,10.5,4.7,sun
2012-01-05,0.0,11.1,10.5,6.1,sun
2012-01-06,0.0,12.2,10.5,5.0,sun
2013-02-10,1.3,8.3,3.3,2.1,drizzle
2013-02-11,,8.9,3.9,2.0,fog
";

fn dataset_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn config() -> DashboardConfig {
    DashboardConfig {
        year: 2012,
        compare_years: vec![2012, 2013],
        max_workers: 2,
        ..DashboardConfig::default()
    }
}

#[tokio::test]
async fn test_dashboard_from_csv() {
    let file = dataset_file(DATASET);
    let dashboard = DashboardPipeline::new(config())
        .with_silent(true)
        .run_path(file.path())
        .await
        .unwrap();

    assert_eq!(dashboard.total_rows, 9);
    assert_eq!(dashboard.set.len(), 7);
    assert_eq!(dashboard.duplicates_removed, 1);
    assert_eq!(dashboard.rejected.len(), 1);
    assert_eq!(dashboard.rejected[0].row, 9);

    let summary = dashboard.views.summary.as_ref().unwrap();
    assert_eq!(summary.days, 6);
    assert_eq!(summary.max_temp, 14.0);
    assert_eq!(summary.min_temp, 10.0);
    // three rain days, three sun days
    assert_eq!(summary.most_common_weather, "rain");
    assert_eq!(summary.least_common_weather, "rain");

    let wind: Vec<_> = dashboard
        .views
        .wind_series
        .iter()
        .map(|s| (s.year, s.as_pairs()))
        .collect();
    assert_eq!(wind, vec![(2012, vec![("Jan 01", 4.0)])]);

    let counts = &dashboard.views.monthly_weather_counts;
    assert_eq!(counts.get(Month::Jan, &WeatherBucket::category("rain")), Some(&3));
    assert_eq!(counts.get(Month::Jan, &WeatherBucket::category("snow")), Some(&0));
    assert_eq!(counts.get(Month::Feb, &WeatherBucket::category("drizzle")), Some(&1));

    let precip = &dashboard.views.monthly_precip;
    assert_eq!(precip.get(Month::Mar, &2012), Some(&0.0));
    assert_eq!(dashboard.views.monthly_mean_temp.get(Month::Mar, &2012), Some(&None));

    let months: Vec<Month> = dashboard.views.monthly_mean_temp.months().collect();
    assert_eq!(months, Month::ALL.to_vec());
}

#[tokio::test]
async fn test_abort_on_malformed_row() {
    let file = dataset_file(DATASET);
    let config = DashboardConfig {
        malformed_policy: MalformedPolicy::Abort,
        ..config()
    };

    let result = DashboardPipeline::new(config)
        .with_silent(true)
        .run_path(file.path())
        .await;

    match result {
        Err(ProcessingError::MalformedRecord { row, .. }) => assert_eq!(row, 9),
        other => panic!("expected MalformedRecord, got {:?}", other.map(|d| d.set.len())),
    }
}

#[tokio::test]
async fn test_undecodable_row_is_rejected_not_fatal() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(b"date,precipitation,temp_max,temp_min,wind,weather\n").unwrap();
    file.write_all(b"2012-01-01,0.0,14.0,10.0,4.0,rain\n").unwrap();
    file.write_all(b"2012-01-02,10.9,10.6,4.0,4.5,\xffrain\n").unwrap();
    file.write_all(b"2012-01-03,0.8,11.7,7.2,2.3,sun\n").unwrap();

    let dashboard = DashboardPipeline::new(config())
        .with_silent(true)
        .run_path(file.path())
        .await
        .unwrap();

    assert_eq!(dashboard.set.len(), 2);
    assert_eq!(dashboard.total_rows, 3);
    assert_eq!(dashboard.rejected.len(), 1);
    assert_eq!(dashboard.rejected[0].row, 2);
    assert!(dashboard.rejected[0].reason.contains("UTF-8"));

    let aborting = DashboardConfig {
        malformed_policy: MalformedPolicy::Abort,
        ..config()
    };
    let result = DashboardPipeline::new(aborting)
        .with_silent(true)
        .run_path(file.path())
        .await;
    assert!(matches!(result, Err(ProcessingError::MalformedRecord { row: 2, .. })));
}

#[test]
fn test_normalization_is_idempotent() {
    let rows = CsvReader::new().read_from(DATASET.as_bytes()).unwrap();
    let normalizer = Normalizer::new().with_max_workers(2);

    let first = normalizer.normalize(&rows).unwrap();
    let second = normalizer.normalize(&first.set.to_raw_rows()).unwrap();

    assert_eq!(second.set, first.set);
    assert_eq!(second.duplicates_removed, 0);
    assert!(second.rejected.is_empty());
}

#[test]
fn test_missing_year_is_an_error() {
    let rows = CsvReader::new().read_from(DATASET.as_bytes()).unwrap();
    let normalization = Normalizer::new().normalize(&rows).unwrap();

    let result = Aggregator::new(&normalization.set).year_summary(1999);
    assert!(matches!(result, Err(ProcessingError::EmptyYear { year: 1999 })));
}

#[tokio::test]
async fn test_exports() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let file = dataset_file(DATASET);
    let dashboard = DashboardPipeline::new(config())
        .with_silent(true)
        .run_path(file.path())
        .await
        .unwrap();
    let observations = dashboard.set.observations();

    let parquet_path = temp_dir.path().join("weather.parquet");
    let writer = ParquetWriter::new().with_compression("zstd").unwrap();
    writer.write_observations(observations, &parquet_path).unwrap();
    assert_eq!(writer.get_file_info(&parquet_path).unwrap().total_rows, 7);
    assert_eq!(writer.read_observations(&parquet_path, 0).unwrap(), observations);

    let csv_path = temp_dir.path().join("weather.csv");
    CsvWriter::new().write_observations(observations, &csv_path).unwrap();
    let rows = CsvReader::new().read_path(&csv_path).unwrap();
    let reloaded = Normalizer::new().normalize(&rows).unwrap();
    assert_eq!(reloaded.set.observations(), observations);

    let json_path = temp_dir.path().join("dashboard.json");
    JsonWriter::new().write_dashboard(&dashboard, &json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["summary"]["max_temp"], 14.0);
    assert_eq!(value["records"], 7);
    assert_eq!(value["monthly_weather_counts"]["columns"][5], "other");
    assert_eq!(value["monthly_mean_temp"]["rows"][2]["values"][0], serde_json::Value::Null);
    assert!(value.get("raw_data").is_none());
}

#[tokio::test]
async fn test_report_rendering() {
    let file = dataset_file(DATASET);
    let config = DashboardConfig {
        year: 2020,
        ..config()
    };
    let dashboard = DashboardPipeline::new(config)
        .with_silent(true)
        .run_path(file.path())
        .await
        .unwrap();

    let report = ReportWriter::new().with_preview_rows(3).render(&dashboard);
    assert!(report.contains("Unavailable: No records found for year 2020"));
    assert!(report.contains("Monthly Weather Breakdown"));
    assert!(report.contains("Raw Data (first 3 of 7)"));
}

#[test]
fn test_config_file_and_validation() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{"year": 2013, "checkpoints": ["Feb 10"], "categories": ["drizzle", "fog"]}}"#
    )
    .unwrap();

    let config = DashboardConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.year, 2013);
    assert_eq!(config.checkpoints, vec!["Feb 10"]);

    let bad = DashboardConfig {
        checkpoints: vec!["Feb 30".to_string()],
        ..DashboardConfig::default()
    };
    assert!(bad.check().is_err());
}
