use crate::analyzers::Aggregator;
use crate::cli::args::{Cli, Commands, ExportFormat};
use crate::config::DashboardConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::{DashboardPipeline, IntegrityChecker, Normalization, Normalizer};
use crate::readers::CsvReader;
use crate::utils::filename::generate_default_output_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, JsonWriter, ParquetWriter, ReportWriter};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, Level};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;
    let config = DashboardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Dashboard {
            input,
            year,
            compare_years,
            json,
            raw,
            preview_rows,
            max_workers,
            malformed,
        } => {
            let config = config
                .with_year(year)
                .with_compare_years(compare_years)
                .with_max_workers(max_workers)
                .with_malformed_policy(malformed);

            println!("Building dashboard from {}", input.display());
            let dashboard = DashboardPipeline::new(config).run_path(&input).await?;

            let mut writer = ReportWriter::new();
            if let Some(rows) = preview_rows {
                writer = writer.with_preview_rows(rows);
            }
            println!("\n{}", writer.render(&dashboard));

            let checker = IntegrityChecker::new(&dashboard.config.categories);
            println!("{}", checker.generate_summary(&dashboard.integrity));

            if let Some(path) = json {
                let path = resolve_output(path, "json")?;
                JsonWriter::new()
                    .with_raw_data(raw)
                    .write_dashboard(&dashboard, &path)?;
                println!("Dashboard JSON written to {}", path.display());
            }
        }

        Commands::Summary { input, year } => {
            let years = if year.is_empty() { vec![config.year] } else { year };
            let normalization = normalize_file(&input, &config).await?;
            let aggregator = Aggregator::new(&normalization.set);
            let writer = ReportWriter::new();

            for year in years {
                match aggregator.year_summary(year) {
                    Ok(summary) => println!("{}", writer.render_summary(&summary)),
                    Err(e) => println!("{}: {}\n", year, e),
                }
            }
        }

        Commands::Validate { input, max_workers } => {
            let config = config.with_max_workers(max_workers);
            println!("Validating weather data: {}", input.display());

            let normalization = normalize_file(&input, &config).await?;
            println!(
                "Parsed {} rows: {} records kept, {} duplicates removed, {} rejected",
                normalization.total_rows(),
                normalization.set.len(),
                normalization.duplicates_removed,
                normalization.rejected.len()
            );
            for rejected in normalization.rejected.iter().take(10) {
                println!("  - row {}: {}", rejected.row, rejected.reason);
            }

            let checker = IntegrityChecker::new(&config.categories);
            let report = checker.check_integrity(&normalization.set);
            println!("\n{}", checker.generate_summary(&report));

            if report.is_clean() && normalization.rejected.is_empty() {
                println!("✅ All data passed validation checks");
            } else {
                println!(
                    "⚠️  Found {} validation issues",
                    report.violations.len()
                        + report.unknown_categories.len()
                        + normalization.rejected.len()
                );
            }
        }

        Commands::Export {
            input,
            output,
            format,
            compression,
        } => {
            let normalization = normalize_file(&input, &config).await?;
            let observations = normalization.set.observations();
            if observations.is_empty() {
                println!("No records to write");
                return Ok(());
            }

            let path = resolve_output(output, format.extension())?;
            println!(
                "Writing {} records to {}...",
                observations.len(),
                path.display()
            );

            match format {
                ExportFormat::Csv => CsvWriter::new().write_observations(observations, &path)?,
                ExportFormat::Json => JsonWriter::new()
                    .with_pretty(false)
                    .write_observations(observations, &path)?,
                ExportFormat::Parquet => {
                    let writer = ParquetWriter::new().with_compression(&compression)?;
                    writer.write_observations(observations, &path)?;
                    println!("\n{}", writer.get_file_info(&path)?.summary());
                }
            }

            println!("Export complete!");
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            if sample > 0 {
                println!("\nSample Records (showing {} records):", sample);
                match writer.read_observations(&file, sample) {
                    Ok(records) => {
                        for (i, obs) in records.iter().enumerate() {
                            println!(
                                "{}. {}: precip={:.1}mm, max={:.1}°C, min={:.1}°C, wind={:.1} ({})",
                                i + 1,
                                obs.date,
                                obs.precipitation,
                                obs.temp_max,
                                obs.temp_min,
                                obs.wind,
                                obs.weather
                            );
                        }
                    }
                    Err(e) => println!("Error reading sample data: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| ProcessingError::Config(format!("Logging setup failed: {}", e)))?;
    if verbose {
        info!("Verbose logging enabled");
    }
    Ok(())
}

async fn normalize_file(path: &Path, config: &DashboardConfig) -> Result<Normalization> {
    config.check()?;
    let rows = CsvReader::new().read_rows_path(path)?;
    let progress = ProgressReporter::new_spinner("Normalizing records...", false);

    let normalizer = Normalizer::new()
        .with_max_workers(config.max_workers)
        .with_policy(config.malformed_policy);
    let normalization =
        tokio::task::spawn_blocking(move || normalizer.normalize_rows(&rows)).await??;

    progress.finish_with_message(&format!("Normalized {} records", normalization.set.len()));
    Ok(normalization)
}

/// No path means the dated default; parent directories are created
fn resolve_output(path: Option<PathBuf>, extension: &str) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| generate_default_output_filename(extension));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(path)
}
