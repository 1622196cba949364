use crate::processors::MalformedPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-dashboard")]
#[command(about = "Daily weather dataset normalizer and dashboard aggregator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Configuration file (TOML or JSON)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build every dashboard view from a CSV dataset
    Dashboard {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Year for the summary cards")]
        year: Option<i32>,

        #[arg(
            long,
            value_delimiter = ',',
            help = "Years compared side by side (comma-separated)"
        )]
        compare_years: Vec<i32>,

        #[arg(
            long,
            help = "Also write the dashboard as JSON [default: weather-dashboard-{YYMMDD}.json]",
            num_args = 0..=1
        )]
        json: Option<Option<PathBuf>>,

        #[arg(long, requires = "json", help = "Include the raw data table in the JSON")]
        raw: bool,

        #[arg(long, help = "Raw data rows shown in the report")]
        preview_rows: Option<usize>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, value_enum)]
        malformed: Option<MalformedPolicy>,
    },

    /// Show the summary cards for one or more years
    Summary {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(short, long, help = "Year to summarize (repeatable)")]
        year: Vec<i32>,
    },

    /// Normalize and check a dataset without building views
    Validate {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(long)]
        max_workers: Option<usize>,
    },

    /// Export the normalized raw table
    Export {
        #[arg(short, long, help = "Input CSV file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output file path [default: weather-dashboard-{YYMMDD}.{format}]"
        )]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "parquet")]
        format: ExportFormat,

        #[arg(short, long, default_value = "snappy")]
        compression: String,
    },

    /// Display information about an exported Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Parquet => "parquet",
        }
    }
}
