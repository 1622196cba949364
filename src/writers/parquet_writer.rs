use crate::error::{ProcessingError, Result};
use crate::models::Observation;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Days from 0001-01-01 to 1970-01-01; Arrow dates count from the Unix epoch
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Writes the normalized table to Parquet and reads it back
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size.max(1);
        self
    }

    /// Write observations, one row group per `row_group_size` records.
    /// An empty slice still produces a readable file with the schema.
    pub fn write_observations(&self, observations: &[Observation], path: &Path) -> Result<()> {
        let schema = Self::schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in observations.chunks(self.row_group_size) {
            let batch = Self::to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }
        writer.close()?;

        info!(
            "Wrote {} observations to {}",
            observations.len(),
            path.display()
        );
        Ok(())
    }

    fn schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("date", DataType::Date32, false),
            Field::new("year", DataType::Int32, false),
            Field::new("month", DataType::Utf8, false),
            Field::new("month_day", DataType::Utf8, false),
            Field::new("precipitation", DataType::Float64, false),
            Field::new("temp_max", DataType::Float64, false),
            Field::new("temp_min", DataType::Float64, false),
            Field::new("wind", DataType::Float64, false),
            Field::new("weather", DataType::Utf8, false),
        ]))
    }

    fn to_batch(observations: &[Observation], schema: Arc<Schema>) -> Result<RecordBatch> {
        let dates: Vec<i32> = observations
            .iter()
            .map(|o| o.date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();
        let years: Vec<i32> = observations.iter().map(|o| o.year).collect();
        let months: Vec<&str> = observations.iter().map(|o| o.month.abbreviation()).collect();
        let month_days: Vec<&str> = observations.iter().map(|o| o.month_day.as_str()).collect();
        let precipitation: Vec<f64> = observations.iter().map(|o| o.precipitation).collect();
        let temp_max: Vec<f64> = observations.iter().map(|o| o.temp_max).collect();
        let temp_min: Vec<f64> = observations.iter().map(|o| o.temp_min).collect();
        let wind: Vec<f64> = observations.iter().map(|o| o.wind).collect();
        let weather: Vec<&str> = observations.iter().map(|o| o.weather.as_str()).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(Date32Array::from(dates)),
            Arc::new(Int32Array::from(years)),
            Arc::new(StringArray::from(months)),
            Arc::new(StringArray::from(month_days)),
            Arc::new(Float64Array::from(precipitation)),
            Arc::new(Float64Array::from(temp_max)),
            Arc::new(Float64Array::from(temp_min)),
            Arc::new(Float64Array::from(wind)),
            Arc::new(StringArray::from(weather)),
        ];

        Ok(RecordBatch::try_new(schema, columns)?)
    }

    /// Read up to `limit` observations back (0 reads everything)
    pub fn read_observations(&self, path: &Path, limit: usize) -> Result<Vec<Observation>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut observations = Vec::new();
        for batch in reader {
            let batch = batch?;

            let dates = column::<Date32Array>(&batch, "date")?;
            let precipitation = column::<Float64Array>(&batch, "precipitation")?;
            let temp_max = column::<Float64Array>(&batch, "temp_max")?;
            let temp_min = column::<Float64Array>(&batch, "temp_min")?;
            let wind = column::<Float64Array>(&batch, "wind")?;
            let weather = column::<StringArray>(&batch, "weather")?;

            for i in 0..batch.num_rows() {
                if limit > 0 && observations.len() >= limit {
                    return Ok(observations);
                }

                let date = NaiveDate::from_num_days_from_ce_opt(
                    dates.value(i) + UNIX_EPOCH_DAYS_FROM_CE,
                )
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat(format!("Invalid date32 value {}", dates.value(i)))
                })?;

                observations.push(Observation::new(
                    date,
                    precipitation.value(i),
                    temp_max.value(i),
                    temp_min.value(i),
                    wind.value(i),
                    weather.value(i),
                )?);
            }
        }

        Ok(observations)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups,
            row_group_sizes,
            file_size,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn column<'b, A: Array + 'static>(batch: &'b RecordBatch, name: &str) -> Result<&'b A> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<A>())
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Missing or mistyped column '{}'", name)))
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups == 0 {
            0.0
        } else {
            self.total_rows as f64 / self.row_groups as f64
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            avg_rows
        )
    }
}
