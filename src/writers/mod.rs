pub mod csv_writer;
pub mod json_writer;
pub mod parquet_writer;
pub mod report_writer;

pub use csv_writer::CsvWriter;
pub use json_writer::JsonWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
pub use report_writer::ReportWriter;
