use crate::error::{ProcessingError, Result};
use crate::models::{RawObservation, RawRow};
use crate::utils::constants::CSV_COLUMNS;
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads the daily weather table (`date,precipitation,temp_max,temp_min,wind,weather`).
///
/// Cells are kept as text; parsing and validation belong to the normalizer so
/// that a bad row can be skipped or reported under the caller's policy instead
/// of failing the whole load.
pub struct CsvReader {
    delimiter: u8,
}

impl CsvReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read every data row of a CSV file, undecodable rows included
    pub fn read_rows_path(&self, path: &Path) -> Result<Vec<RawRow>> {
        info!("Reading weather records from {}", path.display());
        let file = File::open(path)?;
        self.read_rows(file)
    }

    /// Read every data row; a row whose cells are not valid UTF-8 is kept as
    /// an `Err` with the reason, so its position still counts.
    pub fn read_rows<R: Read>(&self, input: R) -> Result<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut rows = Vec::new();
        for record in reader.byte_records() {
            let record = record?;

            // Skip blank lines
            if record.iter().all(|cell| cell.is_empty()) {
                continue;
            }

            let row = columns.extract(&record);
            if let Err(reason) = &row {
                warn!("Row {} could not be decoded: {}", rows.len() + 1, reason);
            }
            rows.push(row);
        }

        debug!("Read {} raw rows", rows.len());
        Ok(rows)
    }

    /// Read all rows from a CSV file, failing on the first undecodable row
    pub fn read_path(&self, path: &Path) -> Result<Vec<RawObservation>> {
        into_observations(self.read_rows_path(path)?)
    }

    /// Read all rows from any reader, failing on the first undecodable row
    pub fn read_from<R: Read>(&self, input: R) -> Result<Vec<RawObservation>> {
        into_observations(self.read_rows(input)?)
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

fn into_observations(rows: Vec<RawRow>) -> Result<Vec<RawObservation>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| row.map_err(|reason| ProcessingError::malformed(i + 1, reason)))
        .collect()
}

/// Positions of the required columns within the header
struct ColumnIndex {
    positions: [usize; 6],
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut positions = [0usize; 6];

        for (slot, column) in positions.iter_mut().zip(CSV_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column))
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat(format!("Missing required column '{}'", column))
                })?;
        }

        Ok(Self { positions })
    }

    /// Decode the required cells; missing cells become empty text
    fn extract(&self, record: &ByteRecord) -> RawRow {
        let mut cells: [String; 6] = Default::default();

        for ((cell, &pos), column) in cells.iter_mut().zip(&self.positions).zip(CSV_COLUMNS) {
            let bytes = record.get(pos).unwrap_or_default();
            *cell = std::str::from_utf8(bytes)
                .map_err(|e| format!("{} is not valid UTF-8: {}", column, e))?
                .to_string();
        }

        let [date, precipitation, temp_max, temp_min, wind, weather] = cells;
        Ok(RawObservation {
            date,
            precipitation,
            temp_max,
            temp_min,
            wind,
            weather,
        })
    }
}
