use crate::error::Result;
use crate::models::Observation;
use csv::Writer;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Raw data table as CSV, derived calendar columns included
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_observations(&self, observations: &[Observation], path: &Path) -> Result<()> {
        let writer = Writer::from_path(path)?;
        self.write_all(observations, writer)?;
        info!(
            "Wrote {} observations to {}",
            observations.len(),
            path.display()
        );
        Ok(())
    }

    pub fn write_to<W: Write>(&self, observations: &[Observation], out: W) -> Result<()> {
        self.write_all(observations, Writer::from_writer(out))
    }

    fn write_all<W: Write>(&self, observations: &[Observation], mut writer: Writer<W>) -> Result<()> {
        for obs in observations {
            writer.serialize(obs)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}
