use crate::error::Result;
use crate::models::PreparedDataset;
use crate::writers::output_columns;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes prepared datasets as CSV with a leading unnamed row-index column.
pub struct CsvWriter {
    include_satellite: bool,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            include_satellite: true,
        }
    }

    pub fn with_satellite_columns(mut self, include: bool) -> Self {
        self.include_satellite = include;
        self
    }

    pub fn write_dataset(&self, dataset: &PreparedDataset, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(dataset, file)?;

        info!(
            target_variable = %dataset.target,
            rows = dataset.len(),
            path = %path.display(),
            "Wrote CSV dataset"
        );
        Ok(())
    }

    pub fn write_to<W: Write>(&self, dataset: &PreparedDataset, sink: W) -> Result<()> {
        let columns = output_columns(dataset.target, self.include_satellite);
        let mut writer = csv::Writer::from_writer(sink);

        let mut header = Vec::with_capacity(columns.len() + 1);
        header.push("");
        header.extend(columns.iter().map(|c| c.header()));
        writer.write_record(&header)?;

        for (index, record) in dataset.records.iter().enumerate() {
            let mut row = Vec::with_capacity(columns.len() + 1);
            row.push(index.to_string());
            row.extend(columns.iter().map(|c| c.cell(record).to_field()));
            writer.write_record(&row)?;
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
