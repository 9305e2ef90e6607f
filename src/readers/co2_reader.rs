use crate::error::{ProcessingError, Result};
use crate::models::Co2AnnualMean;
use crate::readers::bottle_reader::decode_text;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};
use validator::Validate;

/// Reads NOAA annual-mean atmospheric CO2 tables (`year,mean,unc`).
pub struct Co2Reader {
    skip_rows: usize,
}

impl Co2Reader {
    pub fn new() -> Self {
        Self { skip_rows: 0 }
    }

    /// Discard a fixed number of leading lines before parsing.
    pub fn with_skip_rows(skip_rows: usize) -> Self {
        Self { skip_rows }
    }

    pub fn read_annual_means(&self, path: &Path) -> Result<Vec<Co2AnnualMean>> {
        let text = decode_text(std::fs::read(path)?);
        let means = self.read_from_str(&text)?;

        info!(
            path = %path.display(),
            years = means.len(),
            "Loaded atmospheric CO2 annual means"
        );
        Ok(means)
    }

    /// Parse the table; the result is sorted by year and a repeated year
    /// keeps its last row.
    pub fn read_from_str(&self, text: &str) -> Result<Vec<Co2AnnualMean>> {
        let body: String = text
            .lines()
            .skip(self.skip_rows)
            .collect::<Vec<_>>()
            .join("\n");

        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    ProcessingError::InvalidFormat(format!("CO2 file is missing column '{}'", name))
                })
        };
        let year_col = column("year")?;
        let mean_col = column("mean")?;

        let mut by_year = BTreeMap::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let year_text = record.get(year_col).unwrap_or("");
            let mean_text = record.get(mean_col).unwrap_or("");

            let year = year_text.parse::<i32>().map_err(|_| {
                ProcessingError::InvalidFormat(format!("CO2 row {}: invalid year '{}'", row + 1, year_text))
            })?;
            let mean = mean_text.parse::<f64>().map_err(|_| {
                ProcessingError::InvalidFormat(format!("CO2 row {}: invalid mean '{}'", row + 1, mean_text))
            })?;

            let entry = Co2AnnualMean::new(year, mean);
            entry.validate()?;

            if by_year.insert(year, entry).is_some() {
                debug!(year, "Repeated CO2 year, keeping the later row");
            }
        }

        Ok(by_year.into_values().collect())
    }
}

impl Default for Co2Reader {
    fn default() -> Self {
        Self::new()
    }
}
