use crate::error::Result;
use crate::models::TargetVariable;
use crate::processors::satellite_enricher::EnrichmentStats;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Row counts through each stage for one prepared dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetReport {
    pub target: TargetVariable,
    pub rows_loaded: usize,
    pub rows_after_filter: usize,
    pub rows_dropped_by_filter: usize,
    pub rows_after_join: usize,
    pub rows_unmatched_by_join: usize,
    pub satellite: Option<EnrichmentStats>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub started_at: DateTime<Local>,
    pub bottle_file: PathBuf,
    pub co2_file: PathBuf,
    pub rows_loaded: usize,
    pub co2_years: usize,
    pub datasets: Vec<DatasetReport>,
}

impl PipelineReport {
    pub fn new(bottle_file: &Path, co2_file: &Path) -> Self {
        Self {
            started_at: Local::now(),
            bottle_file: bottle_file.to_path_buf(),
            co2_file: co2_file.to_path_buf(),
            rows_loaded: 0,
            co2_years: 0,
            datasets: Vec::new(),
        }
    }

    pub fn dataset(&self, target: TargetVariable) -> Option<&DatasetReport> {
        self.datasets.iter().find(|d| d.target == target)
    }

    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Bottle Data Preparation Report ===\n");
        summary.push_str(&format!("Bottle file: {}\n", self.bottle_file.display()));
        summary.push_str(&format!("Rows loaded: {}\n", self.rows_loaded));
        summary.push_str(&format!("CO2 reference years: {}\n", self.co2_years));

        for dataset in &self.datasets {
            summary.push_str(&format!("\n--- {} dataset ---\n", dataset.target));
            summary.push_str(&format!(
                "Passed quality filter: {} ({:.1}%), dropped {}\n",
                dataset.rows_after_filter,
                percent(dataset.rows_after_filter, dataset.rows_loaded),
                dataset.rows_dropped_by_filter
            ));
            summary.push_str(&format!(
                "Joined with atmospheric CO2: {}, no reference year {}\n",
                dataset.rows_after_join, dataset.rows_unmatched_by_join
            ));

            match &dataset.satellite {
                Some(stats) => {
                    summary.push_str(&format!(
                        "Satellite grids: {} opened, {} reused\n",
                        stats.grid_opens, stats.grid_reuses
                    ));
                    for (product, p) in &stats.products {
                        summary.push_str(&format!(
                            "  {:<6} files found {:>6}, missing {:>6}, malformed {:>3}, values {:>6}, masked {:>6}\n",
                            product.label(),
                            p.files_found,
                            p.files_missing,
                            p.files_malformed,
                            p.values_extracted,
                            p.values_masked
                        ));
                    }
                }
                None => summary.push_str("Satellite enrichment skipped\n"),
            }

            if let Some(output) = &dataset.output {
                summary.push_str(&format!("Output: {}\n", output.display()));
            }
        }

        summary
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::satellite_enricher::ProductStats;
    use crate::satellite::SatelliteProduct;
    use tempfile::TempDir;

    fn report() -> PipelineReport {
        let mut report = PipelineReport::new(Path::new("bottle.csv"), Path::new("co2.csv"));
        report.rows_loaded = 10;
        report.co2_years = 3;

        let mut stats = EnrichmentStats {
            rows: 6,
            ..Default::default()
        };
        stats.products.insert(
            SatelliteProduct::Ssh,
            ProductStats {
                files_found: 4,
                files_missing: 2,
                values_extracted: 8,
                ..Default::default()
            },
        );

        report.datasets.push(DatasetReport {
            target: TargetVariable::Dic,
            rows_loaded: 10,
            rows_after_filter: 7,
            rows_dropped_by_filter: 3,
            rows_after_join: 6,
            rows_unmatched_by_join: 1,
            satellite: Some(stats),
            output: Some(PathBuf::from("data/bottle_data_DIC_prepared.csv")),
        });
        report
    }

    #[test]
    fn test_summary_mentions_each_stage() {
        let summary = report().generate_summary();

        assert!(summary.contains("Rows loaded: 10"));
        assert!(summary.contains("--- DIC dataset ---"));
        assert!(summary.contains("Passed quality filter: 7 (70.0%), dropped 3"));
        assert!(summary.contains("no reference year 1"));
        assert!(summary.contains("SSH"));
        assert!(summary.contains("bottle_data_DIC_prepared.csv"));
    }

    #[test]
    fn test_write_json() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("report.json");
        report().write_json(&path)?;

        let value: serde_json::Value = serde_json::from_reader(File::open(&path)?)?;
        assert_eq!(value["datasets"][0]["target"], "dic");
        assert_eq!(value["datasets"][0]["satellite"]["products"]["ssh"]["files_missing"], 2);
        Ok(())
    }
}
