use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Co2AnnualMean, Observation, PreparedDataset, TargetVariable};
use crate::processors::{
    AtmosphericJoin, DatasetReport, PipelineReport, QualityFilter, SatelliteEnricher,
};
use crate::readers::{BottleReader, Co2Reader};
use crate::satellite::{default_opener, GridOpener};
use crate::utils::filename::prepared_dataset_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, OutputFormat, ParquetWriter};
use std::path::PathBuf;
use tracing::info;

/// Load, filter, join, enrich and write each target dataset.
pub struct Pipeline {
    config: PipelineConfig,
    targets: Vec<TargetVariable>,
    opener: Option<Box<dyn GridOpener>>,
    quiet: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            targets: TargetVariable::ALL.to_vec(),
            opener: None,
            quiet: false,
        }
    }

    pub fn with_targets(mut self, targets: Vec<TargetVariable>) -> Self {
        self.targets = targets;
        self
    }

    /// Grid reader to use instead of the built-in netCDF one.
    pub fn with_opener(mut self, opener: Box<dyn GridOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn load_observations(&self) -> Result<Vec<Observation>> {
        BottleReader::new().read_observations(&self.config.input.bottle_file)
    }

    pub fn load_co2(&self) -> Result<Vec<Co2AnnualMean>> {
        let reader = match self.config.input.co2_skip_rows {
            Some(rows) => Co2Reader::with_skip_rows(rows),
            None => Co2Reader::new(),
        };
        reader.read_annual_means(&self.config.input.co2_file)
    }

    /// Filter and join one target dataset, enriching it when an enricher is
    /// given.
    pub fn prepare_dataset(
        &self,
        target: TargetVariable,
        observations: &[Observation],
        join: &AtmosphericJoin,
        enricher: Option<&mut SatelliteEnricher>,
    ) -> Result<(PreparedDataset, DatasetReport)> {
        let filtered = QualityFilter::new(target).apply(observations);
        let rows_after_filter = filtered.kept.len();
        let joined = join.join(filtered.kept);

        let mut report = DatasetReport {
            target,
            rows_loaded: observations.len(),
            rows_after_filter,
            rows_dropped_by_filter: filtered.dropped,
            rows_after_join: joined.records.len(),
            rows_unmatched_by_join: joined.unmatched,
            satellite: None,
            output: None,
        };

        let mut dataset = PreparedDataset::new(target, joined.records);

        if let Some(enricher) = enricher {
            info!(
                target_variable = %target,
                rows = dataset.len(),
                "Extracting satellite data"
            );
            let progress = ProgressReporter::new(
                dataset.len() as u64,
                &format!("Extracting satellite data for {} dataset", target),
                self.quiet,
            );
            let (enriched, stats) = enricher.enrich(dataset, &progress)?;
            progress.finish_with_message(&format!("{} dataset: {} records", target, enriched.len()));

            dataset = enriched;
            report.satellite = Some(stats);
        }

        Ok((dataset, report))
    }

    pub fn write_dataset(&self, dataset: &PreparedDataset) -> Result<PathBuf> {
        let output = &self.config.output;
        std::fs::create_dir_all(&output.dir)?;

        let path = prepared_dataset_filename(&output.dir, dataset.target, output.format.extension());
        let include_satellite = self.config.satellite.enabled;

        match output.format {
            OutputFormat::Csv => CsvWriter::new()
                .with_satellite_columns(include_satellite)
                .write_dataset(dataset, &path)?,
            OutputFormat::Parquet => ParquetWriter::new()
                .with_compression(&output.compression)?
                .with_satellite_columns(include_satellite)
                .write_dataset(dataset, &path)?,
        }

        Ok(path)
    }

    pub fn run(mut self) -> Result<PipelineReport> {
        let mut report =
            PipelineReport::new(&self.config.input.bottle_file, &self.config.input.co2_file);

        // Fail before any work when grids are wanted but cannot be read
        let mut enricher = if self.config.satellite.enabled {
            let opener = match self.opener.take() {
                Some(opener) => opener,
                None => default_opener()?,
            };
            Some(SatelliteEnricher::from_config(&self.config.satellite, opener))
        } else {
            info!("Satellite enrichment disabled");
            None
        };

        let observations = self.load_observations()?;
        let co2 = self.load_co2()?;
        report.rows_loaded = observations.len();
        report.co2_years = co2.len();

        let join = AtmosphericJoin::new(&co2);

        for target in self.targets.clone() {
            let (dataset, mut dataset_report) =
                self.prepare_dataset(target, &observations, &join, enricher.as_mut())?;

            let path = self.write_dataset(&dataset)?;
            dataset_report.output = Some(path);
            report.datasets.push(dataset_report);
        }

        Ok(report)
    }
}
