use crate::config::SatelliteConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{EnrichedRecord, PreparedDataset};
use crate::satellite::{GridCache, GridOpener, MalformedPolicy, ProductLocator, SatelliteProduct};
use crate::utils::progress::ProgressReporter;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Per-product tallies for one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductStats {
    pub files_found: usize,
    pub files_missing: usize,
    pub files_malformed: usize,
    pub values_extracted: usize,
    pub values_masked: usize,
    pub rows_without_position: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentStats {
    pub rows: usize,
    pub products: BTreeMap<SatelliteProduct, ProductStats>,
    pub grid_opens: usize,
    pub grid_reuses: usize,
}

impl EnrichmentStats {
    pub fn product(&self, product: SatelliteProduct) -> ProductStats {
        self.products.get(&product).copied().unwrap_or_default()
    }
}

/// Co-locates each record with the nearest cell of every configured
/// satellite product.
pub struct SatelliteEnricher {
    locators: Vec<ProductLocator>,
    opener: Box<dyn GridOpener>,
    policy: MalformedPolicy,
    cache: GridCache,
}

impl SatelliteEnricher {
    pub fn new(locators: Vec<ProductLocator>, opener: Box<dyn GridOpener>) -> Self {
        Self {
            locators,
            opener,
            policy: MalformedPolicy::default(),
            cache: GridCache::new(true),
        }
    }

    pub fn from_config(config: &SatelliteConfig, opener: Box<dyn GridOpener>) -> Self {
        let locators = config
            .sources()
            .into_iter()
            .map(|(product, source)| {
                ProductLocator::new(product, source.dir.clone(), source.path_template())
            })
            .collect();

        Self::new(locators, opener)
            .with_policy(config.on_malformed)
            .with_grid_cache(config.grid_cache)
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_grid_cache(mut self, enabled: bool) -> Self {
        self.cache = GridCache::new(enabled);
        self
    }

    /// Fill the satellite columns of every record.
    ///
    /// A missing file leaves that product's columns empty for the row. A file
    /// that cannot be read stops the pass under `MalformedPolicy::Abort`.
    pub fn enrich(
        &mut self,
        mut dataset: PreparedDataset,
        progress: &ProgressReporter,
    ) -> Result<(PreparedDataset, EnrichmentStats)> {
        let mut stats = EnrichmentStats {
            rows: dataset.len(),
            products: self
                .locators
                .iter()
                .map(|l| (l.product(), ProductStats::default()))
                .collect(),
            ..Default::default()
        };
        let opens_before = self.cache.opens();
        let reuses_before = self.cache.reuses();
        let last_index = dataset.len().saturating_sub(1);

        for (i, record) in dataset.records.iter_mut().enumerate() {
            debug!("record {:4}/{}", i, last_index);
            progress.increment(1);

            let Some(date) = record.observation.date else {
                debug!(row = i, "Record has no date, skipping satellite lookup");
                continue;
            };

            for locator in &self.locators {
                let product = locator.product();
                let product_stats = stats.products.entry(product).or_default();

                let Some(path) = locator.resolve(date)? else {
                    product_stats.files_missing += 1;
                    warn!("{} i={} ({})", product.label(), i, format_date(date));
                    continue;
                };
                product_stats.files_found += 1;

                let outcome = sample_record(
                    &mut self.cache,
                    self.opener.as_ref(),
                    product,
                    &path,
                    record,
                    product_stats,
                );
                self.cache.release(product);

                if let Err(e) = outcome {
                    self.cache.evict(product);
                    let error = as_malformed(&path, e);
                    match self.policy {
                        MalformedPolicy::Abort => return Err(error),
                        MalformedPolicy::Skip => {
                            product_stats.files_malformed += 1;
                            warn!(
                                "{} i={} ({}): {}",
                                product.label(),
                                i,
                                format_date(date),
                                error
                            );
                        }
                    }
                }
            }
        }

        self.cache.clear();
        stats.grid_opens = self.cache.opens() - opens_before;
        stats.grid_reuses = self.cache.reuses() - reuses_before;

        Ok((dataset, stats))
    }
}

fn sample_record(
    cache: &mut GridCache,
    opener: &dyn GridOpener,
    product: SatelliteProduct,
    path: &Path,
    record: &mut EnrichedRecord,
    stats: &mut ProductStats,
) -> Result<()> {
    let grid = cache.get_or_open(product, path, opener)?;

    let Some((longitude, latitude)) = record.observation.position() else {
        stats.rows_without_position += 1;
        return Ok(());
    };

    for (column, value) in product.sample(grid, longitude, latitude)? {
        record.satellite.set(column, value);
        if value.is_some() {
            stats.values_extracted += 1;
        } else {
            stats.values_masked += 1;
        }
    }
    Ok(())
}

fn as_malformed(path: &Path, error: ProcessingError) -> ProcessingError {
    match error {
        ProcessingError::MalformedGrid { .. } => error,
        other => ProcessingError::malformed_grid(path, other.to_string()),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
