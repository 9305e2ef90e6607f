//! Layered run configuration: built-in defaults, an optional TOML file, then
//! `BOTTLE_PREP_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

use crate::error::Result;
use crate::satellite::{MalformedPolicy, PathTemplate, SatelliteProduct};
use crate::utils::constants::*;
use crate::writers::OutputFormat;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(nested)]
    pub input: InputConfig,

    #[validate(nested)]
    pub output: OutputConfig,

    #[validate(nested)]
    pub satellite: SatelliteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InputConfig {
    pub bottle_file: PathBuf,
    pub co2_file: PathBuf,
    /// Fixed number of leading lines to discard before the CO2 header
    pub co2_skip_rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub format: OutputFormat,
    #[validate(length(min = 1))]
    pub compression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SatelliteConfig {
    pub enabled: bool,
    pub grid_cache: bool,
    pub on_malformed: MalformedPolicy,

    #[validate(nested)]
    pub ssh: ProductSource,
    #[validate(nested)]
    pub sst: ProductSource,
    #[validate(nested)]
    pub sst_hires: ProductSource,
    #[validate(nested)]
    pub chl: ProductSource,
    #[validate(nested)]
    pub kd490: ProductSource,
}

/// Where one product's daily files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductSource {
    pub dir: PathBuf,
    #[validate(length(min = 1))]
    pub template: String,
}

impl ProductSource {
    pub fn new(dir: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            template: template.into(),
        }
    }

    pub fn path_template(&self) -> PathTemplate {
        PathTemplate::new(self.template.clone())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            output: OutputConfig::default(),
            satellite: SatelliteConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            bottle_file: PathBuf::from(DEFAULT_BOTTLE_FILE),
            co2_file: PathBuf::from(DEFAULT_CO2_FILE),
            co2_skip_rows: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::Csv,
            compression: COMPRESSION_SNAPPY.to_string(),
        }
    }
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            grid_cache: true,
            on_malformed: MalformedPolicy::Abort,
            ssh: ProductSource::new(DEFAULT_SSH_DIR, SSH_TEMPLATE),
            sst: ProductSource::new(DEFAULT_SST_DIR, SST_TEMPLATE),
            sst_hires: ProductSource::new(DEFAULT_SST_HIRES_DIR, SST_HIRES_TEMPLATE),
            chl: ProductSource::new(DEFAULT_CHL_DIR, CHL_TEMPLATE),
            kd490: ProductSource::new(DEFAULT_KD490_DIR, KD490_TEMPLATE),
        }
    }
}

impl SatelliteConfig {
    pub fn source_for(&self, product: SatelliteProduct) -> &ProductSource {
        match product {
            SatelliteProduct::Ssh => &self.ssh,
            SatelliteProduct::Sst => &self.sst,
            SatelliteProduct::SstHires => &self.sst_hires,
            SatelliteProduct::Chl => &self.chl,
            SatelliteProduct::Kd490 => &self.kd490,
        }
    }

    /// Sources for every product, in processing order.
    pub fn sources(&self) -> Vec<(SatelliteProduct, ProductSource)> {
        SatelliteProduct::ALL
            .iter()
            .map(|p| (*p, self.source_for(*p).clone()))
            .collect()
    }
}

impl PipelineConfig {
    /// Load configuration.
    ///
    /// With `path` the file must exist; without it `bottle-prep.toml` in the
    /// working directory is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&PipelineConfig::default())?);

        builder = match path {
            Some(path) => builder.add_source(config::File::from(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: PipelineConfig = settings.try_deserialize()?;
        loaded.validate()?;

        debug!(?loaded, "Loaded configuration");
        Ok(loaded)
    }
}
