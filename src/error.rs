use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("Malformed satellite grid {}: {reason}", path.display())]
    MalformedGrid { path: PathBuf, reason: String },

    #[error("Invalid quality flag: {0}")]
    InvalidQualityFlag(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),
}

impl ProcessingError {
    pub fn malformed_grid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ProcessingError::MalformedGrid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
