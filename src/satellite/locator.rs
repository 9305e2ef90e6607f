use chrono::NaiveDate;
use std::path::PathBuf;

use crate::error::Result;
use crate::satellite::{PathTemplate, SatelliteProduct};

/// Finds the daily file of one product under its archive directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLocator {
    product: SatelliteProduct,
    dir: PathBuf,
    template: PathTemplate,
}

impl ProductLocator {
    pub fn new(product: SatelliteProduct, dir: impl Into<PathBuf>, template: PathTemplate) -> Self {
        Self {
            product,
            dir: dir.into(),
            template,
        }
    }

    pub fn product(&self) -> SatelliteProduct {
        self.product
    }

    /// Path the template expands to for `date`, before any glob matching.
    pub fn expected_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(self.template.expand(date))
    }

    pub fn resolve(&self, date: NaiveDate) -> Result<Option<PathBuf>> {
        self.template.resolve(&self.dir, date)
    }
}
