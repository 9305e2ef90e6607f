use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::satellite::{GridOpener, GridSource, SatelliteProduct};

/// Keeps the last opened grid of each product so consecutive rows sharing a
/// date do not reopen the same file.
pub struct GridCache {
    enabled: bool,
    slots: HashMap<SatelliteProduct, (PathBuf, Box<dyn GridSource>)>,
    opens: usize,
    reuses: usize,
}

impl GridCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            slots: HashMap::new(),
            opens: 0,
            reuses: 0,
        }
    }

    /// Grid for `path`, opening it unless the product's slot already holds it.
    pub fn get_or_open(
        &mut self,
        product: SatelliteProduct,
        path: &Path,
        opener: &dyn GridOpener,
    ) -> Result<&dyn GridSource> {
        let cached = self.enabled
            && matches!(self.slots.get(&product), Some((cached_path, _)) if cached_path == path);

        if cached {
            self.reuses += 1;
        } else {
            // Close the previous handle before opening the next file
            self.slots.remove(&product);
            debug!(product = %product, path = %path.display(), "Opening satellite grid");
            let grid = opener.open(path, product.axes())?;
            self.opens += 1;
            self.slots.insert(product, (path.to_path_buf(), grid));
        }

        self.slots
            .get(&product)
            .map(|(_, grid)| &**grid)
            .ok_or_else(|| ProcessingError::MissingData(format!("cached grid for {}", product)))
    }

    /// Drop the handle held for `product` unless caching is enabled.
    pub fn release(&mut self, product: SatelliteProduct) {
        if !self.enabled {
            self.slots.remove(&product);
        }
    }

    /// Drop the handle held for `product` regardless of caching.
    pub fn evict(&mut self, product: SatelliteProduct) {
        self.slots.remove(&product);
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn opens(&self) -> usize {
        self.opens
    }

    pub fn reuses(&self) -> usize {
        self.reuses
    }
}
