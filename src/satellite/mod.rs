//! Satellite products and the co-location of bottle samples with their grids.

pub mod cache;
pub mod grid;
pub mod locator;
#[cfg(feature = "netcdf")]
pub mod netcdf_grid;
pub mod template;

pub use cache::GridCache;
pub use grid::{
    cell_index, extract_nearest, nearest_index, sample_nearest, unpack_values, GridOpener,
    GridSnapshot, GridSource, NearestSample, Packing,
};
#[cfg(feature = "netcdf")]
pub use netcdf_grid::{NetCdfGrid, NetCdfOpener};
pub use locator::ProductLocator;
pub use template::PathTemplate;

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::SatelliteColumn;
use crate::utils::constants::KELVIN_OFFSET;
use crate::utils::coordinates::{longitude_to_180, longitude_to_360};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatelliteProduct {
    /// AVISO absolute dynamic topography and sea level anomaly
    Ssh,
    /// NOAA OI SST, 0.25 degree
    Sst,
    /// MUR SST, 0.01 degree
    SstHires,
    /// Ocean colour chlorophyll, ~4.64 km
    Chl,
    /// Ocean colour diffuse attenuation at 490 nm, ~4.64 km
    Kd490,
}

/// Names of the 1-D coordinate variables in a grid file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisNames {
    pub longitude: &'static str,
    pub latitude: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LongitudeConvention {
    /// 0..360 degrees east
    ZeroTo360,
    /// -180..180 degrees
    Signed180,
}

impl LongitudeConvention {
    pub fn normalize(&self, longitude: f64) -> f64 {
        match self {
            LongitudeConvention::ZeroTo360 => longitude_to_360(longitude),
            LongitudeConvention::Signed180 => longitude_to_180(longitude),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    Identity,
    KelvinToCelsius,
}

impl ValueTransform {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            ValueTransform::Identity => value,
            ValueTransform::KelvinToCelsius => value - KELVIN_OFFSET,
        }
    }
}

/// What to do when a resolved grid file cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Stop the run with the read error
    #[default]
    Abort,
    /// Log the error and leave the product's columns empty
    Skip,
}

impl SatelliteProduct {
    pub const ALL: [SatelliteProduct; 5] = [
        SatelliteProduct::Ssh,
        SatelliteProduct::Sst,
        SatelliteProduct::SstHires,
        SatelliteProduct::Chl,
        SatelliteProduct::Kd490,
    ];

    /// Short label used in diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            SatelliteProduct::Ssh => "SSH",
            SatelliteProduct::Sst => "SST1",
            SatelliteProduct::SstHires => "SST2",
            SatelliteProduct::Chl => "Chl",
            SatelliteProduct::Kd490 => "KD490",
        }
    }

    /// Stored variables and the output column each one fills.
    pub fn variables(&self) -> &'static [(&'static str, SatelliteColumn)] {
        match self {
            SatelliteProduct::Ssh => &[("adt", SatelliteColumn::Adt), ("sla", SatelliteColumn::Sla)],
            SatelliteProduct::Sst => &[("analysed_sst", SatelliteColumn::Sst)],
            SatelliteProduct::SstHires => &[("analysed_sst", SatelliteColumn::SstHires)],
            SatelliteProduct::Chl => &[("CHL", SatelliteColumn::Chl)],
            SatelliteProduct::Kd490 => &[("KD490", SatelliteColumn::Kd490)],
        }
    }

    pub fn axes(&self) -> AxisNames {
        match self {
            SatelliteProduct::Ssh => AxisNames {
                longitude: "longitude",
                latitude: "latitude",
            },
            _ => AxisNames {
                longitude: "lon",
                latitude: "lat",
            },
        }
    }

    pub fn longitude_convention(&self) -> LongitudeConvention {
        match self {
            SatelliteProduct::Ssh => LongitudeConvention::ZeroTo360,
            _ => LongitudeConvention::Signed180,
        }
    }

    pub fn transform(&self) -> ValueTransform {
        match self {
            SatelliteProduct::Sst | SatelliteProduct::SstHires => ValueTransform::KelvinToCelsius,
            _ => ValueTransform::Identity,
        }
    }

    /// Sample every variable of this product at an observation position.
    ///
    /// Returns one entry per output column, `None` where the cell is masked.
    pub fn sample(
        &self,
        grid: &dyn GridSource,
        longitude: f64,
        latitude: f64,
    ) -> Result<Vec<(SatelliteColumn, Option<f64>)>> {
        let query_lon = self.longitude_convention().normalize(longitude);
        let transform = self.transform();

        self.variables()
            .iter()
            .map(|(variable, column)| {
                let value = extract_nearest(grid, variable, query_lon, latitude)?
                    .map(|v| transform.apply(v));
                Ok((*column, value))
            })
            .collect()
    }
}

impl std::fmt::Display for SatelliteProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for SatelliteProduct {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "ssh" => Ok(SatelliteProduct::Ssh),
            "sst" | "sst1" => Ok(SatelliteProduct::Sst),
            "sst_hires" | "sst2" => Ok(SatelliteProduct::SstHires),
            "chl" => Ok(SatelliteProduct::Chl),
            "kd490" => Ok(SatelliteProduct::Kd490),
            _ => Err(ProcessingError::Config(format!(
                "Unknown satellite product: {}",
                s
            ))),
        }
    }
}

/// Grid opener for the satellite files on disk.
#[cfg(feature = "netcdf")]
pub fn default_opener() -> Result<Box<dyn GridOpener>> {
    Ok(Box::new(NetCdfOpener::new()))
}

/// Grid opener for the satellite files on disk.
#[cfg(not(feature = "netcdf"))]
pub fn default_opener() -> Result<Box<dyn GridOpener>> {
    Err(ProcessingError::FeatureDisabled(
        "reading satellite grids requires the `netcdf` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Grid that records the longitude it was queried at.
    struct RecordingGrid {
        lons: Vec<f64>,
        lats: Vec<f64>,
        queried: std::cell::Cell<Option<usize>>,
    }

    impl GridSource for RecordingGrid {
        fn longitudes(&self) -> &[f64] {
            &self.lons
        }

        fn latitudes(&self) -> &[f64] {
            &self.lats
        }

        fn value_at(&self, _variable: &str, _lat: usize, lon: usize) -> Result<Option<f64>> {
            self.queried.set(Some(lon));
            Ok(Some(self.lons[lon]))
        }
    }

    #[test]
    fn test_ssh_queries_0_360_longitude() {
        let grid = RecordingGrid {
            lons: (0..360).map(|d| d as f64).collect(),
            lats: vec![0.0],
            queried: std::cell::Cell::new(None),
        };

        let values = SatelliteProduct::Ssh.sample(&grid, -30.0, 0.0).unwrap();

        assert_eq!(grid.queried.get(), Some(330));
        assert_eq!(values[0], (SatelliteColumn::Adt, Some(330.0)));
        assert_eq!(values[1], (SatelliteColumn::Sla, Some(330.0)));
    }

    #[test]
    fn test_sst_kelvin_to_celsius() {
        let grid = GridSnapshot::new(vec![-70.125, -69.875], vec![40.125])
            .with_field("analysed_sst", vec![Some(300.0), Some(301.0)])
            .unwrap();

        let values = SatelliteProduct::Sst.sample(&grid, -70.1, 40.0).unwrap();
        let (column, value) = values[0];

        assert_eq!(column, SatelliteColumn::Sst);
        assert!((value.unwrap() - 26.85).abs() < 1e-9);
    }

    #[test]
    fn test_ocean_colour_values_unchanged() {
        let grid = GridSnapshot::new(vec![-70.0], vec![40.0])
            .with_field("KD490", vec![Some(0.0712)])
            .unwrap();

        let values = SatelliteProduct::Kd490.sample(&grid, -70.0, 40.0).unwrap();
        assert_eq!(values, vec![(SatelliteColumn::Kd490, Some(0.0712))]);
    }

    #[test]
    fn test_product_parsing() {
        assert_eq!("ssh".parse::<SatelliteProduct>().unwrap(), SatelliteProduct::Ssh);
        assert_eq!("sst-hires".parse::<SatelliteProduct>().unwrap(), SatelliteProduct::SstHires);
        assert_eq!("KD490".parse::<SatelliteProduct>().unwrap(), SatelliteProduct::Kd490);
        assert!("modis".parse::<SatelliteProduct>().is_err());
    }
}
