use std::path::Path;
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::satellite::grid::{cell_index, unpack_values};
use crate::satellite::{AxisNames, GridOpener, GridSource, Packing};

/// Opens satellite grids with the system netCDF library.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetCdfOpener;

impl NetCdfOpener {
    pub fn new() -> Self {
        Self
    }
}

impl GridOpener for NetCdfOpener {
    fn open(&self, path: &Path, axes: AxisNames) -> Result<Box<dyn GridSource>> {
        Ok(Box::new(NetCdfGrid::open(path, axes)?))
    }
}

/// A netCDF grid file held open for cell reads.
///
/// Only the coordinate axes are read eagerly; field values are fetched one
/// cell at a time.
pub struct NetCdfGrid {
    file: netcdf::File,
    longitudes: Vec<f64>,
    latitudes: Vec<f64>,
}

impl NetCdfGrid {
    pub fn open(path: &Path, axes: AxisNames) -> Result<Self> {
        let file = netcdf::open(path)
            .map_err(|e| ProcessingError::malformed_grid(path, format!("open failed: {}", e)))?;

        let longitudes = read_axis(&file, axes.longitude)
            .map_err(|e| ProcessingError::malformed_grid(path, e.to_string()))?;
        let latitudes = read_axis(&file, axes.latitude)
            .map_err(|e| ProcessingError::malformed_grid(path, e.to_string()))?;

        debug!(
            path = %path.display(),
            nlon = longitudes.len(),
            nlat = latitudes.len(),
            "Opened netCDF grid"
        );

        Ok(Self {
            file,
            longitudes,
            latitudes,
        })
    }
}

impl GridSource for NetCdfGrid {
    fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    fn value_at(&self, variable: &str, lat_index: usize, lon_index: usize) -> Result<Option<f64>> {
        let var = self
            .file
            .variable(variable)
            .ok_or_else(|| ProcessingError::MissingData(format!("variable '{}'", variable)))?;

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let index = cell_index(
            &shape,
            self.latitudes.len(),
            self.longitudes.len(),
            lat_index,
            lon_index,
        )?;

        let raw: f64 = var.get_value(index.as_slice())?;
        Ok(packing_of(&var).unpack(raw))
    }
}

fn read_axis(file: &netcdf::File, name: &str) -> Result<Vec<f64>> {
    let var = file
        .variable(name)
        .ok_or_else(|| ProcessingError::MissingData(format!("coordinate '{}'", name)))?;

    if var.dimensions().len() != 1 {
        return Err(ProcessingError::InvalidFormat(format!(
            "coordinate '{}' is not one-dimensional",
            name
        )));
    }

    let raw: Vec<f64> = var.get_values(..)?;
    Ok(unpack_values(&raw, &packing_of(&var))
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn packing_of(var: &netcdf::Variable) -> Packing {
    Packing {
        fill_value: get_f64_attr(var, "_FillValue"),
        missing_value: get_f64_attr(var, "missing_value"),
        scale_factor: get_f64_attr(var, "scale_factor").unwrap_or(1.0),
        add_offset: get_f64_attr(var, "add_offset").unwrap_or(0.0),
    }
}

/// Checks attribute presence first so absent optional attributes stay quiet.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::satellite::{extract_nearest, SatelliteProduct};
    use tempfile::TempDir;

    fn write_sst_file(path: &Path) {
        let mut file = netcdf::create(path).unwrap();
        file.add_dimension("time", 1).unwrap();
        file.add_dimension("lat", 2).unwrap();
        file.add_dimension("lon", 3).unwrap();

        let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
        lat.put_values(&[40.125, 40.375], ..).unwrap();
        let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
        lon.put_values(&[-70.375, -70.125, -69.875], ..).unwrap();

        let mut sst = file
            .add_variable::<i16>("analysed_sst", &["time", "lat", "lon"])
            .unwrap();
        sst.put_attribute("_FillValue", -32768i16).unwrap();
        sst.put_attribute("scale_factor", 0.01f64).unwrap();
        sst.put_attribute("add_offset", 273.15f64).unwrap();
        sst.put_values(&[100i16, 200, 300, 400, -32768, 600], ..)
            .unwrap();
    }

    #[test]
    fn test_reads_packed_cell() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sst.nc");
        write_sst_file(&path);

        let grid = NetCdfOpener::new()
            .open(&path, SatelliteProduct::Sst.axes())
            .unwrap();

        assert_eq!(grid.latitudes(), &[40.125, 40.375]);
        let raw = extract_nearest(grid.as_ref(), "analysed_sst", -70.1, 40.1)
            .unwrap()
            .unwrap();
        assert!((raw - 275.15).abs() < 1e-9);

        let values = SatelliteProduct::Sst.sample(grid.as_ref(), -70.1, 40.1).unwrap();
        assert!((values[0].1.unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_value_is_masked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sst.nc");
        write_sst_file(&path);

        let grid = NetCdfGrid::open(&path, SatelliteProduct::Sst.axes()).unwrap();
        assert_eq!(grid.value_at("analysed_sst", 1, 1).unwrap(), None);
    }

    #[test]
    fn test_missing_axis_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sst.nc");
        write_sst_file(&path);

        let result = NetCdfGrid::open(&path, SatelliteProduct::Ssh.axes());
        assert!(matches!(result, Err(ProcessingError::MalformedGrid { .. })));
    }

    #[test]
    fn test_unreadable_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.nc");
        std::fs::write(&path, b"not a netcdf file").unwrap();

        let result = NetCdfGrid::open(&path, SatelliteProduct::Chl.axes());
        assert!(matches!(result, Err(ProcessingError::MalformedGrid { .. })));
    }
}
