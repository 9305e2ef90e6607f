use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ProcessingError, Result};
use crate::satellite::AxisNames;

/// A rectilinear satellite field for one date, indexed (latitude, longitude).
pub trait GridSource {
    fn longitudes(&self) -> &[f64];

    fn latitudes(&self) -> &[f64];

    /// Unpacked value of `variable` at one cell; `None` when masked.
    fn value_at(&self, variable: &str, lat_index: usize, lon_index: usize) -> Result<Option<f64>>;
}

/// Opens grid files resolved by the locator.
pub trait GridOpener {
    fn open(&self, path: &Path, axes: AxisNames) -> Result<Box<dyn GridSource>>;
}

/// CF packing attributes of a stored variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Packing {
    pub fill_value: Option<f64>,
    pub missing_value: Option<f64>,
    pub scale_factor: f64,
    pub add_offset: f64,
}

impl Default for Packing {
    fn default() -> Self {
        Self {
            fill_value: None,
            missing_value: None,
            scale_factor: 1.0,
            add_offset: 0.0,
        }
    }
}

impl Packing {
    pub fn unpack(&self, raw: f64) -> Option<f64> {
        if !raw.is_finite() || Some(raw) == self.fill_value || Some(raw) == self.missing_value {
            return None;
        }
        Some(raw * self.scale_factor + self.add_offset)
    }
}

/// Convert raw stored values into physical values with masked cells as `None`.
pub fn unpack_values(raw: &[f64], packing: &Packing) -> Vec<Option<f64>> {
    raw.iter().map(|v| packing.unpack(*v)).collect()
}

/// Index of the axis value closest to `target`; the first one wins ties.
pub fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    if !target.is_finite() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, value) in axis.iter().enumerate() {
        let distance = (value - target).abs();
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((i, distance)),
        }
    }

    best.map(|(i, _)| i)
}

/// Index into a stored variable for one (lat, lon) cell.
///
/// Leading dimensions must be singletons (a single time step) and are
/// squeezed; the trailing pair may be (lat, lon) or (lon, lat).
pub fn cell_index(
    shape: &[usize],
    nlat: usize,
    nlon: usize,
    lat_index: usize,
    lon_index: usize,
) -> Result<Vec<usize>> {
    if shape.len() < 2 {
        return Err(ProcessingError::InvalidFormat(format!(
            "Expected a 2-D field, found shape {:?}",
            shape
        )));
    }

    let (leading, trailing) = shape.split_at(shape.len() - 2);
    if leading.iter().any(|len| *len != 1) {
        return Err(ProcessingError::InvalidFormat(format!(
            "Expected a single time step, found shape {:?}",
            shape
        )));
    }

    let mut index = vec![0; leading.len()];
    match (trailing[0], trailing[1]) {
        (a, b) if a == nlat && b == nlon => index.extend([lat_index, lon_index]),
        (a, b) if a == nlon && b == nlat => index.extend([lon_index, lat_index]),
        _ => {
            return Err(ProcessingError::InvalidFormat(format!(
                "Field shape {:?} does not match axes ({} lat, {} lon)",
                shape, nlat, nlon
            )))
        }
    }

    Ok(index)
}

/// Grid cell chosen for a query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestSample {
    pub lon_index: usize,
    pub lat_index: usize,
    pub grid_longitude: f64,
    pub grid_latitude: f64,
    pub value: Option<f64>,
}

/// Sample `variable` at the cell whose (lon, lat) mesh coordinates are closest
/// to the query point.
///
/// Distances are Euclidean in degrees, so on a rectilinear grid the closest
/// cell is the pair of per-axis closest indices.
pub fn sample_nearest(
    grid: &dyn GridSource,
    variable: &str,
    longitude: f64,
    latitude: f64,
) -> Result<Option<NearestSample>> {
    let lons = grid.longitudes();
    let lats = grid.latitudes();
    if lons.is_empty() || lats.is_empty() {
        return Err(ProcessingError::MissingData(
            "grid has an empty coordinate axis".to_string(),
        ));
    }

    let (Some(lon_index), Some(lat_index)) =
        (nearest_index(lons, longitude), nearest_index(lats, latitude))
    else {
        return Ok(None);
    };

    let value = grid.value_at(variable, lat_index, lon_index)?;

    Ok(Some(NearestSample {
        lon_index,
        lat_index,
        grid_longitude: lons[lon_index],
        grid_latitude: lats[lat_index],
        value,
    }))
}

/// Nearest-point value, or `None` when the cell is masked.
pub fn extract_nearest(
    grid: &dyn GridSource,
    variable: &str,
    longitude: f64,
    latitude: f64,
) -> Result<Option<f64>> {
    Ok(sample_nearest(grid, variable, longitude, latitude)?.and_then(|s| s.value))
}

/// Fully materialised grid, row-major over (latitude, longitude).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub longitudes: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub fields: BTreeMap<String, Vec<Option<f64>>>,
}

impl GridSnapshot {
    pub fn new(longitudes: Vec<f64>, latitudes: Vec<f64>) -> Self {
        Self {
            longitudes,
            latitudes,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, values: Vec<Option<f64>>) -> Result<Self> {
        let expected = self.longitudes.len() * self.latitudes.len();
        if values.len() != expected {
            return Err(ProcessingError::InvalidFormat(format!(
                "Field '{}' has {} values, grid has {} cells",
                name,
                values.len(),
                expected
            )));
        }
        self.fields.insert(name.to_string(), values);
        Ok(self)
    }
}

impl GridSource for GridSnapshot {
    fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    fn value_at(&self, variable: &str, lat_index: usize, lon_index: usize) -> Result<Option<f64>> {
        let field = self
            .fields
            .get(variable)
            .ok_or_else(|| ProcessingError::MissingData(format!("variable '{}'", variable)))?;

        let nlon = self.longitudes.len();
        if lon_index >= nlon || lat_index >= self.latitudes.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Cell ({}, {}) outside grid",
                lat_index, lon_index
            )));
        }

        Ok(field[lat_index * nlon + lon_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> GridSnapshot {
        // 3 x 4 grid, value = 10 * lat_index + lon_index
        let values = (0..3)
            .flat_map(|j| (0..4).map(move |i| Some((10 * j + i) as f64)))
            .collect();
        GridSnapshot::new(vec![-72.0, -71.0, -70.0, -69.0], vec![40.0, 41.0, 42.0])
            .with_field("CHL", values)
            .unwrap()
    }

    #[test]
    fn test_nearest_index() {
        let axis = [0.125, 0.375, 0.625, 0.875];
        assert_eq!(nearest_index(&axis, 0.4), Some(1));
        assert_eq!(nearest_index(&axis, -5.0), Some(0));
        assert_eq!(nearest_index(&axis, 99.0), Some(3));
        assert_eq!(nearest_index(&[], 1.0), None);
        assert_eq!(nearest_index(&axis, f64::NAN), None);
    }

    #[test]
    fn test_nearest_index_tie_goes_to_first() {
        assert_eq!(nearest_index(&[0.0, 1.0], 0.5), Some(0));
        assert_eq!(nearest_index(&[1.0, 0.0], 0.5), Some(0));
    }

    #[test]
    fn test_extract_nearest() {
        let grid = sample_grid();
        assert_eq!(extract_nearest(&grid, "CHL", -70.9, 41.6).unwrap(), Some(21.0));
        assert_eq!(extract_nearest(&grid, "CHL", -80.0, 30.0).unwrap(), Some(0.0));
    }

    #[test]
    fn test_sample_reports_grid_cell() {
        let grid = sample_grid();
        let sample = sample_nearest(&grid, "CHL", -69.2, 40.1).unwrap().unwrap();

        assert_eq!(sample.lon_index, 3);
        assert_eq!(sample.lat_index, 0);
        assert_eq!(sample.grid_longitude, -69.0);
        assert_eq!(sample.grid_latitude, 40.0);
        assert_eq!(sample.value, Some(3.0));
    }

    #[test]
    fn test_masked_cell_is_none() {
        let grid = GridSnapshot::new(vec![0.0, 1.0], vec![0.0])
            .with_field("sla", vec![Some(0.1), None])
            .unwrap();
        assert_eq!(extract_nearest(&grid, "sla", 0.9, 0.0).unwrap(), None);
    }

    #[test]
    fn test_missing_variable_is_error() {
        let grid = sample_grid();
        assert!(extract_nearest(&grid, "KD490", -70.0, 41.0).is_err());
    }

    #[test]
    fn test_cell_index_squeezes_time() {
        assert_eq!(cell_index(&[1, 3, 4], 3, 4, 2, 1).unwrap(), vec![0, 2, 1]);
        assert_eq!(cell_index(&[3, 4], 3, 4, 2, 1).unwrap(), vec![2, 1]);
        // lon-major storage
        assert_eq!(cell_index(&[1, 4, 3], 3, 4, 2, 1).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cell_index_rejects_bad_shapes() {
        assert!(cell_index(&[2, 3, 4], 3, 4, 0, 0).is_err());
        assert!(cell_index(&[5, 5], 3, 4, 0, 0).is_err());
        assert!(cell_index(&[12], 3, 4, 0, 0).is_err());
    }

    #[test]
    fn test_unpack_values() {
        let packing = Packing {
            fill_value: Some(-32768.0),
            missing_value: None,
            scale_factor: 0.001,
            add_offset: 298.15,
        };
        let values = unpack_values(&[-32768.0, 0.0, 1850.0, f64::NAN], &packing);

        assert_eq!(values[0], None);
        assert!((values[1].unwrap() - 298.15).abs() < 1e-9);
        assert!((values[2].unwrap() - 300.0).abs() < 1e-9);
        assert_eq!(values[3], None);
    }

    #[test]
    fn test_field_shape_is_checked() {
        let result = GridSnapshot::new(vec![0.0, 1.0], vec![0.0, 1.0]).with_field("adt", vec![None; 3]);
        assert!(result.is_err());
    }
}
