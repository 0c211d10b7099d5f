//! Environmental input rasters
//!
//! Four co-registered layers (slope, NDVI, land-surface temperature, land cover)
//! sampled on the simulation grid, row-major `[row * grid_x + col]`. Built once
//! per run and only read afterwards.

use crate::core_types::landcover::LandCover;
use crate::core_types::units::{Celsius, Degrees, MetersPerSecond};
use crate::error::SimulationError;
use crate::physics::calculate_ros;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-cell environmental inputs for one simulation patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentLayers {
    /// Number of columns
    pub(crate) grid_x: usize,
    /// Number of rows
    pub(crate) grid_y: usize,
    /// Tangent of terrain slope (may contain NaN for missing samples)
    pub(crate) slope_tan: Vec<f64>,
    /// Vegetation index (may contain NaN)
    pub(crate) ndvi: Vec<f64>,
    /// Land-surface temperature (°C)
    pub(crate) lst: Vec<f64>,
    /// Land-cover class
    pub(crate) landcover: Vec<LandCover>,
}

impl EnvironmentLayers {
    /// Build from raw rasters, checking every layer against `grid_x * grid_y`
    ///
    /// # Errors
    /// [`SimulationError::InvalidDimensions`] for an empty grid and
    /// [`SimulationError::ShapeMismatch`] naming the first layer of the wrong size.
    pub fn new(
        grid_x: usize,
        grid_y: usize,
        slope_tan: Vec<f64>,
        ndvi: Vec<f64>,
        lst: Vec<f64>,
        landcover: Vec<LandCover>,
    ) -> Result<Self, SimulationError> {
        if grid_x == 0 || grid_y == 0 {
            return Err(SimulationError::InvalidDimensions { grid_x, grid_y });
        }
        let expected = grid_x * grid_y;
        check_len("slope_tan", expected, slope_tan.len())?;
        check_len("ndvi", expected, ndvi.len())?;
        check_len("lst", expected, lst.len())?;
        check_len("landcover", expected, landcover.len())?;

        Ok(Self {
            grid_x,
            grid_y,
            slope_tan,
            ndvi,
            lst,
            landcover,
        })
    }

    /// Build from a slope raster in degrees (as delivered by DEM terrain tools)
    ///
    /// # Errors
    /// Same as [`EnvironmentLayers::new`].
    pub fn from_slope_degrees(
        grid_x: usize,
        grid_y: usize,
        slope_deg: &[f64],
        ndvi: Vec<f64>,
        lst: Vec<f64>,
        landcover: Vec<LandCover>,
    ) -> Result<Self, SimulationError> {
        let slope_tan = slope_deg.iter().map(|&d| Degrees::new(d).tan()).collect();
        Self::new(grid_x, grid_y, slope_tan, ndvi, lst, landcover)
    }

    /// Homogeneous landscape, handy for scenarios and tests
    ///
    /// # Errors
    /// [`SimulationError::InvalidDimensions`] for an empty grid.
    pub fn uniform(
        grid_x: usize,
        grid_y: usize,
        slope_tan: f64,
        ndvi: f64,
        lst: Celsius,
        landcover: LandCover,
    ) -> Result<Self, SimulationError> {
        let n = grid_x * grid_y;
        Self::new(
            grid_x,
            grid_y,
            vec![slope_tan; n],
            vec![ndvi; n],
            vec![*lst; n],
            vec![landcover; n],
        )
    }

    /// Number of columns
    pub fn grid_x(&self) -> usize {
        self.grid_x
    }

    /// Number of rows
    pub fn grid_y(&self) -> usize {
        self.grid_y
    }

    /// Total cell count
    pub fn len(&self) -> usize {
        self.grid_x * self.grid_y
    }

    /// Always false: construction rejects empty grids
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slope tangent at a cell
    pub fn slope_tan_at(&self, row: usize, col: usize) -> f64 {
        self.slope_tan[row * self.grid_x + col]
    }

    /// NDVI at a cell
    pub fn ndvi_at(&self, row: usize, col: usize) -> f64 {
        self.ndvi[row * self.grid_x + col]
    }

    /// Land-surface temperature at a cell
    pub fn lst_at(&self, row: usize, col: usize) -> Celsius {
        Celsius::new(self.lst[row * self.grid_x + col])
    }

    /// Land cover at a cell
    pub fn landcover_at(&self, row: usize, col: usize) -> LandCover {
        self.landcover[row * self.grid_x + col]
    }

    /// Cells that can carry fire: green enough and of a burnable class
    ///
    /// NaN NDVI never passes the threshold.
    pub fn fuel_mask(&self, ndvi_threshold: f64) -> Vec<bool> {
        self.ndvi
            .iter()
            .zip(&self.landcover)
            .map(|(&ndvi, lc)| ndvi > ndvi_threshold && lc.is_burnable())
            .collect()
    }

    /// Rate of spread for every cell (parallel over cells)
    ///
    /// Cells outside `fuel_mask` get 0 without evaluating the model.
    pub fn compute_ros(&self, wind: MetersPerSecond, fuel_mask: &[bool]) -> Vec<MetersPerSecond> {
        (0..self.len())
            .into_par_iter()
            .map(|idx| {
                if !fuel_mask.get(idx).copied().unwrap_or(false) {
                    return MetersPerSecond::ZERO;
                }
                let ros = calculate_ros(
                    self.slope_tan[idx],
                    self.ndvi[idx],
                    Celsius::new(self.lst[idx]),
                    wind,
                    self.landcover[idx],
                );
                if ros.is_spreading() {
                    ros
                } else {
                    MetersPerSecond::ZERO
                }
            })
            .collect()
    }
}

fn check_len(layer: &'static str, expected: usize, actual: usize) -> Result<(), SimulationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(SimulationError::ShapeMismatch {
            layer,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shrubland(grid_x: usize, grid_y: usize, ndvi: f64) -> EnvironmentLayers {
        EnvironmentLayers::uniform(grid_x, grid_y, 0.0, ndvi, Celsius::new(30.0), LandCover::Shrub)
            .unwrap()
    }

    #[test]
    fn test_shape_mismatch_names_layer() {
        let err = EnvironmentLayers::new(
            3,
            2,
            vec![0.0; 6],
            vec![0.3; 5],
            vec![30.0; 6],
            vec![LandCover::Shrub; 6],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimulationError::ShapeMismatch {
                layer: "ndvi",
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_empty_grid_rejected() {
        let err = EnvironmentLayers::new(0, 4, vec![], vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err, SimulationError::InvalidDimensions { grid_x: 0, grid_y: 4 });
    }

    #[test]
    fn test_from_slope_degrees() {
        let layers = EnvironmentLayers::from_slope_degrees(
            2,
            1,
            &[0.0, 45.0],
            vec![0.3; 2],
            vec![30.0; 2],
            vec![LandCover::Forest; 2],
        )
        .unwrap();
        assert!(layers.slope_tan_at(0, 0).abs() < 1e-12);
        assert!((layers.slope_tan_at(0, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fuel_mask_needs_green_and_burnable() {
        let layers = EnvironmentLayers::new(
            4,
            1,
            vec![0.0; 4],
            vec![0.3, 0.24, 0.5, f64::NAN],
            vec![30.0; 4],
            vec![LandCover::Shrub, LandCover::Shrub, LandCover::Other, LandCover::Forest],
        )
        .unwrap();
        assert_eq!(layers.fuel_mask(0.24), vec![true, false, false, false]);
    }

    #[test]
    fn test_ros_zero_outside_fuel() {
        let layers = shrubland(3, 3, 0.3);
        let mut mask = layers.fuel_mask(0.24);
        mask[4] = false;
        let ros = layers.compute_ros(MetersPerSecond::new(5.0), &mask);
        assert_eq!(ros[4], MetersPerSecond::ZERO);
        assert!(ros[0].is_spreading());
        assert!(ros.iter().all(|r| *r == ros[0] || *r == MetersPerSecond::ZERO));
    }
}
