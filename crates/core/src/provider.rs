//! Seams to external data services
//!
//! Environmental rasters and historical wind come from remote services that
//! are outside this crate. The traits here describe what the engine needs from
//! them; in-memory implementations serve tests, demos and callers that already
//! hold the data.

use crate::core_types::weather::WindEnvelope;
use crate::error::SimulationError;
use crate::grid::EnvironmentLayers;
use crate::stats::geo::{meters_per_deg_lon, METERS_PER_DEG_LAT};
use serde::{Deserialize, Serialize};

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western edge (longitude)
    pub min_lon: f64,
    /// Southern edge (latitude)
    pub min_lat: f64,
    /// Eastern edge (longitude)
    pub max_lon: f64,
    /// Northern edge (latitude)
    pub max_lat: f64,
}

/// Patch of environmental data to fetch, centred on a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatchRequest {
    /// Centre latitude
    pub lat: f64,
    /// Centre longitude
    pub lon: f64,
    /// Month of the vegetation / temperature composite (1-12)
    pub month: u32,
    /// Year of the composites
    pub year: i32,
    /// Columns
    pub grid_x: usize,
    /// Rows
    pub grid_y: usize,
    /// Cell edge length (m)
    pub cell_size: f64,
}

impl PatchRequest {
    /// Bounding box covering `grid_x · cell` by `grid_y · cell` metres
    ///
    /// The longitude half-width collapses to zero at the poles.
    pub fn bounding_box(&self) -> BoundingBox {
        let half_width_m = self.grid_x as f64 * self.cell_size / 2.0;
        let half_height_m = self.grid_y as f64 * self.cell_size / 2.0;

        let per_deg_lon = meters_per_deg_lon(self.lat);
        let half_dx = if per_deg_lon > 0.0 {
            half_width_m / per_deg_lon
        } else {
            0.0
        };
        let half_dy = half_height_m / METERS_PER_DEG_LAT;

        BoundingBox {
            min_lon: self.lon - half_dx,
            min_lat: self.lat - half_dy,
            max_lon: self.lon + half_dx,
            max_lat: self.lat + half_dy,
        }
    }
}

/// Point-in-time wind lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindRequest {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
    /// Year
    pub year: i32,
    /// Month (1-12)
    pub month: u32,
    /// Day of month
    pub day: u32,
    /// Local hour of the observation
    pub hour: u32,
}

/// Local hour used when a request does not specify one (early afternoon peak)
pub const DEFAULT_WIND_HOUR: u32 = 13;

/// Source of slope, NDVI, LST and land-cover rasters
pub trait EnvironmentProvider {
    /// Fetch layers resampled to the requested grid
    ///
    /// # Errors
    /// [`SimulationError::Provider`] when the data cannot be delivered, or a
    /// shape error when the delivered rasters do not match the grid.
    fn fetch_layers(&self, request: &PatchRequest) -> Result<EnvironmentLayers, SimulationError>;
}

/// Source of historical wind observations
pub trait WindProvider {
    /// Fetch the speed band and direction for a point in time
    ///
    /// # Errors
    /// [`SimulationError::Provider`] when no observation exists.
    fn fetch_wind(&self, request: &WindRequest) -> Result<WindEnvelope, SimulationError>;
}

/// Environment provider backed by layers already in memory
#[derive(Debug, Clone)]
pub struct StaticEnvironment {
    layers: EnvironmentLayers,
}

impl StaticEnvironment {
    /// Serve `layers` for every request of matching shape
    pub fn new(layers: EnvironmentLayers) -> Self {
        Self { layers }
    }
}

impl EnvironmentProvider for StaticEnvironment {
    fn fetch_layers(&self, request: &PatchRequest) -> Result<EnvironmentLayers, SimulationError> {
        if request.grid_x != self.layers.grid_x() || request.grid_y != self.layers.grid_y() {
            return Err(SimulationError::Provider(format!(
                "static layers are {}x{}, requested {}x{}",
                self.layers.grid_x(),
                self.layers.grid_y(),
                request.grid_x,
                request.grid_y
            )));
        }
        Ok(self.layers.clone())
    }
}

/// Wind provider returning the same observation for every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWind {
    /// Observed speed (m/s)
    pub speed: f64,
    /// Observed direction (degrees, 0° = North)
    pub direction: f64,
    /// Half-width of the reported speed band (m/s)
    pub band: f64,
}

impl FixedWind {
    /// Fixed observation with the default ±1 m/s band
    pub fn new(speed: f64, direction: f64) -> Self {
        Self {
            speed,
            direction,
            band: crate::core_types::weather::DEFAULT_WIND_BAND,
        }
    }
}

impl WindProvider for FixedWind {
    fn fetch_wind(&self, _request: &WindRequest) -> Result<WindEnvelope, SimulationError> {
        if !self.speed.is_finite() || !self.direction.is_finite() {
            return Err(SimulationError::Provider(
                "wind observation is not finite".to_string(),
            ));
        }
        Ok(WindEnvelope::around(self.speed, self.band, self.direction))
    }
}
