//! Simplified Anderson-13 fuel models selected from vegetation greenness
//!
//! Only three litter classes are distinguished. Greener cells carry more fuel
//! and a deeper fuel bed; the land-cover class plays no part in the choice.

use serde::{Deserialize, Serialize};

/// NDVI below which a cell is treated as light litter
pub const LIGHT_LITTER_NDVI_MAX: f64 = 0.25;

/// NDVI below which a cell is treated as medium litter
pub const MEDIUM_LITTER_NDVI_MAX: f64 = 0.45;

/// Per-model fuel bed parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelModelParams {
    /// Fuel particle density (divides oven-dry bulk density to give packing ratio)
    pub particle_density: f64,
    /// 1-hour fuel load (tons/acre)
    pub fine_fuel_load: f64,
    /// Nominal moisture of the dead fuel (fraction); overridden by the NDVI/LST estimate
    pub nominal_moisture: f64,
    /// Fuel bed depth (ft)
    pub depth: f64,
}

/// Anderson fuel model number used for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelModel {
    /// Model 1 - short grass / light litter
    LightLitter,
    /// Model 8 - closed timber litter
    MediumLitter,
    /// Model 10 - timber litter with understory
    HeavyLitter,
}

impl FuelModel {
    /// Classify from vegetation index
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi < LIGHT_LITTER_NDVI_MAX {
            FuelModel::LightLitter
        } else if ndvi < MEDIUM_LITTER_NDVI_MAX {
            FuelModel::MediumLitter
        } else {
            FuelModel::HeavyLitter
        }
    }

    /// Anderson model number
    pub fn anderson_number(self) -> u8 {
        match self {
            FuelModel::LightLitter => 1,
            FuelModel::MediumLitter => 8,
            FuelModel::HeavyLitter => 10,
        }
    }

    /// Fuel bed parameters for this model
    pub const fn params(self) -> FuelModelParams {
        match self {
            FuelModel::LightLitter => FuelModelParams {
                particle_density: 3.0,
                fine_fuel_load: 0.05,
                nominal_moisture: 0.30,
                depth: 7.0,
            },
            FuelModel::MediumLitter => FuelModelParams {
                particle_density: 4.64,
                fine_fuel_load: 0.12,
                nominal_moisture: 0.247,
                depth: 10.82,
            },
            FuelModel::HeavyLitter => FuelModelParams {
                particle_density: 6.0,
                fine_fuel_load: 0.20,
                nominal_moisture: 0.22,
                depth: 15.0,
            },
        }
    }
}
