//! Land-cover classification
//!
//! Maps MODIS `MCD12Q1` `LC_Type1` (IGBP) codes onto the four classes the
//! engine distinguishes:
//! - Codes 1-5: Forest (evergreen/deciduous needleleaf and broadleaf, mixed)
//! - Codes 6-7: Shrub (closed and open shrublands)
//! - Codes 8-9: Savanna (woody savanna, savanna)
//! - Anything else (water = 0, grassland, cropland, urban, barren...): Other

use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Land-cover class of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandCover {
    /// Closed canopy forest (wind is partly sheltered)
    Forest,
    /// Shrubland
    Shrub,
    /// Savanna / woody savanna
    Savanna,
    /// Non-burnable or not modelled
    #[default]
    Other,
}

impl LandCover {
    /// Classify a MODIS `LC_Type1` code
    pub fn from_modis_code(code: u8) -> Self {
        match code {
            1..=5 => LandCover::Forest,
            6 | 7 => LandCover::Shrub,
            8 | 9 => LandCover::Savanna,
            _ => LandCover::Other,
        }
    }

    /// Whether this class can carry fire at all
    pub fn is_burnable(self) -> bool {
        !matches!(self, LandCover::Other)
    }

    /// Class name as used in input data
    pub fn as_str(self) -> &'static str {
        match self {
            LandCover::Forest => "forest",
            LandCover::Shrub => "shrub",
            LandCover::Savanna => "savanna",
            LandCover::Other => "other",
        }
    }

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(LandCover::Forest),
            1 => Some(LandCover::Shrub),
            2 => Some(LandCover::Savanna),
            3 => Some(LandCover::Other),
            _ => None,
        }
    }
}

impl FromStr for LandCover {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forest" => Ok(LandCover::Forest),
            "shrub" => Ok(LandCover::Shrub),
            "savanna" => Ok(LandCover::Savanna),
            "other" => Ok(LandCover::Other),
            _ => Err(SimulationError::UnknownLandCover(s.to_string())),
        }
    }
}

impl fmt::Display for LandCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
