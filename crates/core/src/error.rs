//! Construction-time validation errors
//!
//! Simulation-time degeneracy (NaN inputs, zero ROS, no ignition source left) is
//! never an error: those are normal outcomes handled where they occur. Everything
//! here is a caller or configuration mistake, rejected before a run starts.

/// Errors raised while building or configuring a simulation
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Grid must have at least one row and one column
    InvalidDimensions {
        /// Columns requested
        grid_x: usize,
        /// Rows requested
        grid_y: usize,
    },
    /// A scalar parameter is out of its valid range
    InvalidParameter {
        /// Parameter name (e.g. `"cell_size"`, `"dt"`)
        name: &'static str,
        /// What is wrong with it
        message: String,
    },
    /// A raster layer does not match the grid shape
    ShapeMismatch {
        /// Layer name (e.g. `"ndvi"`)
        layer: &'static str,
        /// Expected element count (`grid_x * grid_y`)
        expected: usize,
        /// Actual element count
        actual: usize,
    },
    /// Cell coordinates outside the grid
    OutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Grid rows
        grid_y: usize,
        /// Grid columns
        grid_x: usize,
    },
    /// Land-cover class name not in `{forest, shrub, savanna, other}`
    UnknownLandCover(String),
    /// An external data provider failed to deliver inputs
    Provider(String),
}

impl SimulationError {
    /// Shorthand for [`SimulationError::InvalidParameter`]
    pub(crate) fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Reject non-finite or non-positive values
    pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::invalid(
                name,
                format!("must be finite and positive, got {value}"),
            ))
        }
    }
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidDimensions { grid_x, grid_y } => write!(
                f,
                "Invalid grid dimensions {grid_x}x{grid_y}: both must be at least 1"
            ),
            SimulationError::InvalidParameter { name, message } => {
                write!(f, "Invalid parameter '{name}': {message}")
            }
            SimulationError::ShapeMismatch {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "Layer '{layer}' size mismatch: expected {expected} cells, got {actual}"
            ),
            SimulationError::OutOfBounds {
                row,
                col,
                grid_y,
                grid_x,
            } => write!(
                f,
                "Cell ({row}, {col}) is outside the {grid_y}x{grid_x} grid"
            ),
            SimulationError::UnknownLandCover(name) => {
                write!(f, "Unknown land-cover class '{name}'")
            }
            SimulationError::Provider(msg) => write!(f, "Data provider failed: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {}
