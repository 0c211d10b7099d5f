//! Pure spread physics: per-cell rate of spread, fuel moisture, travel time and
//! the directional multiplier. Nothing here touches the grid.

pub mod directional;
pub mod fuel_moisture;
pub mod rothermel;
pub mod travel_time;

pub use directional::directional_scale;
pub use fuel_moisture::fuel_moisture_fraction;
pub use rothermel::{calculate_ros, ROS_CUTOFF_MPS};
pub use travel_time::{diagonal_delay, neighbor_delay, orthogonal_delay};
