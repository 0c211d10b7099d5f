//! Grid-offset to geographic coordinate conversion
//!
//! Uses a local equirectangular approximation around the grid centre, adequate
//! for patches a few kilometres across.

/// Metres per degree of latitude (and of longitude at the equator)
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Metres per degree of longitude at a latitude
pub fn meters_per_deg_lon(lat: f64) -> f64 {
    METERS_PER_DEG_LAT * lat.to_radians().cos()
}

/// Latitude/longitude of a cell, given the coordinates of the grid centre
///
/// The centre cell is `(grid_y / 2, grid_x / 2)` with integer division; rows
/// grow southward and columns eastward.
pub fn cell_to_lat_lon(
    center_lat: f64,
    center_lon: f64,
    grid_x: usize,
    grid_y: usize,
    cell_size: f64,
    row: usize,
    col: usize,
) -> (f64, f64) {
    let north_m = ((grid_y / 2) as f64 - row as f64) * cell_size;
    let east_m = (col as f64 - (grid_x / 2) as f64) * cell_size;
    (
        center_lat + north_m / METERS_PER_DEG_LAT,
        center_lon + east_m / meters_per_deg_lon(center_lat),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centre_maps_to_origin() {
        let (lat, lon) = cell_to_lat_lon(18.7, 98.8, 101, 101, 20.0, 50, 50);
        assert_eq!((lat, lon), (18.7, 98.8));
    }

    #[test]
    fn test_north_east_offsets() {
        // Two rows up, three columns right on a 20 m grid at the equator
        let (lat, lon) = cell_to_lat_lon(0.0, 0.0, 10, 10, 20.0, 3, 8);
        assert_relative_eq!(lat, 40.0 / METERS_PER_DEG_LAT, max_relative = 1e-12);
        assert_relative_eq!(lon, 60.0 / METERS_PER_DEG_LAT, max_relative = 1e-12);
    }

    #[test]
    fn test_longitude_degrees_stretch_with_latitude() {
        assert!(meters_per_deg_lon(60.0) < meters_per_deg_lon(0.0));
        assert_relative_eq!(meters_per_deg_lon(60.0), METERS_PER_DEG_LAT * 0.5, max_relative = 1e-9);
    }
}
