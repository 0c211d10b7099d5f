//! Human-readable run summaries

use super::{SimulationStats, StartConditions};
use crate::core_types::cell_state::CellState;
use std::fmt;

const RULE: &str = "==================================================";

fn fmt_opt(value: Option<f64>, digits: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.digits$}"))
}

/// Thousands-separated integer (`12,345`)
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn fmt_area(area_m2: f64) -> String {
    if area_m2.is_finite() && area_m2 >= 0.0 {
        format!("{} m²", group_thousands(area_m2.round() as u64))
    } else {
        "N/A".to_string()
    }
}

fn write_slope(f: &mut fmt::Formatter<'_>, start: &StartConditions, prefix: &str) -> fmt::Result {
    match (start.slope_pct, start.slope_deg, start.slope_tan) {
        (Some(pct), Some(deg), Some(tan)) => {
            writeln!(f, "{prefix}Slope: {pct:.2}% = {deg:.2}° (tan={tan:.4})")
        }
        _ => writeln!(f, "{prefix}Slope: N/A"),
    }
}

/// Brief summary: totals, start point, per-state breakdown and last ignition
impl fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.parameters;
        writeln!(f, "{RULE}")?;
        writeln!(f, "FIRE SIMULATION RESULTS")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total cells: {}", group_thousands(self.total_cells as u64))?;
        writeln!(
            f,
            "Burned area: {:.2} ha ({:.2}% of grid, {:.2}% of fuel)",
            self.burned_area_ha, self.burn_percentage_all, self.burn_percentage_of_fuel
        )?;

        writeln!(f)?;
        writeln!(f, "Start point:")?;
        writeln!(f, "Lat/Lon: ({:.6}, {:.6})", p.lat, p.lon)?;
        write_slope(f, &self.start, "")?;
        writeln!(f, "NDVI: {}", fmt_opt(self.start.ndvi, 4))?;

        writeln!(f)?;
        writeln!(f, "CELL STATUS BREAKDOWN:")?;
        for state in CellState::ALL {
            let b = self.areas.get(state);
            writeln!(
                f,
                "  {:<10} {} cells ({})",
                format!("{state}:"),
                group_thousands(b.cells as u64),
                fmt_area(b.area_m2)
            )?;
        }

        writeln!(f)?;
        match &self.last_ignition {
            Some(point) => {
                writeln!(
                    f,
                    "Last spread point within the simulated {:.0} min:",
                    p.sim_time / 60.0
                )?;
                writeln!(f, "Lat: {:.6}  Lon: {:.6}", point.lat, point.lon)
            }
            None => writeln!(f, "No fire spread completed within the simulated period"),
        }
    }
}

/// Brief summary followed by spread-rate, start-point and parameter sections
pub struct DetailedSummary<'a>(pub(super) &'a SimulationStats);

impl fmt::Display for DetailedSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        let p = &stats.parameters;
        let ros = &stats.ros_stats;
        let start = &stats.start;

        write!(f, "{stats}")?;

        writeln!(f)?;
        writeln!(f, "ROS STATISTICS:")?;
        writeln!(f, "  Valid cells: {}", group_thousands(ros.count as u64))?;
        writeln!(f, "  Mean ROS: {:.6} m/s", ros.mean)?;
        writeln!(f, "  Min ROS:  {:.6} m/s", ros.min)?;
        writeln!(f, "  Max ROS:  {:.6} m/s", ros.max)?;

        writeln!(f)?;
        writeln!(f, "STARTING POINT CONDITIONS:")?;
        match start.grid_pos {
            Some((row, col)) => writeln!(f, "  Grid position: ({row}, {col})")?,
            None => writeln!(f, "  Grid position: N/A")?,
        }
        writeln!(f, "  Coordinates: ({:.6}, {:.6})", p.lat, p.lon)?;
        write_slope(f, start, "  ")?;
        writeln!(f, "  NDVI: {}", fmt_opt(start.ndvi, 4))?;
        writeln!(f, "  Initial ROS: {} m/s", fmt_opt(start.ros, 6))?;

        writeln!(f)?;
        writeln!(f, "SIMULATION PARAMETERS:")?;
        writeln!(f, "  Grid size: {} x {}", p.grid_x, p.grid_y)?;
        writeln!(f, "  Cell size: {} m", p.cell_size)?;
        writeln!(f, "  Wind speed: {} m/s", p.wind_speed)?;
        writeln!(f, "  Wind direction: {}°", p.wind_dir)?;
        writeln!(f, "  Simulation time: {:.1} min", p.sim_time / 60.0)?;
        writeln!(f, "  Time step (dt): {} s", p.dt)?;
        writeln!(
            f,
            "  Timing: {:.3} s stepping, {:.3} s ROS precompute",
            stats.execution_time, stats.ros_computation_time
        )?;
        writeln!(f, "{RULE}")
    }
}
