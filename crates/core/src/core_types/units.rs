//! Semantic unit types for type-safe physical quantity handling
//!
//! Newtype wrappers keep metres, seconds and spread rates from being mixed up at
//! the physics boundaries (ROS model, travel-time formulas, wind handling).
//!
//! # Design
//! - All quantities are `f64`: ignition times are compared against a 1e-9 s
//!   improvement threshold, which `f32` cannot resolve after a few hours
//! - Total ordering via `f64::total_cmp` (NaN sorts above every number)
//! - `Deref` to the raw value for arithmetic-heavy formula code
//! - Serde support (newtypes serialize as their inner number)
//!
//! # Usage
//! ```
//! use fire_ca_core::core_types::units::{Meters, MetersPerSecond, Seconds};
//!
//! let cell = Meters::new(20.0);
//! let ros = MetersPerSecond::new(0.05);
//! let delay: Seconds = cell / ros;
//! assert!((*delay - 400.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Sub};

/// Shared boilerplate for `f64` unit newtypes: total ordering, `Deref`,
/// conversions, same-unit arithmetic and scalar scaling.
macro_rules! unit_newtype {
    ($name:ident, $fmt:literal) => {
        // Equality agrees with `total_cmp`: NaN equals NaN, -0.0 differs from 0.0.
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.cmp(other) == Ordering::Equal
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl $name {
            /// Get the raw f64 value
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name(v)
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }

        impl Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }

        impl Div<f64> for $name {
            type Output = $name;
            fn div(self, rhs: f64) -> $name {
                $name(self.0 / rhs)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, $fmt, self.0)
            }
        }
    };
}

// ============================================================================
// DISTANCE / TIME / VELOCITY
// ============================================================================

/// Distance in meters
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Meters(f64);

unit_newtype!(Meters, "{:.2} m");

impl Meters {
    /// Create a new distance in meters
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Meters(value)
    }
}

/// Duration or simulation time in seconds (may be `+∞` for "never")
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Seconds(f64);

unit_newtype!(Seconds, "{:.1} s");

impl Seconds {
    /// Never happens / not yet scheduled
    pub const INFINITY: Seconds = Seconds(f64::INFINITY);

    /// Create a new duration in seconds
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Seconds(value)
    }

    /// Create from minutes
    #[inline]
    #[must_use]
    pub fn from_minutes(minutes: f64) -> Self {
        Seconds(minutes * 60.0)
    }

    /// Convert to minutes
    #[inline]
    #[must_use]
    pub fn to_minutes(self) -> f64 {
        self.0 / 60.0
    }

    /// Whether the value is a real (finite) time
    #[inline]
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

/// Velocity in meters per second (fire rate of spread, wind speed)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

unit_newtype!(MetersPerSecond, "{:.4} m/s");

impl MetersPerSecond {
    /// No spread / calm
    pub const ZERO: MetersPerSecond = MetersPerSecond(0.0);

    /// Create a new velocity
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }

    /// Convert from feet per minute (the Rothermel model's native unit)
    #[inline]
    #[must_use]
    pub fn from_feet_per_minute(ft_min: f64) -> Self {
        MetersPerSecond(ft_min * 0.3048 / 60.0)
    }

    /// Convert to feet per minute
    #[inline]
    #[must_use]
    pub fn to_feet_per_minute(self) -> f64 {
        self.0 * 196.85
    }

    /// A usable spread rate: finite and strictly positive
    #[inline]
    #[must_use]
    pub fn is_spreading(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

// Cross-type operation: distance / velocity = time.
// Non-positive or NaN velocity means the front never arrives.
impl Div<MetersPerSecond> for Meters {
    type Output = Seconds;
    fn div(self, rhs: MetersPerSecond) -> Seconds {
        if rhs.0.is_nan() || rhs.0 <= 0.0 {
            Seconds::INFINITY
        } else {
            Seconds(self.0 / rhs.0)
        }
    }
}

// Cross-type operation: velocity × time = distance
impl Mul<Seconds> for MetersPerSecond {
    type Output = Meters;
    fn mul(self, rhs: Seconds) -> Meters {
        Meters(self.0 * rhs.0)
    }
}

// ============================================================================
// TEMPERATURE / ANGLE
// ============================================================================

/// Temperature in degrees Celsius (land-surface temperature)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

unit_newtype!(Celsius, "{:.1}°C");

impl Celsius {
    /// Create a new temperature
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Celsius(value)
    }
}

/// Angle in degrees (compass bearings: 0° = North, clockwise)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

unit_newtype!(Degrees, "{:.1}°");

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Convert a compass bearing (0° = North, clockwise) to a standard math
    /// angle in radians (0 = +x / East, counter-clockwise)
    #[inline]
    #[must_use]
    pub fn compass_to_math_radians(self) -> f64 {
        (90.0 - self.0).to_radians()
    }

    /// Tangent of the angle (slope degrees to slope tangent)
    #[inline]
    #[must_use]
    pub fn tan(self) -> f64 {
        self.0.to_radians().tan()
    }
}
