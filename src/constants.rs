//! Physical constants and unit conversions
//!
//! All values are `f64`, convert with [Float::cast](crate::Float::cast) at the use site.

use std::f64::consts::PI;

/// Speed of light, km/s
pub const C_KM_PER_S: f64 = 299_792.458;

/// Gravitational constant over speed of light squared, Mpc / Msun
pub const G_OVER_C2_MPC_PER_MSUN: f64 = 4.785_415_917_274_702e-20;

/// Gravitational constant, Mpc (km/s)^2 / Msun
pub const G_MPC_KM2_PER_S2_MSUN: f64 = 4.300_917_270_036_279e-9;

/// Radians in one arcsecond
pub const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Arcseconds in one radian
pub const RAD_TO_ARCSEC: f64 = 1.0 / ARCSEC_TO_RAD;

/// Kilometers in one megaparsec
pub const MPC_TO_KM: f64 = 3.085_677_581_491_367e19;

/// Seconds in one day
pub const SECONDS_PER_DAY: f64 = 86_400.0;
