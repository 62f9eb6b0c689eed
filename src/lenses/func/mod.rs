//! Lens profile formulas evaluated at a single sky position
//!
//! Every family takes the resolved parameter values as a plain `Copy` struct. Positions and
//! lengths are in arcsec, distances in Mpc and masses in Msun.

use crate::constants::{ARCSEC_TO_RAD, C_KM_PER_S, MPC_TO_KM, SECONDS_PER_DAY};
use crate::float_trait::Float;

pub mod epl;
pub mod external_shear;
pub mod mass_sheet;
pub mod multipole;
pub mod nfw;
pub mod pixelated;
pub mod point;
pub mod pseudo_jaffe;
pub mod sie;
pub mod sis;
pub mod tnfw;

/// Deflection as seen from the observer, `alpha_hat = alpha d_s / d_ls`
pub fn physical_from_reduced_deflection_angle<T: Float>(ax: T, ay: T, d_s: T, d_ls: T) -> (T, T) {
    let factor = d_s / d_ls;
    (ax * factor, ay * factor)
}

pub fn reduced_from_physical_deflection_angle<T: Float>(ax: T, ay: T, d_s: T, d_ls: T) -> (T, T) {
    let factor = d_ls / d_s;
    (ax * factor, ay * factor)
}

/// Factor converting a Fermat potential in arcsec² into a time delay in days
pub fn time_delay_arcsec2_to_days<T: Float>(d_l: T, d_s: T, d_ls: T, z_l: T) -> T {
    let arcsec_to_rad = T::cast(ARCSEC_TO_RAD);
    (T::one() + z_l) * d_l * d_s / d_ls * arcsec_to_rad * arcsec_to_rad * T::cast(MPC_TO_KM)
        / T::cast(C_KM_PER_S)
        / T::cast(SECONDS_PER_DAY)
}

/// Unit vector pointing to `(x, y)`, zero at the origin
#[inline]
pub(crate) fn direction<T: Float>(x: T, y: T) -> (T, T) {
    let r = x.hypot(y);
    if r == T::zero() {
        (T::zero(), T::zero())
    } else {
        (x / r, y / r)
    }
}

/// Radius clamped to machine epsilon, for profiles diverging at the centre
#[inline]
pub(crate) fn clamped<T: Float>(r: T) -> T {
    r.max(T::epsilon())
}
