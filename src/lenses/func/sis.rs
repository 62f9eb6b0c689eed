use crate::constants::{C_KM_PER_S, RAD_TO_ARCSEC};
use crate::float_trait::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SisValues<T> {
    pub x0: T,
    pub y0: T,
    pub rein: T,
}

pub fn reduced_deflection_angle<T: Float>(p: &SisValues<T>, x: T, y: T, s: T) -> (T, T) {
    let dx = x - p.x0;
    let dy = y - p.y0;
    let r = dx.hypot(dy) + s;
    if r == T::zero() {
        return (T::zero(), T::zero());
    }
    (p.rein * dx / r, p.rein * dy / r)
}

pub fn potential<T: Float>(p: &SisValues<T>, x: T, y: T, s: T) -> T {
    p.rein * ((x - p.x0).hypot(y - p.y0) + s)
}

pub fn convergence<T: Float>(p: &SisValues<T>, x: T, y: T, s: T) -> T {
    let r = (x - p.x0).hypot(y - p.y0) + s;
    p.rein / (T::two() * super::clamped(r))
}

/// Einstein radius in arcsec for the velocity dispersion in km/s
pub fn sigma_v_to_rein<T: Float>(sigma_v: T, d_ls: T, d_s: T) -> T {
    super::sie::sigma_v_to_rein(sigma_v, d_ls, d_s)
}

/// Velocity dispersion in km/s for the Einstein radius in arcsec
pub fn rein_to_sigma_v<T: Float>(rein: T, d_ls: T, d_s: T) -> T {
    let beta2 = rein / T::cast(RAD_TO_ARCSEC) * d_s / (T::four() * T::PI() * d_ls);
    beta2.sqrt() * T::cast(C_KM_PER_S)
}

/// Einstein radius in arcsec for the mass in Msun enclosed by it
///
/// The mean convergence inside the Einstein radius is one, so the relation is the same as for a
/// point mass.
pub fn mass_to_rein<T: Float>(mass: T, d_ls: T, d_l: T, d_s: T) -> T {
    super::point::mass_to_rein(mass, d_ls, d_l, d_s)
}

/// Mass in Msun enclosed by the Einstein radius in arcsec
pub fn rein_to_mass<T: Float>(rein: T, d_ls: T, d_l: T, d_s: T) -> T {
    super::point::rein_to_mass(rein, d_ls, d_l, d_s)
}
