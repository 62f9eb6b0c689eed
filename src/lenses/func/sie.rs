use crate::constants::{C_KM_PER_S, RAD_TO_ARCSEC};
use crate::float_trait::Float;
use crate::geometry::{derotate, translate_rotate};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SieValues<T> {
    pub x0: T,
    pub y0: T,
    pub q: T,
    pub phi: T,
    pub rein: T,
}

/// `sqrt(q² (x² + s²) + y²)` in the lens frame
#[inline]
fn elliptical_radius<T: Float>(q: T, x: T, y: T, s: T) -> T {
    (q * q * (x * x + s * s) + y * y).sqrt()
}

fn lens_frame_deflection<T: Float>(p: &SieValues<T>, x: T, y: T, s: T) -> (T, T) {
    let psi = elliptical_radius(p.q, x, y, s);
    if psi + s == T::zero() {
        return (T::zero(), T::zero());
    }
    let f = (T::one() - p.q * p.q).sqrt();
    let b = p.rein * p.q.sqrt();
    if f < T::epsilon() {
        return (b * x / (psi + s), b * y / (psi + s));
    }
    (
        b / f * (f * x / (psi + s)).atan(),
        b / f * (f * y / (psi + p.q * p.q * s)).atanh(),
    )
}

pub fn reduced_deflection_angle<T: Float>(p: &SieValues<T>, x: T, y: T, s: T) -> (T, T) {
    let (x, y) = translate_rotate(x, y, p.x0, p.y0, p.phi);
    let (ax, ay) = lens_frame_deflection(p, x, y, s);
    derotate(ax, ay, p.phi)
}

/// `psi = x alpha_x + y alpha_y`, exact for zero softening
pub fn potential<T: Float>(p: &SieValues<T>, x: T, y: T, s: T) -> T {
    let (x, y) = translate_rotate(x, y, p.x0, p.y0, p.phi);
    let (ax, ay) = lens_frame_deflection(p, x, y, s);
    x * ax + y * ay
}

pub fn convergence<T: Float>(p: &SieValues<T>, x: T, y: T, s: T) -> T {
    let (x, y) = translate_rotate(x, y, p.x0, p.y0, p.phi);
    let psi = elliptical_radius(p.q, x, y, s);
    p.q.sqrt() * p.rein / (T::two() * super::clamped(psi))
}

/// Einstein radius in arcsec of an isothermal profile with velocity dispersion in km/s
pub fn sigma_v_to_rein<T: Float>(sigma_v: T, d_ls: T, d_s: T) -> T {
    let beta = sigma_v / T::cast(C_KM_PER_S);
    T::four() * T::PI() * beta * beta * d_ls / d_s * T::cast(RAD_TO_ARCSEC)
}
