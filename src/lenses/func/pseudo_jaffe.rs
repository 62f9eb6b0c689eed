//! Pseudo-Jaffe profile, Eliasdottir et al. (2007) appendix A

use crate::constants::ARCSEC_TO_RAD;
use crate::float_trait::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PseudoJaffeValues<T> {
    pub x0: T,
    pub y0: T,
    /// Central convergence, see [convergence_0]
    pub kappa_0: T,
    /// Core radius, arcsec
    pub rc: T,
    /// Scale radius, arcsec, must differ from `rc`
    pub rs: T,
}

/// Central convergence of a lens of total mass `mass` in Msun
pub fn convergence_0<T: Float>(mass: T, rc: T, rs: T, d_l: T, critical_surface_density: T) -> T {
    let scale = d_l * T::cast(ARCSEC_TO_RAD);
    mass / (T::two() * T::PI() * critical_surface_density * rc * rs * scale * scale)
}

/// `(sqrt(a² + R²) - a) / R` without cancellation, zero at `R = 0`
#[inline]
fn core_term<T: Float>(a: T, r: T) -> T {
    let u = r / a;
    u / (T::one() + (T::one() + u * u).sqrt())
}

/// Mass in Msun projected within `radius` arcsec
pub fn mass_enclosed_2d<T: Float>(radius: T, mass: T, rc: T, rs: T, s: T) -> T {
    let theta = radius + s;
    let numerator =
        (rc * rc + theta * theta).sqrt() - rc - (rs * rs + theta * theta).sqrt() + rs;
    mass * numerator / (rs - rc)
}

fn radius<T: Float>(p: &PseudoJaffeValues<T>, x: T, y: T, s: T) -> (T, T, T) {
    let dx = x - p.x0;
    let dy = y - p.y0;
    (dx, dy, dx.hypot(dy) + s)
}

fn amplitude<T: Float>(p: &PseudoJaffeValues<T>) -> T {
    p.kappa_0 * p.rc * p.rs / (p.rs - p.rc)
}

pub fn reduced_deflection_angle<T: Float>(p: &PseudoJaffeValues<T>, x: T, y: T, s: T) -> (T, T) {
    let (dx, dy, r) = radius(p, x, y, s);
    let alpha = T::two() * amplitude(p) * (core_term(p.rc, r) - core_term(p.rs, r));
    let (ux, uy) = super::direction(dx, dy);
    (alpha * ux, alpha * uy)
}

pub fn potential<T: Float>(p: &PseudoJaffeValues<T>, x: T, y: T, s: T) -> T {
    let (_, _, r) = radius(p, x, y, s);
    let r2 = r * r;
    let term = |a: T| {
        let root = (a * a + r2).sqrt();
        root - a * (a + root).ln()
    };
    T::two() * amplitude(p) * (term(p.rc) - term(p.rs))
}

pub fn convergence<T: Float>(p: &PseudoJaffeValues<T>, x: T, y: T, s: T) -> T {
    let (_, _, r) = radius(p, x, y, s);
    let r2 = r * r;
    amplitude(p) * (T::one() / (p.rc * p.rc + r2).sqrt() - T::one() / (p.rs * p.rs + r2).sqrt())
}
