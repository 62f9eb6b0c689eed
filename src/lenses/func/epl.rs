//! Elliptical power law, deflection by the series of Tessore & Metcalf (2015)

use crate::float_trait::Float;
use crate::geometry::{derotate, translate_rotate};

use num_complex::Complex;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EplValues<T> {
    pub x0: T,
    pub y0: T,
    /// Axis ratio, `(0, 1]`
    pub q: T,
    /// Position angle, radians
    pub phi: T,
    /// Einstein radius, exact for `q = 1`
    pub rein: T,
    /// Power-law slope `gamma - 1`, `(0, 2)`
    pub t: T,
}

/// Partial sum `R omega(phi)` of the angular series, `n_iter` terms starting from `z`
fn r_omega<T: Float>(z: Complex<T>, t: T, q: T, n_iter: usize) -> Complex<T> {
    let f = (T::one() - q) / (T::one() + q);
    let rotation = z / z.conj();
    let two_minus_t = T::two() - t;
    let mut omega = z;
    let mut sum = z;
    for i in 1..n_iter {
        let two_i = T::two() * T::cast_usize(i);
        let factor = (two_i - two_minus_t) / (two_i + two_minus_t);
        omega = rotation * omega * (-f * factor);
        sum = sum + omega;
    }
    sum
}

/// Deflection in the frame aligned with the major axis
fn lens_frame_deflection<T: Float>(p: &EplValues<T>, x: T, y: T, n_iter: usize) -> (T, T) {
    let z = Complex::new(p.q * x, y);
    let r = z.norm();
    if r == T::zero() {
        return (T::zero(), T::zero());
    }
    let scale = T::two() / (T::one() + p.q) * (p.rein * p.q.sqrt() / r).powf(p.t);
    let alpha = r_omega(z, p.t, p.q, n_iter) * scale;
    (alpha.re, alpha.im)
}

pub fn reduced_deflection_angle<T: Float>(p: &EplValues<T>, x: T, y: T, n_iter: usize) -> (T, T) {
    let (x, y) = translate_rotate(x, y, p.x0, p.y0, p.phi);
    let (ax, ay) = lens_frame_deflection(p, x, y, n_iter);
    derotate(ax, ay, p.phi)
}

/// `psi = (x alpha_x + y alpha_y) / (2 - t)`
pub fn potential<T: Float>(p: &EplValues<T>, x: T, y: T, n_iter: usize) -> T {
    let (x, y) = translate_rotate(x, y, p.x0, p.y0, p.phi);
    let (ax, ay) = lens_frame_deflection(p, x, y, n_iter);
    (x * ax + y * ay) / (T::two() - p.t)
}

/// `kappa = (2 - t) / 2 (Rein sqrt(q) / sqrt(q² (x² + s²) + y²))^t`
pub fn convergence<T: Float>(p: &EplValues<T>, x: T, y: T, s: T) -> T {
    let (x, y) = translate_rotate(x, y, p.x0, p.y0, p.phi);
    let psi = (p.q * p.q * (x * x + s * s) + y * y).sqrt();
    (T::two() - p.t) * T::half() * (p.rein * p.q.sqrt() / super::clamped(psi)).powf(p.t)
}
