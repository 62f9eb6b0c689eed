use crate::float_trait::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExternalShearValues<T> {
    pub x0: T,
    pub y0: T,
    pub gamma_1: T,
    pub gamma_2: T,
}

pub fn reduced_deflection_angle<T: Float>(p: &ExternalShearValues<T>, x: T, y: T) -> (T, T) {
    let dx = x - p.x0;
    let dy = y - p.y0;
    (
        p.gamma_1 * dx + p.gamma_2 * dy,
        p.gamma_2 * dx - p.gamma_1 * dy,
    )
}

pub fn potential<T: Float>(p: &ExternalShearValues<T>, x: T, y: T) -> T {
    let (ax, ay) = reduced_deflection_angle(p, x, y);
    ((x - p.x0) * ax + (y - p.y0) * ay) * T::half()
}

/// Shear is traceless
pub fn convergence<T: Float>(_p: &ExternalShearValues<T>, _x: T, _y: T) -> T {
    T::zero()
}
