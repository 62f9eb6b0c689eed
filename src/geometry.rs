//! Sky-plane coordinate helpers

use crate::float_trait::Float;

use ndarray::Array2;

/// Shift the origin to `(x0, y0)` and rotate the axes by `phi` counter-clockwise
#[inline]
pub fn translate_rotate<T: Float>(x: T, y: T, x0: T, y0: T, phi: T) -> (T, T) {
    let dx = x - x0;
    let dy = y - y0;
    let (sin, cos) = phi.sin_cos();
    (dx * cos + dy * sin, -dx * sin + dy * cos)
}

/// Rotate a vector given in the frame rotated by `phi` back into the sky frame
#[inline]
pub fn derotate<T: Float>(vx: T, vy: T, phi: T) -> (T, T) {
    let (sin, cos) = phi.sin_cos();
    (vx * cos - vy * sin, vx * sin + vy * cos)
}

/// Pixel-centred coordinate grid
///
/// Returns `(x, y)` arrays of shape `(ny, nx)`, `x` varies along the columns and `y` along the
/// rows. Coordinates are in the units of `pixelscale` and centred on zero, so for an even
/// number of pixels no sample lies exactly at the origin.
pub fn meshgrid<T: Float>(pixelscale: T, nx: usize, ny: usize) -> (Array2<T>, Array2<T>) {
    let x_center = T::cast_usize(nx.saturating_sub(1)) * T::half();
    let y_center = T::cast_usize(ny.saturating_sub(1)) * T::half();
    let x = Array2::from_shape_fn((ny, nx), |(_, j)| {
        (T::cast_usize(j) - x_center) * pixelscale
    });
    let y = Array2::from_shape_fn((ny, nx), |(i, _)| {
        (T::cast_usize(i) - y_center) * pixelscale
    });
    (x, y)
}
