/// Gradient of a scalar field by second-order central differences
pub fn central_gradient(f: impl Fn(f64, f64) -> f64, x: f64, y: f64, h: f64) -> (f64, f64) {
    (
        (f(x + h, y) - f(x - h, y)) / (2.0 * h),
        (f(x, y + h) - f(x, y - h)) / (2.0 * h),
    )
}

/// Laplacian of a scalar field by the five-point stencil
pub fn central_laplacian(f: impl Fn(f64, f64) -> f64, x: f64, y: f64, h: f64) -> f64 {
    (f(x + h, y) + f(x - h, y) + f(x, y + h) + f(x, y - h) - 4.0 * f(x, y)) / (h * h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic() {
        let f = |x: f64, y: f64| x * x + 3.0 * x * y;
        let (gx, gy) = central_gradient(f, 1.0, 2.0, 1e-4);
        assert!((gx - 8.0).abs() < 1e-8);
        assert!((gy - 3.0).abs() < 1e-8);
        assert!((central_laplacian(f, 1.0, 2.0, 1e-3) - 2.0).abs() < 1e-5);
    }
}
