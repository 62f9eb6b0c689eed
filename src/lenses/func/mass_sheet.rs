use crate::float_trait::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassSheetValues<T> {
    pub x0: T,
    pub y0: T,
    /// Surface density in units of the critical density
    pub kappa: T,
}

pub fn reduced_deflection_angle<T: Float>(p: &MassSheetValues<T>, x: T, y: T) -> (T, T) {
    (p.kappa * (x - p.x0), p.kappa * (y - p.y0))
}

pub fn potential<T: Float>(p: &MassSheetValues<T>, x: T, y: T) -> T {
    let dx = x - p.x0;
    let dy = y - p.y0;
    p.kappa * (dx * dx + dy * dy) * T::half()
}

pub fn convergence<T: Float>(p: &MassSheetValues<T>, _x: T, _y: T) -> T {
    p.kappa
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use strong_lensing_test_util::{central_gradient, central_laplacian};

    #[test]
    fn potential_derivatives() {
        let p = MassSheetValues {
            x0: 0.3,
            y0: -0.1,
            kappa: 0.25,
        };
        let (ax, ay) = reduced_deflection_angle(&p, 1.0, 2.0);
        let (gx, gy) = central_gradient(|x, y| potential(&p, x, y), 1.0, 2.0, 1e-5);
        assert_relative_eq!(ax, gx, max_relative = 1e-8);
        assert_relative_eq!(ay, gy, max_relative = 1e-8);
        let laplacian = central_laplacian(|x, y| potential(&p, x, y), 1.0, 2.0, 1e-3);
        assert_relative_eq!(0.5 * laplacian, convergence(&p, 1.0, 2.0), max_relative = 1e-6);
    }
}
