use crate::float_trait::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MultipoleValues<T> {
    pub x0: T,
    pub y0: T,
    /// Strength of the perturbation
    pub a_m: T,
    /// Orientation, radians in `[0, 2π / m)`
    pub phi_m: T,
}

/// Polar coordinates around the centre: radius, `cos(phi)`, `sin(phi)` and `m (phi - phi_m)`
fn polar<T: Float>(p: &MultipoleValues<T>, m: usize, x: T, y: T) -> (T, T, T, T) {
    let dx = x - p.x0;
    let dy = y - p.y0;
    let r = dx.hypot(dy);
    let phi = dy.atan2(dx);
    let (sin, cos) = phi.sin_cos();
    (r, cos, sin, T::cast_usize(m) * (phi - p.phi_m))
}

fn amplitude<T: Float>(p: &MultipoleValues<T>, m: usize) -> T {
    let m = T::cast_usize(m);
    p.a_m / (T::one() - m * m)
}

pub fn reduced_deflection_angle<T: Float>(p: &MultipoleValues<T>, m: usize, x: T, y: T) -> (T, T) {
    let (r, cos, sin, delta) = polar(p, m, x, y);
    if r == T::zero() {
        return (T::zero(), T::zero());
    }
    let a = amplitude(p, m);
    let (sin_m, cos_m) = delta.sin_cos();
    let radial = a * cos_m;
    let tangential = T::cast_usize(m) * a * sin_m;
    (cos * radial + sin * tangential, sin * radial - cos * tangential)
}

/// `psi = r a_m / (1 - m²) cos(m (phi - phi_m))`
pub fn potential<T: Float>(p: &MultipoleValues<T>, m: usize, x: T, y: T) -> T {
    let (r, _, _, delta) = polar(p, m, x, y);
    r * amplitude(p, m) * delta.cos()
}

pub fn convergence<T: Float>(p: &MultipoleValues<T>, m: usize, x: T, y: T) -> T {
    let (r, _, _, delta) = polar(p, m, x, y);
    p.a_m * delta.cos() / (T::two() * super::clamped(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use strong_lensing_test_util::{central_gradient, central_laplacian, random_positions};

    const P: MultipoleValues<f64> = MultipoleValues {
        x0: 0.1,
        y0: 0.1,
        a_m: 0.05,
        phi_m: 0.3,
    };

    #[test]
    fn potential_gradient_is_deflection() {
        for m in [2, 3, 4] {
            for (x, y) in random_positions(40 + m as u64, 10, 2.0) {
                if (x - P.x0).hypot(y - P.y0) < 0.1 {
                    continue;
                }
                let (ax, ay) = reduced_deflection_angle(&P, m, x, y);
                let (gx, gy) = central_gradient(|x, y| potential(&P, m, x, y), x, y, 1e-6);
                assert_relative_eq!(ax, gx, epsilon = 1e-8, max_relative = 1e-4);
                assert_relative_eq!(ay, gy, epsilon = 1e-8, max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn potential_laplacian_is_twice_convergence() {
        for (x, y) in random_positions(50, 10, 2.0) {
            if (x - P.x0).hypot(y - P.y0) < 0.3 {
                continue;
            }
            let laplacian = central_laplacian(|x, y| potential(&P, 3, x, y), x, y, 1e-3);
            assert_relative_eq!(
                0.5 * laplacian,
                convergence(&P, 3, x, y),
                epsilon = 1e-5,
                max_relative = 1e-3
            );
        }
    }
}
