use crate::constants::{ARCSEC_TO_RAD, G_OVER_C2_MPC_PER_MSUN, RAD_TO_ARCSEC};
use crate::float_trait::Float;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointValues<T> {
    pub x0: T,
    pub y0: T,
    pub rein: T,
}

/// `alpha = Rein² (x, y) / (r + s)²`
pub fn reduced_deflection_angle<T: Float>(p: &PointValues<T>, x: T, y: T, s: T) -> (T, T) {
    let dx = x - p.x0;
    let dy = y - p.y0;
    let r = dx.hypot(dy) + s;
    if r == T::zero() {
        return (T::zero(), T::zero());
    }
    let factor = p.rein * p.rein / (r * r);
    (dx * factor, dy * factor)
}

/// `psi = Rein² ln(r + s)`
pub fn potential<T: Float>(p: &PointValues<T>, x: T, y: T, s: T) -> T {
    let r = (x - p.x0).hypot(y - p.y0) + s;
    p.rein * p.rein * super::clamped(r).ln()
}

/// The mass is a delta function, the convergence is zero everywhere on a grid
pub fn convergence<T: Float>(_p: &PointValues<T>, _x: T, _y: T) -> T {
    T::zero()
}

/// Einstein radius in arcsec of a point mass in Msun
pub fn mass_to_rein<T: Float>(mass: T, d_ls: T, d_l: T, d_s: T) -> T {
    (T::four() * T::cast(G_OVER_C2_MPC_PER_MSUN) * mass * d_ls / (d_l * d_s)).sqrt()
        * T::cast(RAD_TO_ARCSEC)
}

/// Point mass in Msun with the given Einstein radius in arcsec
pub fn rein_to_mass<T: Float>(rein: T, d_ls: T, d_l: T, d_s: T) -> T {
    let theta = rein * T::cast(ARCSEC_TO_RAD);
    theta * theta * d_l * d_s / (T::four() * T::cast(G_OVER_C2_MPC_PER_MSUN) * d_ls)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use strong_lensing_test_util::{central_gradient, random_positions};

    const P: PointValues<f64> = PointValues {
        x0: 0.2,
        y0: 0.1,
        rein: 0.8,
    };

    #[test]
    fn potential_gradient_is_deflection() {
        for (x, y) in random_positions(20, 20, 2.0) {
            if (x - P.x0).hypot(y - P.y0) < 0.05 {
                continue;
            }
            let (ax, ay) = reduced_deflection_angle(&P, x, y, 0.0);
            let (gx, gy) = central_gradient(|x, y| potential(&P, x, y, 0.0), x, y, 1e-6);
            assert_relative_eq!(ax, gx, epsilon = 1e-8, max_relative = 1e-4);
            assert_relative_eq!(ay, gy, epsilon = 1e-8, max_relative = 1e-4);
        }
    }

    #[test]
    fn einstein_ring_deflection() {
        let (ax, ay) = reduced_deflection_angle(&P, P.x0, P.y0 + P.rein, 0.0);
        assert_relative_eq!(ax, 0.0);
        assert_relative_eq!(ay, P.rein);
        assert_eq!(reduced_deflection_angle(&P, P.x0, P.y0, 0.0), (0.0, 0.0));
        assert!(potential(&P, P.x0, P.y0, 0.0).is_finite());
    }

    #[test]
    fn mass_rein_round_trip() {
        let (d_l, d_s, d_ls) = (1300.0, 1700.0, 800.0);
        for mass in [1e6, 3e10, 1e12] {
            let rein = mass_to_rein(mass, d_ls, d_l, d_s);
            assert_relative_eq!(rein_to_mass(rein, d_ls, d_l, d_s), mass, max_relative = 1e-12);
        }
        let mass = rein_to_mass(1.0, d_ls, d_l, d_s);
        assert_relative_eq!(mass_to_rein(mass, d_ls, d_l, d_s), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn solar_mass_lens_at_kiloparsec() {
        // a solar mass at 1 kpc lensing a source at 2 kpc has a ~2 mas Einstein radius
        let rein = mass_to_rein(1.0_f64, 1e-3, 1e-3, 2e-3);
        assert_relative_eq!(rein, 2.018e-3, max_relative = 1e-3);
    }
}
