//! Navarro-Frenk-White profile, Wright & Brainerd (2000) and Golse & Kneib (2002)
//!
//! The dimensionless radius is `x = r / Rs`. Every helper has an inner branch, an outer branch
//! and a Taylor expansion in a narrow band around `x = 1`.

use crate::constants::{ARCSEC_TO_RAD, G_OVER_C2_MPC_PER_MSUN, RAD_TO_ARCSEC};
use crate::float_trait::Float;

/// Half-width of the Taylor band around `x = 1`
const BAND: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NfwValues<T> {
    pub x0: T,
    pub y0: T,
    /// Scale radius, arcsec
    pub rs: T,
    /// Scale density, Msun/Mpc³, see [super::tnfw::scale_density]
    pub rho_s: T,
}

#[inline]
fn in_band<T: Float>(x: T) -> bool {
    let band = T::cast(BAND);
    x > T::one() - band && x < T::one() + band
}

/// `1 - arccosh(1/x) / sqrt(1 - x²)` inside, `1 - arccos(1/x) / sqrt(x² - 1)` outside
pub fn f<T: Float>(x: T) -> T {
    let one = T::one();
    if in_band(x) {
        let e = x - one;
        T::two() * e / T::three() - T::cast(7.0) * e * e / T::cast(15.0)
    } else if x < one {
        one - (one / x).acosh() / (one - x * x).sqrt()
    } else {
        one - (one / x).acos() / (x * x - one).sqrt()
    }
}

/// Shape of the potential, `ln²(x/2) - arccosh²(1/x)` inside and `ln²(x/2) + arccos²(1/x)` outside
pub fn g<T: Float>(x: T) -> T {
    let one = T::one();
    let l = (x / T::two()).ln();
    let angular = if in_band(x) {
        let e = x - one;
        T::two() * e - T::cast(5.0) * e * e / T::three()
    } else if x < one {
        let a = (one / x).acosh();
        -a * a
    } else {
        let a = (one / x).acos();
        a * a
    };
    l * l + angular
}

/// Shape of the projected enclosed mass, `ln(x/2) + 1 - f(x)`
pub fn h<T: Float>(x: T) -> T {
    let one = T::one();
    let l = (x / T::two()).ln();
    if in_band(x) {
        let e = x - one;
        l + one - T::two() * e / T::three() + T::cast(7.0) * e * e / T::cast(15.0)
    } else if x < one {
        l + (one / x).acosh() / (one - x * x).sqrt()
    } else {
        l + (one / x).acos() / (x * x - one).sqrt()
    }
}

/// `f(x) / (x² - 1)`, finite at `x = 1`
fn surface_density_shape<T: Float>(x: T) -> T {
    if in_band(x) {
        let e = x - T::one();
        (T::two() / T::three() - T::cast(7.0) * e / T::cast(15.0)) / (T::two() + e)
    } else {
        f(x) / (x * x - T::one())
    }
}

/// Projected mass within radius `r` arcsec, Msun
pub fn mass_enclosed_2d<T: Float>(r: T, rs: T, rho_s: T, d_l: T) -> T {
    let rs_mpc = rs * d_l * T::cast(ARCSEC_TO_RAD);
    T::four() * T::PI() * rho_s * rs_mpc * rs_mpc * rs_mpc * h(r / rs)
}

/// Deflection seen from the observer, arcsec
pub fn physical_deflection_angle<T: Float>(p: &NfwValues<T>, x: T, y: T, d_l: T, s: T) -> (T, T) {
    let dx = x - p.x0;
    let dy = y - p.y0;
    let r = dx.hypot(dy) + s;
    if r == T::zero() {
        return (T::zero(), T::zero());
    }
    let alpha = T::four() * T::cast(G_OVER_C2_MPC_PER_MSUN) * mass_enclosed_2d(r, p.rs, p.rho_s, d_l)
        / (r * d_l * T::cast(ARCSEC_TO_RAD))
        * T::cast(RAD_TO_ARCSEC);
    let (ux, uy) = super::direction(dx, dy);
    (alpha * ux, alpha * uy)
}

pub fn reduced_deflection_angle<T: Float>(
    p: &NfwValues<T>,
    x: T,
    y: T,
    d_l: T,
    d_s: T,
    d_ls: T,
    s: T,
) -> (T, T) {
    let (ax, ay) = physical_deflection_angle(p, x, y, d_l, s);
    super::reduced_from_physical_deflection_angle(ax, ay, d_s, d_ls)
}

/// `2 rho_s Rs f(x) / (x² - 1) / Sigma_cr`
pub fn convergence<T: Float>(
    p: &NfwValues<T>,
    x: T,
    y: T,
    critical_surface_density: T,
    d_l: T,
    s: T,
) -> T {
    let r = (x - p.x0).hypot(y - p.y0) + s;
    let rs_mpc = p.rs * d_l * T::cast(ARCSEC_TO_RAD);
    T::two() * p.rho_s * rs_mpc * surface_density_shape(super::clamped(r) / p.rs)
        / critical_surface_density
}

/// `2 kappa_s Rs² g(x)`, arcsec²
pub fn potential<T: Float>(p: &NfwValues<T>, x: T, y: T, d_l: T, d_s: T, d_ls: T, s: T) -> T {
    let r = (x - p.x0).hypot(y - p.y0) + s;
    let rs_mpc = p.rs * d_l * T::cast(ARCSEC_TO_RAD);
    let kappa_s =
        T::four() * T::PI() * T::cast(G_OVER_C2_MPC_PER_MSUN) * p.rho_s * rs_mpc * d_l * d_ls / d_s;
    T::two() * kappa_s * p.rs * p.rs * g(super::clamped(r) / p.rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::lenses::func::tnfw::scale_density;

    use approx::assert_relative_eq;
    use std::f64::consts::PI;
    use strong_lensing_test_util::central_gradient;

    const D_L: f64 = 1200.0;
    const D_S: f64 = 1700.0;
    const D_LS: f64 = 900.0;

    fn values() -> NfwValues<f64> {
        NfwValues {
            x0: 0.1,
            y0: 0.2,
            rs: 1.5,
            rho_s: scale_density(5.0, 1.3e11, 200.0),
        }
    }

    fn exact_f(x: f64) -> f64 {
        if x < 1.0 {
            1.0 - (1.0 / x).acosh() / (1.0 - x * x).sqrt()
        } else {
            1.0 - (1.0 / x).acos() / (x * x - 1.0).sqrt()
        }
    }

    fn exact_g(x: f64) -> f64 {
        let l = (x / 2.0).ln();
        if x < 1.0 {
            l * l - (1.0 / x).acosh().powi(2)
        } else {
            l * l + (1.0 / x).acos().powi(2)
        }
    }

    fn exact_h(x: f64) -> f64 {
        (x / 2.0).ln() + 1.0 - exact_f(x)
    }

    #[test]
    fn helpers_are_continuous_at_the_band_edges() {
        let helpers: [(fn(f64) -> f64, fn(f64) -> f64); 3] =
            [(f, exact_f), (g, exact_g), (h, exact_h)];
        for x in [1.0 - BAND, 1.0 + BAND] {
            for (helper, exact) in helpers {
                assert!((helper(x) - exact(x)).abs() < 1e-8);
                assert!((helper(x - 1e-12) - helper(x + 1e-12)).abs() < 1e-8);
            }
        }
        assert_eq!(f(1.0), 0.0);
        assert_relative_eq!(h(1.0), 1.0 - 2.0_f64.ln());
        assert_relative_eq!(g(1.0), 2.0_f64.ln().powi(2));
    }

    #[test]
    fn potential_gradient_is_deflection() {
        let p = values();
        // avoid stencils straddling a branch switch
        for x_scaled in [0.3, 0.7, 0.95, 1.005, 1.2, 2.0, 5.0] {
            let r = x_scaled * p.rs;
            for angle in [0.3, 2.0, 4.5] {
                let x = p.x0 + r * f64::cos(angle);
                let y = p.y0 + r * f64::sin(angle);
                let (ax, ay) = reduced_deflection_angle(&p, x, y, D_L, D_S, D_LS, 0.0);
                let (gx, gy) = central_gradient(
                    |x, y| potential(&p, x, y, D_L, D_S, D_LS, 0.0),
                    x,
                    y,
                    1e-5,
                );
                assert_relative_eq!(ax, gx, epsilon = 1e-8, max_relative = 1e-4);
                assert_relative_eq!(ay, gy, epsilon = 1e-8, max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn convergence_is_enclosed_mass_derivative() {
        let p = values();
        let sigma_cr = 2.5e15;
        let rs_mpc = p.rs * D_L * ARCSEC_TO_RAD;
        for x_scaled in [0.2, 0.8, 1.0, 1.5, 4.0] {
            let r = x_scaled * p.rs;
            let step = 1e-6;
            let dm_dr = (mass_enclosed_2d(r + step, p.rs, p.rho_s, D_L)
                - mass_enclosed_2d(r - step, p.rs, p.rho_s, D_L))
                / (2.0 * step);
            let kappa = convergence(&p, p.x0 + r, p.y0, sigma_cr, D_L, 0.0);
            let sigma = dm_dr / (2.0 * PI * r) / (rs_mpc / p.rs).powi(2);
            assert_relative_eq!(kappa * sigma_cr, sigma, max_relative = 1e-4);
        }
    }

    #[test]
    fn convergence_is_continuous_at_scale_radius() {
        let p = values();
        let kappa = |x: f64| convergence(&p, p.x0 + x * p.rs, p.y0, 2.5e15, D_L, 0.0);
        let at_one = kappa(1.0);
        assert!(at_one.is_finite());
        assert_relative_eq!(
            kappa(1.0 - BAND - 1e-9),
            kappa(1.0 - BAND + 1e-9),
            max_relative = 1e-5
        );
        assert_relative_eq!(
            kappa(1.0 + BAND - 1e-9),
            kappa(1.0 + BAND + 1e-9),
            max_relative = 1e-5
        );
        assert_relative_eq!(kappa(1.0 + 1e-4), at_one, max_relative = 1e-3);
    }

    #[test]
    fn centre_is_finite() {
        let p = values();
        assert_eq!(
            reduced_deflection_angle(&p, p.x0, p.y0, D_L, D_S, D_LS, 0.0),
            (0.0, 0.0)
        );
        assert!(convergence(&p, p.x0, p.y0, 2.5e15, D_L, 0.0).is_finite());
        assert!(potential(&p, p.x0, p.y0, D_L, D_S, D_LS, 0.0).is_finite());
    }
}
