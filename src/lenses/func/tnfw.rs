//! Truncated NFW profile of Baltz, Marshall & Oguri (2009)
//!
//! The dimensionless radius is `g = r / Rs` and the truncation radius is `tau Rs`. Helper
//! functions have a removable singularity at `g = 1`, where they switch to a Taylor expansion.

use crate::constants::{ARCSEC_TO_RAD, G_OVER_C2_MPC_PER_MSUN, RAD_TO_ARCSEC};
use crate::float_trait::Float;

/// Half-width of the Taylor band of [f_helper]
const F_BAND: f64 = 1e-2;
/// Half-width of the Taylor band of [p_helper]
const P_BAND: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TnfwValues<T> {
    pub x0: T,
    pub y0: T,
    /// Scale radius, arcsec
    pub rs: T,
    /// Truncation radius in units of the scale radius
    pub tau: T,
    /// Mass normalisation, Msun, see [m0_totmass] and [m0_scalemass]
    pub m0: T,
}

/// Baltz et al. (2009) equation A.5
pub fn f_helper<T: Float>(g: T) -> T {
    let one = T::one();
    let band = T::cast(F_BAND);
    if g < one - band {
        (one / g).acosh() / (one - g * g).sqrt()
    } else if g > one + band {
        (one / g).acos() / (g * g - one).sqrt()
    } else {
        let e = g - one;
        one - T::two() * e / T::three() + T::cast(7.0) * e * e / T::cast(15.0)
    }
}

/// `(1 - F(g)) / (g² - 1)`, finite at `g = 1`
fn one_minus_f_over_g2_minus_1<T: Float>(g: T) -> T {
    let e = g - T::one();
    if e > -T::cast(F_BAND) && e < T::cast(F_BAND) {
        (T::two() / T::three() - T::cast(7.0) * e / T::cast(15.0)) / (T::two() + e)
    } else {
        (T::one() - f_helper(g)) / (g * g - T::one())
    }
}

/// Baltz et al. (2009) equation A.6
pub fn l_helper<T: Float>(g: T, tau: T) -> T {
    (g / (tau + (tau * tau + g * g).sqrt())).ln()
}

/// Angular part of the potential, `-arccosh(1/g)²` inside and `arccos(1/g)²` outside
pub fn p_helper<T: Float>(g: T) -> T {
    let one = T::one();
    let band = T::cast(P_BAND);
    if g < one - band {
        let a = (one / g).acosh();
        -a * a
    } else if g > one + band {
        let a = (one / g).acos();
        a * a
    } else {
        let e = g - one;
        T::two() * e - T::cast(5.0) * e * e / T::three()
    }
}

/// Scale density of an NFW halo with concentration `c`, Msun/Mpc³
pub fn scale_density<T: Float>(c: T, critical_density: T, delta: T) -> T {
    delta / T::three() * critical_density * c * c * c
        / ((T::one() + c).ln() - c / (T::one() + c))
}

/// Normalisation giving the total mass `mass` of the truncated profile
pub fn m0_totmass<T: Float>(mass: T, tau: T) -> T {
    let t2 = tau * tau;
    mass * (t2 + T::one()) * (t2 + T::one())
        / (t2 * ((t2 - T::one()) * tau.ln() + T::PI() * tau - (t2 + T::one())))
}

/// Normalisation equal to the scale mass `4π Rs³ rho_s` of the untruncated NFW
pub fn m0_scalemass<T: Float>(rs: T, c: T, critical_density: T, d_l: T, delta: T) -> T {
    let rs_mpc = rs * d_l * T::cast(ARCSEC_TO_RAD);
    T::four() * T::PI() * rs_mpc * rs_mpc * rs_mpc * scale_density(c, critical_density, delta)
}

/// Concentration `r_delta / Rs` of a halo of mass `mass` within `r_delta`
pub fn concentration<T: Float>(mass: T, rs: T, critical_density: T, d_l: T, delta: T) -> T {
    let r_delta =
        (T::three() * mass / (T::four() * T::PI() * delta * critical_density)).powf(T::one() / T::three());
    r_delta / (rs * d_l * T::cast(ARCSEC_TO_RAD))
}

/// Projected mass within radius `r` arcsec, Baltz et al. (2009) equation A.11
pub fn mass_enclosed_2d<T: Float>(r: T, rs: T, tau: T, m0: T) -> T {
    let g = r / rs;
    let t2 = tau * tau;
    let f = f_helper(g);
    let l = l_helper(g, tau);
    let a1 = t2 / ((t2 + T::one()) * (t2 + T::one()));
    let a2 = (t2 + T::one() + T::two() * (g * g - T::one())) * f;
    let a3 = tau * T::PI();
    let a4 = (t2 - T::one()) * tau.ln();
    let a5 = (t2 + g * g).sqrt() * (-T::PI() + (t2 - T::one()) * l / tau);
    m0 * a1 * (a2 + a3 + a4 + a5)
}

/// Deflection seen from the observer, arcsec
pub fn physical_deflection_angle<T: Float>(p: &TnfwValues<T>, x: T, y: T, d_l: T, s: T) -> (T, T) {
    let dx = x - p.x0;
    let dy = y - p.y0;
    let r = dx.hypot(dy) + s;
    if r == T::zero() {
        return (T::zero(), T::zero());
    }
    let alpha = T::four() * T::cast(G_OVER_C2_MPC_PER_MSUN) * mass_enclosed_2d(r, p.rs, p.tau, p.m0)
        / (r * d_l * T::cast(ARCSEC_TO_RAD))
        * T::cast(RAD_TO_ARCSEC);
    let (ux, uy) = super::direction(dx, dy);
    (alpha * ux, alpha * uy)
}

pub fn reduced_deflection_angle<T: Float>(
    p: &TnfwValues<T>,
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

/// Baltz et al. (2009) equation A.8
pub fn convergence<T: Float>(
    p: &TnfwValues<T>,
    x: T,
    y: T,
    critical_surface_density: T,
    d_l: T,
    s: T,
) -> T {
    let r = (x - p.x0).hypot(y - p.y0) + s;
    let g = super::clamped(r) / p.rs;
    let t2 = p.tau * p.tau;
    let f = f_helper(g);
    let l = l_helper(g, p.tau);
    let rs_mpc = p.rs * d_l * T::cast(ARCSEC_TO_RAD);
    let scale = p.m0 / (T::two() * T::PI() * rs_mpc * rs_mpc);
    let root = (t2 + g * g).sqrt();
    let a1 = t2 / ((t2 + T::one()) * (t2 + T::one()));
    let a2 = (t2 + T::one()) * one_minus_f_over_g2_minus_1(g);
    let a3 = T::two() * f;
    let a4 = -T::PI() / root;
    let a5 = (t2 - T::one()) * l / (p.tau * root);
    a1 * (a2 + a3 + a4 + a5) * scale / critical_surface_density
}

/// Baltz et al. (2009) equation A.14, arcsec²
pub fn potential<T: Float>(p: &TnfwValues<T>, x: T, y: T, d_l: T, d_s: T, d_ls: T, s: T) -> T {
    let r = (x - p.x0).hypot(y - p.y0) + s;
    let g = super::clamped(r) / p.rs;
    let tau = p.tau;
    let t2 = tau * tau;
    let u = g * g;
    let f = f_helper(g);
    let l = l_helper(g, tau);
    let one = T::one();
    let two = T::two();
    let arcsec_to_rad = T::cast(ARCSEC_TO_RAD);

    let scale = two * p.m0 * T::cast(G_OVER_C2_MPC_PER_MSUN) * (d_ls / d_s)
        / (d_l * arcsec_to_rad * arcsec_to_rad);
    let root = (t2 + u).sqrt();
    let a1 = one / ((t2 + one) * (t2 + one));
    let a2 = two * T::PI() * t2 * (tau - root + tau * (tau + root).ln());
    let a3 = two * (t2 - one) * tau * root * l;
    let a4 = t2 * (t2 - one) * l * l;
    let a5 = T::four() * t2 * (u - one) * f;
    let a6 = t2 * (t2 - one) * p_helper(g);
    let a7 = t2 * ((t2 - one) * tau.ln() - t2 - one) * u.ln();
    let a8 = t2
        * ((t2 - one) * tau.ln() * (T::four() * tau).ln() + two * (tau / two).ln()
            - two * tau * (tau - T::PI()) * (two * tau).ln());
    scale * a1 * (a2 + a3 + a4 + a5 + a6 + a7 - a8)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use std::f64::consts::PI;
    use strong_lensing_test_util::central_gradient;

    const P: TnfwValues<f64> = TnfwValues {
        x0: 0.1,
        y0: 0.2,
        rs: 1.5,
        tau: 3.0,
        m0: 1e11,
    };
    const D_L: f64 = 1200.0;
    const D_S: f64 = 1700.0;
    const D_LS: f64 = 900.0;

    fn exact_f(g: f64) -> f64 {
        if g < 1.0 {
            (1.0 / g).acosh() / (1.0 - g * g).sqrt()
        } else {
            (1.0 / g).acos() / (g * g - 1.0).sqrt()
        }
    }

    fn exact_p(g: f64) -> f64 {
        if g < 1.0 {
            -(1.0 / g).acosh().powi(2)
        } else {
            (1.0 / g).acos().powi(2)
        }
    }

    #[test]
    fn f_branches_agree_at_switch_points() {
        for g in [1.0 - F_BAND, 1.0 + F_BAND] {
            assert!((f_helper(g) - exact_f(g)).abs() < 1e-6);
            assert!((f_helper(g - 1e-12) - f_helper(g + 1e-12)).abs() < 1e-6);
        }
        assert_eq!(f_helper(1.0), 1.0);
    }

    #[test]
    fn p_branches_agree_at_switch_points() {
        for g in [1.0 - P_BAND, 1.0 + P_BAND] {
            assert!((p_helper(g) - exact_p(g)).abs() < 1e-8);
            assert!((p_helper(g - 1e-12) - p_helper(g + 1e-12)).abs() < 1e-8);
        }
        assert_eq!(p_helper(1.0), 0.0);
    }

    #[test]
    fn potential_gradient_is_deflection() {
        // avoid stencils straddling a branch switch
        for g in [0.3, 0.7, 0.95, 1.005, 1.2, 2.0, 5.0] {
            let r = g * P.rs;
            for angle in [0.3, 2.0, 4.5] {
                let x = P.x0 + r * f64::cos(angle);
                let y = P.y0 + r * f64::sin(angle);
                let (ax, ay) = reduced_deflection_angle(&P, x, y, D_L, D_S, D_LS, 0.0);
                let (gx, gy) = central_gradient(
                    |x, y| potential(&P, x, y, D_L, D_S, D_LS, 0.0),
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
        let sigma_cr = 2.5e15;
        let rs_mpc = P.rs * D_L * ARCSEC_TO_RAD;
        for g in [0.2, 0.8, 1.0, 1.5, 4.0] {
            let r = g * P.rs;
            let h = 1e-6;
            let dm_dr = (mass_enclosed_2d(r + h, P.rs, P.tau, P.m0)
                - mass_enclosed_2d(r - h, P.rs, P.tau, P.m0))
                / (2.0 * h);
            let kappa = convergence(&P, P.x0 + r, P.y0, sigma_cr, D_L, 0.0);
            let sigma = dm_dr / (2.0 * PI * r) / (rs_mpc / P.rs).powi(2);
            assert_relative_eq!(kappa * sigma_cr, sigma, max_relative = 1e-4);
        }
    }

    #[test]
    fn convergence_is_continuous_at_scale_radius() {
        let kappa = |g: f64| convergence(&P, P.x0 + g * P.rs, P.y0, 2.5e15, D_L, 0.0);
        let at_one = kappa(1.0);
        assert!(at_one.is_finite());
        assert_relative_eq!(kappa(1.0 - 1e-3), at_one, max_relative = 3e-3);
        assert_relative_eq!(kappa(1.0 + 1e-3), at_one, max_relative = 3e-3);
        assert_relative_eq!(
            kappa(1.0 - F_BAND - 1e-9),
            kappa(1.0 - F_BAND + 1e-9),
            max_relative = 2e-4
        );
    }

    #[test]
    fn total_mass_normalisation() {
        let mass = 3e12;
        let m0 = m0_totmass(mass, P.tau);
        let enclosed = mass_enclosed_2d(1e3 * P.rs, P.rs, P.tau, m0);
        assert_relative_eq!(enclosed, mass, max_relative = 1e-4);
    }

    #[test]
    fn concentration_of_spherical_overdensity_mass() {
        let (c, rho_cr, delta) = (5.0, 1.3e11, 200.0);
        let r_delta = c * P.rs * D_L * ARCSEC_TO_RAD;
        let mass = 4.0 / 3.0 * PI * r_delta.powi(3) * delta * rho_cr;
        assert_relative_eq!(
            concentration(mass, P.rs, rho_cr, D_L, delta),
            c,
            max_relative = 1e-12
        );
        let m0 = m0_scalemass(P.rs, c, rho_cr, D_L, delta);
        assert_relative_eq!(
            m0 * ((1.0 + c).ln() - c / (1.0 + c)),
            mass,
            max_relative = 1e-12
        );
    }

    #[test]
    fn centre_is_finite() {
        assert_eq!(
            reduced_deflection_angle(&P, P.x0, P.y0, D_L, D_S, D_LS, 0.0),
            (0.0, 0.0)
        );
        assert!(convergence(&P, P.x0, P.y0, 2.5e15, D_L, 0.0).is_finite());
        assert!(potential(&P, P.x0, P.y0, D_L, D_S, D_LS, 0.0).is_finite());
    }
}
