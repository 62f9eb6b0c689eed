//! Background cosmology consumed by the physical lens profiles

use crate::constants::{C_KM_PER_S, G_MPC_KM2_PER_S2_MSUN, G_OVER_C2_MPC_PER_MSUN};
use crate::float_trait::Float;
use crate::quadrature::gauss_legendre;

use lazy_static::lazy_static;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

lazy_static! {
    static ref GAUSS_LEGENDRE_64: (Vec<f64>, Vec<f64>) = gauss_legendre(64);
}

/// Distances and densities of a homogeneous background
///
/// Distances are in Mpc, densities in Msun/Mpc³ and surface densities in Msun/Mpc². Only
/// [Cosmology::comoving_distance] and [Cosmology::critical_density] are required, other methods
/// assume a spatially flat universe.
pub trait Cosmology<T: Float>: Debug + Send + Sync {
    fn comoving_distance(&self, z: T) -> T;

    fn critical_density(&self, z: T) -> T;

    fn comoving_distance_z1z2(&self, z1: T, z2: T) -> T {
        self.comoving_distance(z2) - self.comoving_distance(z1)
    }

    fn angular_diameter_distance(&self, z: T) -> T {
        self.comoving_distance(z) / (T::one() + z)
    }

    fn angular_diameter_distance_z1z2(&self, z1: T, z2: T) -> T {
        self.comoving_distance_z1z2(z1, z2) / (T::one() + z2)
    }

    /// `c² / (4π G) d_s / (d_l d_ls)`
    fn critical_surface_density(&self, z_l: T, z_s: T) -> T {
        let d_l = self.angular_diameter_distance(z_l);
        let d_s = self.angular_diameter_distance(z_s);
        let d_ls = self.angular_diameter_distance_z1z2(z_l, z_s);
        d_s / (T::four() * T::PI() * T::cast(G_OVER_C2_MPC_PER_MSUN) * d_l * d_ls)
    }

    /// `(1 + z_l) d_l d_s / d_ls`
    fn time_delay_distance(&self, z_l: T, z_s: T) -> T {
        let d_l = self.angular_diameter_distance(z_l);
        let d_s = self.angular_diameter_distance(z_s);
        let d_ls = self.angular_diameter_distance_z1z2(z_l, z_s);
        (T::one() + z_l) * d_l * d_s / d_ls
    }
}

/// Spatially flat ΛCDM without radiation
///
/// `h0` is the Hubble constant in km/s/Mpc, `om_m` is the matter density parameter today.
/// The comoving distance is a 64-point Gauss-Legendre integral of `1 / E(z)`.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(bound = "T: Float")]
pub struct FlatLambdaCdm<T> {
    pub h0: T,
    pub om_m: T,
}

impl<T: Float> FlatLambdaCdm<T> {
    pub fn new(h0: T, om_m: T) -> Self {
        assert!(h0 > T::zero(), "Hubble constant must be positive");
        assert!(
            om_m >= T::zero() && om_m <= T::one(),
            "matter density parameter must be in [0, 1]"
        );
        Self { h0, om_m }
    }

    /// `E(z) = H(z) / H0`
    pub fn e(&self, z: T) -> T {
        let a_inv = T::one() + z;
        (self.om_m * a_inv * a_inv * a_inv + T::one() - self.om_m).sqrt()
    }

    /// Hubble distance `c / H0`
    pub fn hubble_distance(&self) -> T {
        T::cast(C_KM_PER_S) / self.h0
    }
}

impl<T: Float> Default for FlatLambdaCdm<T> {
    /// Planck 2018 values
    fn default() -> Self {
        Self::new(T::cast(67.66), T::cast(0.30966))
    }
}

impl<T: Float> Cosmology<T> for FlatLambdaCdm<T> {
    fn comoving_distance(&self, z: T) -> T {
        let (nodes, weights) = &*GAUSS_LEGENDRE_64;
        let half_z = z * T::half();
        let integral: T = nodes
            .iter()
            .zip(weights.iter())
            .map(|(&x, &w)| T::cast(w) / self.e(half_z * (T::cast(x) + T::one())))
            .sum();
        self.hubble_distance() * half_z * integral
    }

    /// `3 H(z)² / (8π G)`
    fn critical_density(&self, z: T) -> T {
        let h = self.h0 * self.e(z);
        T::three() * h * h / (T::cast(8.0) * T::PI() * T::cast(G_MPC_KM2_PER_S2_MSUN))
    }
}
