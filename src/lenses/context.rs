use crate::cosmology::Cosmology;
use crate::float_trait::Float;

/// Redshifts and background cosmology a thin lens profile is evaluated with
///
/// Distances are evaluated on demand, purely angular profiles never touch the cosmology.
#[derive(Clone, Copy, Debug)]
pub struct LensContext<'a, T: Float> {
    pub cosmology: &'a dyn Cosmology<T>,
    pub z_l: T,
    pub z_s: T,
}

impl<'a, T: Float> LensContext<'a, T> {
    pub fn new(cosmology: &'a dyn Cosmology<T>, z_l: T, z_s: T) -> Self {
        Self {
            cosmology,
            z_l,
            z_s,
        }
    }

    /// Angular diameter distance to the lens, Mpc
    pub fn d_l(&self) -> T {
        self.cosmology.angular_diameter_distance(self.z_l)
    }

    /// Angular diameter distance to the source, Mpc
    pub fn d_s(&self) -> T {
        self.cosmology.angular_diameter_distance(self.z_s)
    }

    /// Angular diameter distance from the lens to the source, Mpc
    pub fn d_ls(&self) -> T {
        self.cosmology
            .angular_diameter_distance_z1z2(self.z_l, self.z_s)
    }

    /// Msun/Mpc²
    pub fn critical_surface_density(&self) -> T {
        self.cosmology.critical_surface_density(self.z_l, self.z_s)
    }

    /// Critical density at the lens redshift, Msun/Mpc³
    pub fn critical_density(&self) -> T {
        self.cosmology.critical_density(self.z_l)
    }
}
