use crate::cosmology::Cosmology;
use crate::lenses::context::LensContext;
use crate::lenses::func::time_delay_arcsec2_to_days;
use crate::lenses::lens::*;
use crate::lenses::profiles::{Profile, ProfileTrait};
use crate::param::{Parameter, Valid};

use ndarray::Zip;
use std::sync::Arc;

/// Mass profile at a single redshift
///
/// The lens name is the module its free parameters, including the redshift `z_l`, are looked
/// up under in a [ParamPack].
#[derive(Clone, Debug)]
pub struct ThinLens<T: Float> {
    name: String,
    cosmology: Arc<dyn Cosmology<T>>,
    pub z_l: Parameter<T>,
    pub profile: Profile<T>,
}

impl<T> ThinLens<T>
where
    T: Float,
{
    /// Lens with a free redshift
    pub fn new(
        name: impl Into<String>,
        cosmology: Arc<dyn Cosmology<T>>,
        profile: impl Into<Profile<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            cosmology,
            z_l: Parameter::new("z_l", "unitless", None).with_valid(Valid::at_least(0.0)),
            profile: profile.into(),
        }
    }

    /// Fix the lens redshift
    pub fn with_z_l(mut self, z_l: T) -> Self {
        self.z_l.set_value(z_l);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cosmology(&self) -> &Arc<dyn Cosmology<T>> {
        &self.cosmology
    }

    /// Redshift followed by the profile parameters
    pub fn params(&self) -> Vec<&Parameter<T>> {
        let mut params = vec![&self.z_l];
        params.extend(self.profile.params());
        params
    }

    pub fn resolve_z_l(&self, pack: &ParamPack<T>) -> Result<T, LensError> {
        self.z_l.resolve_scalar(&self.name, pack)
    }

    /// Distances of the lens and a source behind it
    pub fn context(&self, z_s: T, pack: &ParamPack<T>) -> Result<LensContext<'_, T>, LensError> {
        let z_l = self.resolve_z_l(pack)?;
        if !(z_s > z_l) {
            return Err(LensError::InvalidConfiguration(format!(
                "source redshift {z_s} must be larger than the redshift {z_l} of lens {}",
                self.name
            )));
        }
        Ok(LensContext::new(self.cosmology.as_ref(), z_l, z_s))
    }

    pub fn convergence(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let ctx = self.context(z_s, pack)?;
        self.profile.convergence(&self.name, x, y, &ctx, pack)
    }

    pub fn potential(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let ctx = self.context(z_s, pack)?;
        self.profile.potential(&self.name, x, y, &ctx, pack)
    }

    /// Arrival time delay in days relative to an unlensed ray
    ///
    /// The Fermat potential `|theta - beta|² / 2 - psi` times `(1 + z_l) d_l d_s / (c d_ls)`.
    pub fn time_delay(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let ctx = self.context(z_s, pack)?;
        let (ax, ay) = self
            .profile
            .reduced_deflection_angle(&self.name, x.view(), y.view(), &ctx, pack)?;
        let mut fermat = self.profile.potential(&self.name, x, y, &ctx, pack)?;
        let factor = time_delay_arcsec2_to_days(ctx.d_l(), ctx.d_s(), ctx.d_ls(), ctx.z_l);
        Zip::from(&mut fermat)
            .and(&ax)
            .and(&ay)
            .for_each(|f, &ax, &ay| *f = ((ax * ax + ay * ay) * T::half() - *f) * factor);
        Ok(fermat)
    }
}

impl<T> LensTrait<T> for ThinLens<T>
where
    T: Float,
{
    fn reduced_deflection_angle(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let ctx = self.context(z_s, pack)?;
        self.profile
            .reduced_deflection_angle(&self.name, x, y, &ctx, pack)
    }

    fn physical_deflection_angle(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let ctx = self.context(z_s, pack)?;
        self.profile
            .physical_deflection_angle(&self.name, x, y, &ctx, pack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::convolve::ConvolutionMode;
    use crate::cosmology::FlatLambdaCdm;
    use crate::lenses::profiles::{
        Epl, ExternalShear, MassSheet, Multipole, Nfw, PixelatedConvergence, Point, PseudoJaffe,
        Sie, Sis, Tnfw, TnfwMassConvention,
    };

    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::{Array2, array};

    fn sis_lens() -> ThinLens<f64> {
        ThinLens::new("sis", Arc::new(FlatLambdaCdm::<f64>::default()), Sis::new())
    }

    fn pack() -> ParamPack<f64> {
        ParamPack::new()
            .with("sis", "z_l", 0.5)
            .with("sis", "x0", 0.0)
            .with("sis", "y0", 0.0)
            .with("sis", "Rein", 1.0)
    }

    #[test]
    fn raytrace_subtracts_alpha() {
        let lens = sis_lens();
        let x = array![[2.0, 0.5], [-1.0, 3.0]];
        let y = array![[0.0, 0.5], [1.0, -4.0]];
        let (ax, ay) = lens.alpha(x.view(), y.view(), 1.0, &pack()).unwrap();
        let (bx, by) = lens.raytrace(x.view(), y.view(), 1.0, &pack()).unwrap();
        assert_abs_diff_eq!(&x - &ax, bx, epsilon = 1e-15);
        assert_abs_diff_eq!(&y - &ay, by, epsilon = 1e-15);
        // |alpha| = Rein everywhere
        assert_relative_eq!(bx[[1, 1]], 3.0 - 0.6, max_relative = 1e-12);
        assert_relative_eq!(by[[1, 1]], -4.0 + 0.8, max_relative = 1e-12);
    }

    fn scalar_value(name: &str) -> f64 {
        match name {
            "x0" => 0.05,
            "y0" => -0.02,
            "q" => 0.8,
            "phi" | "phi_m" => 0.3,
            "Rein" => 1.0,
            "t" => 1.1,
            "gamma_1" => 0.03,
            "gamma_2" => -0.02,
            "kappa" => 0.1,
            "a_m" => 0.05,
            "mass" => 1e12,
            "Rc" => 0.1,
            "Rs" => 2.0,
            "tau" => 5.0,
            other => panic!("no value for parameter {other}"),
        }
    }

    #[test]
    fn raytrace_subtracts_alpha_for_every_profile() {
        let cosmology: Arc<dyn Cosmology<f64>> = Arc::new(FlatLambdaCdm::<f64>::default());
        let profiles: Vec<Profile<f64>> = vec![
            Epl::new().into(),
            ExternalShear::new().into(),
            MassSheet::new().into(),
            Multipole::new(3).into(),
            Nfw::new().into(),
            PixelatedConvergence::new(0.2, (8, 8), ConvolutionMode::Fft)
                .unwrap()
                .into(),
            Point::new().into(),
            PseudoJaffe::new().into(),
            Sie::new().into(),
            Sis::new().into(),
            Tnfw::new(TnfwMassConvention::TotalMass).into(),
        ];
        let x = array![[0.7, -1.3], [0.2, 2.1]];
        let y = array![[0.4, 0.9], [-0.6, -0.3]];
        for profile in profiles {
            let lens = ThinLens::new("lens", cosmology.clone(), profile).with_z_l(0.5);
            let mut pack = ParamPack::new();
            for param in lens.params().into_iter().filter(|p| p.is_free()) {
                match param.name() {
                    "kappa_map" => pack.insert(
                        "lens",
                        "kappa_map",
                        Array2::from_shape_fn((8, 8), |(i, j)| 0.01 * (i + j) as f64),
                    ),
                    name => pack.insert("lens", name, scalar_value(name)),
                }
            }
            let name = lens.profile.name();
            let (ax, ay) = lens.alpha(x.view(), y.view(), 1.5, &pack).unwrap();
            assert!(ax.iter().chain(ay.iter()).all(|a| a.is_finite()), "{name}");
            let (bx, by) = lens.raytrace(x.view(), y.view(), 1.5, &pack).unwrap();
            assert_abs_diff_eq!(&x - &ax, bx, epsilon = 1e-12);
            assert_abs_diff_eq!(&y - &ay, by, epsilon = 1e-12);
        }
    }

    #[test]
    fn source_in_front_of_the_lens() {
        let lens = sis_lens();
        let x = array![[1.0]];
        assert!(matches!(
            lens.raytrace(x.view(), x.view(), 0.4, &pack()),
            Err(LensError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn free_redshift_must_be_supplied() {
        let lens = sis_lens();
        let x = array![[1.0]];
        let mut pack = pack();
        pack.remove("sis", "z_l");
        assert_eq!(
            lens.alpha(x.view(), x.view(), 1.0, &pack).unwrap_err(),
            LensError::UnresolvedParameter {
                key: "sis.z_l".to_owned()
            }
        );
        let fixed = sis_lens().with_z_l(0.5);
        assert!(fixed.alpha(x.view(), x.view(), 1.0, &pack).is_ok());
        assert_eq!(fixed.params().len(), 4);
    }

    #[test]
    fn physical_deflection_of_isothermal_sphere() {
        let lens = sis_lens();
        let x = array![[1.5]];
        let y = array![[0.0]];
        let (ax, _) = lens.alpha(x.view(), y.view(), 1.0, &pack()).unwrap();
        let (px, _) = lens
            .physical_deflection_angle(x.view(), y.view(), 1.0, &pack())
            .unwrap();
        let ctx = lens.context(1.0, &pack()).unwrap();
        assert_relative_eq!(px[[0, 0]], ax[[0, 0]] * ctx.d_s() / ctx.d_ls(), max_relative = 1e-12);
    }

    #[test]
    fn isothermal_time_delay() {
        let lens = sis_lens();
        // images on both sides of the lens for a source at beta = 0.2
        let x = array![[1.2, -0.8]];
        let y = array![[0.0, 0.0]];
        let delay = lens.time_delay(x.view(), y.view(), 2.0, &pack()).unwrap();
        let ctx = lens.context(2.0, &pack()).unwrap();
        let factor = time_delay_arcsec2_to_days(ctx.d_l(), ctx.d_s(), ctx.d_ls(), 0.5);
        // Fermat potential difference of an SIS is 2 beta Rein
        assert_relative_eq!(
            delay[[0, 1]] - delay[[0, 0]],
            2.0 * 0.2 * factor,
            max_relative = 1e-10
        );
    }

    #[test]
    fn tnfw_physical_deflection_does_not_depend_on_the_source() {
        let lens = ThinLens::new(
            "halo",
            Arc::new(FlatLambdaCdm::<f64>::default()),
            Tnfw::new(TnfwMassConvention::TotalMass),
        )
        .with_z_l(0.3);
        let pack = ParamPack::new()
            .with("halo", "x0", 0.0)
            .with("halo", "y0", 0.0)
            .with("halo", "mass", 1e13)
            .with("halo", "Rs", 5.0)
            .with("halo", "tau", 4.0);
        let x = array![[0.7, 3.0]];
        let y = array![[0.2, -1.0]];
        let (a1, b1) = lens
            .physical_deflection_angle(x.view(), y.view(), 1.0, &pack)
            .unwrap();
        let (a2, b2) = lens
            .physical_deflection_angle(x.view(), y.view(), 2.5, &pack)
            .unwrap();
        assert_abs_diff_eq!(a1, a2, epsilon = 1e-12);
        assert_abs_diff_eq!(b1, b2, epsilon = 1e-12);
    }
}
