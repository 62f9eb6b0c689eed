use crate::lenses::func::pseudo_jaffe::{self, PseudoJaffeValues};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
Pseudo-Jaffe profile, an isothermal sphere with a core and a truncation

$$
\kappa = \kappa_0 \frac{R_c R_s}{R_s - R_c}
\left(\frac{1}{\sqrt{R_c^2 + R^2}} - \frac{1}{\sqrt{R_s^2 + R^2}}\right),
\quad \kappa_0 = \frac{M}{2 \pi \Sigma_\mathrm{cr} R_c R_s}
$$

where $M$ is the total mass, $R_c$ the core radius and $R_s$ the scale radius. The central
convergence depends on the lens and source distances through $\Sigma_\mathrm{cr}$.

- Parameters: `x0`, `y0`, `mass` (Msun), `Rc` and `Rs` (arcsec, must differ)
- Configuration: softening `s`
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct PseudoJaffe<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub mass: Parameter<T>,
    pub core_radius: Parameter<T>,
    pub scale_radius: Parameter<T>,
    s: T,
}

impl<T> PseudoJaffe<T>
where
    T: Float,
{
    pub fn new() -> Self {
        let (x0, y0) = center_params();
        Self {
            x0,
            y0,
            mass: Parameter::new("mass", "Msun", None).with_valid(Valid::at_least(0.0)),
            core_radius: Parameter::new("Rc", "arcsec", None).with_valid(Valid::greater_than(0.0)),
            scale_radius: Parameter::new("Rs", "arcsec", None)
                .with_valid(Valid::greater_than(0.0)),
            s: T::zero(),
        }
    }

    pub fn with_softening(mut self, s: T) -> Self {
        self.s = s;
        self
    }

    pub fn softening(&self) -> T {
        self.s
    }

    /// Resolved centre, mass, core and scale radii
    fn resolve(&self, module: &str, pack: &ParamPack<T>) -> Result<(T, T, T, T, T), LensError> {
        let rc = self.core_radius.resolve_scalar(module, pack)?;
        let rs = self.scale_radius.resolve_scalar(module, pack)?;
        if rc == rs {
            return Err(LensError::DegenerateRadii(rc.to_f64().unwrap_or(f64::NAN)));
        }
        Ok((
            self.x0.resolve_scalar(module, pack)?,
            self.y0.resolve_scalar(module, pack)?,
            self.mass.resolve_scalar(module, pack)?,
            rc,
            rs,
        ))
    }

    pub fn values(
        &self,
        module: &str,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<PseudoJaffeValues<T>, LensError> {
        let (x0, y0, mass, rc, rs) = self.resolve(module, pack)?;
        let kappa_0 =
            pseudo_jaffe::convergence_0(mass, rc, rs, ctx.d_l(), ctx.critical_surface_density());
        Ok(PseudoJaffeValues {
            x0,
            y0,
            kappa_0,
            rc,
            rs,
        })
    }

    /// Mass in Msun projected within `radius` arcsec of the centre
    pub fn mass_enclosed_2d(
        &self,
        module: &str,
        radius: T,
        pack: &ParamPack<T>,
    ) -> Result<T, LensError> {
        let (_, _, mass, rc, rs) = self.resolve(module, pack)?;
        Ok(pseudo_jaffe::mass_enclosed_2d(radius, mass, rc, rs, self.s))
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> Default for PseudoJaffe<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProfileTrait<T> for PseudoJaffe<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "PseudoJaffe"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![
            &self.x0,
            &self.y0,
            &self.mass,
            &self.core_radius,
            &self.scale_radius,
        ]
    }

    fn reduced_deflection_angle(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let p = self.values(module, ctx, pack)?;
        map_grid2(x, y, |x, y| {
            pseudo_jaffe::reduced_deflection_angle(&p, x, y, self.s)
        })
    }

    fn convergence(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let p = self.values(module, ctx, pack)?;
        map_grid(x, y, |x, y| pseudo_jaffe::convergence(&p, x, y, self.s))
    }

    fn potential(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let p = self.values(module, ctx, pack)?;
        map_grid(x, y, |x, y| pseudo_jaffe::potential(&p, x, y, self.s))
    }
}
