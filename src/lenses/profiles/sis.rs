use crate::lenses::func::sis::{self, SisValues};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
Singular isothermal sphere

$$
\alpha = R_\mathrm{ein} \frac{\vec{r}}{r + s}, \quad \psi = R_\mathrm{ein} (r + s), \quad
\kappa = \frac{R_\mathrm{ein}}{2 (r + s)}
$$

- Parameters: `x0`, `y0`, `Rein`
- Configuration: softening `s`
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Sis<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub rein: Parameter<T>,
    s: T,
}

impl<T> Sis<T>
where
    T: Float,
{
    pub fn new() -> Self {
        let (x0, y0) = center_params();
        Self {
            x0,
            y0,
            rein: Parameter::new("Rein", "arcsec", None).with_valid(Valid::at_least(0.0)),
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

    pub fn values(&self, module: &str, pack: &ParamPack<T>) -> Result<SisValues<T>, LensError> {
        Ok(SisValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            rein: self.rein.resolve_scalar(module, pack)?,
        })
    }

    /// Einstein radius of the velocity dispersion `sigma_v` in km/s
    pub fn sigma_v_to_rein(ctx: &LensContext<T>, sigma_v: T) -> T {
        sis::sigma_v_to_rein(sigma_v, ctx.d_ls(), ctx.d_s())
    }

    /// Einstein radius enclosing `mass` in Msun
    pub fn mass_to_rein(ctx: &LensContext<T>, mass: T) -> T {
        sis::mass_to_rein(mass, ctx.d_ls(), ctx.d_l(), ctx.d_s())
    }

    /// Mass in Msun enclosed by the Einstein radius `rein` in arcsec
    pub fn rein_to_mass(ctx: &LensContext<T>, rein: T) -> T {
        sis::rein_to_mass(rein, ctx.d_ls(), ctx.d_l(), ctx.d_s())
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> Default for Sis<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProfileTrait<T> for Sis<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "SIS"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.rein]
    }

    fn reduced_deflection_angle(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        _ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let p = self.values(module, pack)?;
        map_grid2(x, y, |x, y| sis::reduced_deflection_angle(&p, x, y, self.s))
    }

    fn convergence(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        _ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let p = self.values(module, pack)?;
        map_grid(x, y, |x, y| sis::convergence(&p, x, y, self.s))
    }

    fn potential(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        _ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let p = self.values(module, pack)?;
        map_grid(x, y, |x, y| sis::potential(&p, x, y, self.s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::lenses::profiles::profile::tests::{Z_L, Z_S, cosmology, grid};

    use approx::assert_relative_eq;

    #[test]
    fn fixed_parameters_need_no_pack() {
        let mut sis = Sis::new().with_softening(0.01);
        sis.x0.set_value(0.0);
        sis.y0.set_value(0.0);
        sis.rein.set_value(1.5);
        let cosmology = cosmology();
        let ctx = LensContext::new(&cosmology, Z_L, Z_S);
        let (x, y) = grid();
        let (ax, ay) = sis
            .reduced_deflection_angle("sis", x.view(), y.view(), &ctx, &ParamPack::new())
            .unwrap();
        for (((&ax, &ay), &x), &y) in ax.iter().zip(ay.iter()).zip(x.iter()).zip(y.iter()) {
            let r = x.hypot(y);
            assert_relative_eq!(ax.hypot(ay), 1.5 * r / (r + 0.01), max_relative = 1e-12);
        }
    }

    #[test]
    fn unresolved_einstein_radius() {
        let sis = Sis::<f64>::new();
        let cosmology = cosmology();
        let ctx = LensContext::new(&cosmology, Z_L, Z_S);
        let (x, y) = grid();
        let pack = ParamPack::new().with("sis", "x0", 0.0).with("sis", "y0", 0.0);
        assert_eq!(
            sis.convergence("sis", x.view(), y.view(), &ctx, &pack)
                .unwrap_err(),
            LensError::UnresolvedParameter {
                key: "sis.Rein".to_owned()
            }
        );
    }

    #[test]
    fn mass_rein_round_trip() {
        let cosmology = cosmology();
        let ctx = LensContext::new(&cosmology, Z_L, Z_S);
        let mass = Sis::rein_to_mass(&ctx, 1.3);
        assert_relative_eq!(Sis::mass_to_rein(&ctx, mass), 1.3, max_relative = 1e-12);
    }
}
