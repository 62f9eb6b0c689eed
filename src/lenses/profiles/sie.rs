use crate::lenses::func::sie::{self, SieValues};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
Singular isothermal ellipsoid

$$
\kappa = \frac{\sqrt{q} R_\mathrm{ein}}{2 \sqrt{q^2 (x^2 + s^2) + y^2}}
$$

in the frame aligned with the major axis. Deflection and potential are the closed forms of
Kormann et al. (1994), the circular limit $q = 1$ is the singular isothermal sphere.

- Parameters: `x0`, `y0`, `q` in $(0, 1]$, `phi` in $[0, \pi)$, `Rein`
- Configuration: softening `s`
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Sie<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub q: Parameter<T>,
    pub phi: Parameter<T>,
    pub rein: Parameter<T>,
    s: T,
}

impl<T> Sie<T>
where
    T: Float,
{
    pub fn new() -> Self {
        let (x0, y0) = center_params();
        Self {
            x0,
            y0,
            q: Parameter::new("q", "unitless", None).with_valid(Valid::left_open(0.0, 1.0)),
            phi: angle_param("phi", std::f64::consts::PI),
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

    pub fn values(&self, module: &str, pack: &ParamPack<T>) -> Result<SieValues<T>, LensError> {
        Ok(SieValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            q: self.q.resolve_scalar(module, pack)?,
            phi: self.phi.resolve_scalar(module, pack)?,
            rein: self.rein.resolve_scalar(module, pack)?,
        })
    }

    /// Einstein radius of the velocity dispersion `sigma_v` in km/s
    pub fn sigma_v_to_rein(ctx: &LensContext<T>, sigma_v: T) -> T {
        sie::sigma_v_to_rein(sigma_v, ctx.d_ls(), ctx.d_s())
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> Default for Sie<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProfileTrait<T> for Sie<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "SIE"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.q, &self.phi, &self.rein]
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
        map_grid2(x, y, |x, y| sie::reduced_deflection_angle(&p, x, y, self.s))
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
        map_grid(x, y, |x, y| sie::convergence(&p, x, y, self.s))
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
        map_grid(x, y, |x, y| sie::potential(&p, x, y, self.s))
    }
}
