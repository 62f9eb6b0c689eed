use crate::lenses::func::epl::{self, EplValues};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
Elliptical power law, also known as the softened power-law ellipsoid

The convergence is

$$
\kappa = \frac{2 - t}{2} \left(\frac{R_\mathrm{ein} \sqrt{q}}{\sqrt{q^2 x^2 + y^2}}\right)^t
$$

in the frame aligned with the major axis, $t = \gamma - 1$. The deflection is the truncated
series of Tessore & Metcalf (2015) with `n_iter` terms and no convergence check, the terms
decrease like $((1 - q) / (1 + q))^n$.

- Parameters: `x0`, `y0`, `q` in $(0, 1]$, `phi` in $[0, \pi)$, `Rein`, `t` in $(0, 2)$
- Configuration: softening `s` (convergence only), `n_iter`
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Epl<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub q: Parameter<T>,
    pub phi: Parameter<T>,
    pub rein: Parameter<T>,
    pub t: Parameter<T>,
    s: T,
    n_iter: usize,
}

impl<T> Epl<T>
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
            t: Parameter::new("t", "unitless", None).with_valid(Valid::open(0.0, 2.0)),
            s: T::zero(),
            n_iter: 18,
        }
    }

    pub fn with_softening(mut self, s: T) -> Self {
        self.s = s;
        self
    }

    pub fn with_n_iter(mut self, n_iter: usize) -> Self {
        assert!(n_iter > 0, "number of series terms must be positive");
        self.n_iter = n_iter;
        self
    }

    pub fn softening(&self) -> T {
        self.s
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    pub fn values(&self, module: &str, pack: &ParamPack<T>) -> Result<EplValues<T>, LensError> {
        Ok(EplValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            q: self.q.resolve_scalar(module, pack)?,
            phi: self.phi.resolve_scalar(module, pack)?,
            rein: self.rein.resolve_scalar(module, pack)?,
            t: self.t.resolve_scalar(module, pack)?,
        })
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> Default for Epl<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProfileTrait<T> for Epl<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "EPL"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.q, &self.phi, &self.rein, &self.t]
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
        map_grid2(x, y, |x, y| epl::reduced_deflection_angle(&p, x, y, self.n_iter))
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
        map_grid(x, y, |x, y| epl::convergence(&p, x, y, self.s))
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
        map_grid(x, y, |x, y| epl::potential(&p, x, y, self.n_iter))
    }
}
