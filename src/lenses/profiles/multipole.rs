use crate::lenses::func::multipole::{self, MultipoleValues};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
Multipole perturbation of order $m$

$$
\psi = \frac{r a_m}{1 - m^2} \cos\left(m (\phi - \phi_m)\right), \quad
\kappa = \frac{a_m}{2 r} \cos\left(m (\phi - \phi_m)\right)
$$

usually combined with an elliptical main deflector to describe boxy or disky isodensity
contours ($m = 4$) or lopsidedness ($m = 3$).

- Parameters: `x0`, `y0`, `a_m`, `phi_m` in $[0, 2\pi / m)$
- Configuration: order `m`, at least 2
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Multipole<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub a_m: Parameter<T>,
    pub phi_m: Parameter<T>,
    m: usize,
}

impl<T> Multipole<T>
where
    T: Float,
{
    pub fn new(m: usize) -> Self {
        assert!(m >= 2, "multipole order must be at least 2, got {m}");
        let (x0, y0) = center_params();
        Self {
            x0,
            y0,
            a_m: Parameter::new("a_m", "unitless", None),
            phi_m: angle_param("phi_m", 2.0 * std::f64::consts::PI / m as f64),
            m,
        }
    }

    pub fn order(&self) -> usize {
        self.m
    }

    pub fn values(
        &self,
        module: &str,
        pack: &ParamPack<T>,
    ) -> Result<MultipoleValues<T>, LensError> {
        Ok(MultipoleValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            a_m: self.a_m.resolve_scalar(module, pack)?,
            phi_m: self.phi_m.resolve_scalar(module, pack)?,
        })
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> ProfileTrait<T> for Multipole<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "Multipole"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.a_m, &self.phi_m]
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
        map_grid2(x, y, |x, y| multipole::reduced_deflection_angle(&p, self.m, x, y))
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
        map_grid(x, y, |x, y| multipole::convergence(&p, self.m, x, y))
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
        map_grid(x, y, |x, y| multipole::potential(&p, self.m, x, y))
    }
}
