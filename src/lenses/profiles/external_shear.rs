use crate::lenses::func::external_shear::{self, ExternalShearValues};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
External shear from the large-scale environment of the lens

$$
\psi = \frac{\gamma_1}{2} (x^2 - y^2) + \gamma_2 x y
$$

around the centre `(x0, y0)`. The convergence is zero.

- Parameters: `x0`, `y0`, `gamma_1`, `gamma_2`
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct ExternalShear<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub gamma_1: Parameter<T>,
    pub gamma_2: Parameter<T>,
}

impl<T> ExternalShear<T>
where
    T: Float,
{
    pub fn new() -> Self {
        let (x0, y0) = center_params();
        Self {
            x0,
            y0,
            gamma_1: Parameter::new("gamma_1", "unitless", None),
            gamma_2: Parameter::new("gamma_2", "unitless", None),
        }
    }

    pub fn values(
        &self,
        module: &str,
        pack: &ParamPack<T>,
    ) -> Result<ExternalShearValues<T>, LensError> {
        Ok(ExternalShearValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            gamma_1: self.gamma_1.resolve_scalar(module, pack)?,
            gamma_2: self.gamma_2.resolve_scalar(module, pack)?,
        })
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> Default for ExternalShear<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProfileTrait<T> for ExternalShear<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "ExternalShear"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.gamma_1, &self.gamma_2]
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
        map_grid2(x, y, |x, y| external_shear::reduced_deflection_angle(&p, x, y))
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
        map_grid(x, y, |x, y| external_shear::convergence(&p, x, y))
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
        map_grid(x, y, |x, y| external_shear::potential(&p, x, y))
    }
}
