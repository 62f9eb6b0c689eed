use crate::lenses::func::mass_sheet::{self, MassSheetValues};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
Uniform mass sheet of convergence `kappa`

$$
\alpha = \kappa \vec{r}, \quad \psi = \frac{\kappa r^2}{2}
$$

- Parameters: `x0`, `y0`, `kappa`
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct MassSheet<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub kappa: Parameter<T>,
}

impl<T> MassSheet<T>
where
    T: Float,
{
    pub fn new() -> Self {
        let (x0, y0) = center_params();
        Self {
            x0,
            y0,
            kappa: Parameter::new("kappa", "unitless", None),
        }
    }

    pub fn values(
        &self,
        module: &str,
        pack: &ParamPack<T>,
    ) -> Result<MassSheetValues<T>, LensError> {
        Ok(MassSheetValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            kappa: self.kappa.resolve_scalar(module, pack)?,
        })
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> Default for MassSheet<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProfileTrait<T> for MassSheet<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "MassSheet"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.kappa]
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
        map_grid2(x, y, |x, y| mass_sheet::reduced_deflection_angle(&p, x, y))
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
        map_grid(x, y, |x, y| mass_sheet::convergence(&p, x, y))
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
        map_grid(x, y, |x, y| mass_sheet::potential(&p, x, y))
    }
}
