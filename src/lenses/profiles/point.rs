use crate::lenses::func::point::{self, PointValues};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
Point mass

$$
\alpha = R_\mathrm{ein}^2 \frac{\vec{r}}{(r + s)^2}, \quad \psi = R_\mathrm{ein}^2 \ln(r + s)
$$

The convergence is a delta function at the centre and evaluates to zero on any grid.

- Parameters: `x0`, `y0`, `Rein`
- Configuration: softening `s`
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Point<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub rein: Parameter<T>,
    s: T,
}

impl<T> Point<T>
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

    pub fn values(&self, module: &str, pack: &ParamPack<T>) -> Result<PointValues<T>, LensError> {
        Ok(PointValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            rein: self.rein.resolve_scalar(module, pack)?,
        })
    }

    /// Einstein radius in arcsec of `mass` in Msun
    pub fn mass_to_rein(ctx: &LensContext<T>, mass: T) -> T {
        point::mass_to_rein(mass, ctx.d_ls(), ctx.d_l(), ctx.d_s())
    }

    /// Mass in Msun of the Einstein radius `rein` in arcsec
    pub fn rein_to_mass(ctx: &LensContext<T>, rein: T) -> T {
        point::rein_to_mass(rein, ctx.d_ls(), ctx.d_l(), ctx.d_s())
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> Default for Point<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProfileTrait<T> for Point<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "Point"
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
        map_grid2(x, y, |x, y| point::reduced_deflection_angle(&p, x, y, self.s))
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
        map_grid(x, y, |x, y| point::convergence(&p, x, y))
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
        map_grid(x, y, |x, y| point::potential(&p, x, y, self.s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::lenses::profiles::profile::tests::{Z_L, Z_S, cosmology};

    use approx::assert_relative_eq;

    #[test]
    fn einstein_ring_is_mapped_to_the_centre() {
        let cosmology = cosmology();
        let ctx = LensContext::new(&cosmology, Z_L, Z_S);
        let rein = Point::mass_to_rein(&ctx, 1e12);
        assert_relative_eq!(Point::rein_to_mass(&ctx, rein), 1e12, max_relative = 1e-12);

        let point = Point::new();
        let pack = ParamPack::new()
            .with("point", "x0", 0.0)
            .with("point", "y0", 0.0)
            .with("point", "Rein", rein);
        let x = ndarray::array![[rein * 0.6]];
        let y = ndarray::array![[rein * 0.8]];
        let (ax, ay) = point
            .reduced_deflection_angle("point", x.view(), y.view(), &ctx, &pack)
            .unwrap();
        assert_relative_eq!(ax[[0, 0]], x[[0, 0]], max_relative = 1e-12);
        assert_relative_eq!(ay[[0, 0]], y[[0, 0]], max_relative = 1e-12);
    }
}
