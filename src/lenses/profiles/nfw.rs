use crate::lenses::func::nfw::{self, NfwValues};
use crate::lenses::func::tnfw::{concentration, scale_density};
use crate::lenses::profiles::profile::*;

macro_const! {
    const DOC: &str = r"
Navarro-Frenk-White profile

$$
\rho(r) = \frac{\rho_s}{(r / R_s) (1 + r / R_s)^2}
$$

The scale density follows from the concentration $c = r_\Delta / R_s$ of a halo of mass `mass`
within the radius $r_\Delta$ enclosing `delta` times the critical density at the lens redshift.
The projected profile is not truncated, so the deflection grows logarithmically with radius.

- Parameters: `x0`, `y0`, `mass` (Msun), `Rs` (arcsec)
- Configuration: softening `s`, overdensity `delta` (default 200)
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Nfw<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub mass: Parameter<T>,
    pub scale_radius: Parameter<T>,
    s: T,
    delta: T,
}

impl<T> Nfw<T>
where
    T: Float,
{
    pub fn new() -> Self {
        let (x0, y0) = center_params();
        Self {
            x0,
            y0,
            mass: Parameter::new("mass", "Msun", None).with_valid(Valid::at_least(0.0)),
            scale_radius: Parameter::new("Rs", "arcsec", None).with_valid(Valid::greater_than(0.0)),
            s: T::zero(),
            delta: T::cast(200.0),
        }
    }

    pub fn with_softening(mut self, s: T) -> Self {
        self.s = s;
        self
    }

    pub fn with_delta(mut self, delta: T) -> Self {
        assert!(delta > T::zero(), "overdensity must be positive");
        self.delta = delta;
        self
    }

    pub fn softening(&self) -> T {
        self.s
    }

    pub fn delta(&self) -> T {
        self.delta
    }

    pub fn values(
        &self,
        module: &str,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<NfwValues<T>, LensError> {
        let mass = self.mass.resolve_scalar(module, pack)?;
        let rs = self.scale_radius.resolve_scalar(module, pack)?;
        let rho_cr = ctx.critical_density();
        let c = concentration(mass, rs, rho_cr, ctx.d_l(), self.delta);
        Ok(NfwValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            rs,
            rho_s: scale_density(c, rho_cr, self.delta),
        })
    }

    /// Mass in Msun projected within `radius` arcsec of the centre
    pub fn mass_enclosed_2d(
        &self,
        module: &str,
        radius: T,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<T, LensError> {
        let p = self.values(module, ctx, pack)?;
        Ok(nfw::mass_enclosed_2d(radius + self.s, p.rs, p.rho_s, ctx.d_l()))
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> Default for Nfw<T>
where
    T: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProfileTrait<T> for Nfw<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "NFW"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.mass, &self.scale_radius]
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
        let (d_l, d_s, d_ls) = (ctx.d_l(), ctx.d_s(), ctx.d_ls());
        map_grid2(x, y, |x, y| {
            nfw::reduced_deflection_angle(&p, x, y, d_l, d_s, d_ls, self.s)
        })
    }

    fn physical_deflection_angle(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let p = self.values(module, ctx, pack)?;
        let d_l = ctx.d_l();
        map_grid2(x, y, |x, y| nfw::physical_deflection_angle(&p, x, y, d_l, self.s))
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
        let (sigma_cr, d_l) = (ctx.critical_surface_density(), ctx.d_l());
        map_grid(x, y, |x, y| nfw::convergence(&p, x, y, sigma_cr, d_l, self.s))
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
        let (d_l, d_s, d_ls) = (ctx.d_l(), ctx.d_s(), ctx.d_ls());
        map_grid(x, y, |x, y| {
            nfw::potential(&p, x, y, d_l, d_s, d_ls, self.s)
        })
    }
}
