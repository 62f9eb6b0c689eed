use crate::lenses::func::tnfw::{self, TnfwValues};
use crate::lenses::profiles::profile::*;

use schemars::JsonSchema;

/// How the `mass` parameter of [Tnfw] normalises the profile
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum TnfwMassConvention {
    /// Total mass of the truncated profile
    #[default]
    TotalMass,
    /// Spherical overdensity mass of the untruncated NFW profile, `M0` is its scale mass
    ScaleMass,
}

macro_const! {
    const DOC: &str = r"
Truncated Navarro-Frenk-White profile of Baltz, Marshall & Oguri (2009)

$$
\rho(r) = \frac{M_0}{4 \pi r (r + R_s)^2} \frac{\tau^2}{\tau^2 + (r / R_s)^2}
$$

with scale radius $R_s$ and truncation radius $\tau R_s$. The normalisation $M_0$ follows from
`mass` according to [TnfwMassConvention]: either the total mass of the truncated profile, or
the mass within the radius enclosing `delta` times the critical density, whose concentration
sets the scale density of the equivalent NFW halo.

- Parameters: `x0`, `y0`, `mass` (Msun), `Rs` (arcsec), `tau`
- Configuration: softening `s`, mass convention, overdensity `delta` (default 200)
";
}

#[doc = DOC!()]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Tnfw<T> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub mass: Parameter<T>,
    pub scale_radius: Parameter<T>,
    pub tau: Parameter<T>,
    s: T,
    convention: TnfwMassConvention,
    delta: T,
}

impl<T> Tnfw<T>
where
    T: Float,
{
    pub fn new(convention: TnfwMassConvention) -> Self {
        let (x0, y0) = center_params();
        Self {
            x0,
            y0,
            mass: Parameter::new("mass", "Msun", None).with_valid(Valid::at_least(0.0)),
            scale_radius: Parameter::new("Rs", "arcsec", None).with_valid(Valid::greater_than(0.0)),
            tau: Parameter::new("tau", "unitless", None).with_valid(Valid::greater_than(0.0)),
            s: T::zero(),
            convention,
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

    pub fn convention(&self) -> TnfwMassConvention {
        self.convention
    }

    pub fn delta(&self) -> T {
        self.delta
    }

    pub fn values(
        &self,
        module: &str,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<TnfwValues<T>, LensError> {
        let mass = self.mass.resolve_scalar(module, pack)?;
        let rs = self.scale_radius.resolve_scalar(module, pack)?;
        let tau = self.tau.resolve_scalar(module, pack)?;
        let m0 = match self.convention {
            TnfwMassConvention::TotalMass => tnfw::m0_totmass(mass, tau),
            TnfwMassConvention::ScaleMass => {
                let d_l = ctx.d_l();
                let rho_cr = ctx.critical_density();
                let c = tnfw::concentration(mass, rs, rho_cr, d_l, self.delta);
                tnfw::m0_scalemass(rs, c, rho_cr, d_l, self.delta)
            }
        };
        Ok(TnfwValues {
            x0: self.x0.resolve_scalar(module, pack)?,
            y0: self.y0.resolve_scalar(module, pack)?,
            rs,
            tau,
            m0,
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
        Ok(tnfw::mass_enclosed_2d(radius + self.s, p.rs, p.tau, p.m0))
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> ProfileTrait<T> for Tnfw<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "TNFW"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![
            &self.x0,
            &self.y0,
            &self.mass,
            &self.scale_radius,
            &self.tau,
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
        let (d_l, d_s, d_ls) = (ctx.d_l(), ctx.d_s(), ctx.d_ls());
        map_grid2(x, y, |x, y| {
            tnfw::reduced_deflection_angle(&p, x, y, d_l, d_s, d_ls, self.s)
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
        map_grid2(x, y, |x, y| {
            tnfw::physical_deflection_angle(&p, x, y, d_l, self.s)
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
        let (sigma_cr, d_l) = (ctx.critical_surface_density(), ctx.d_l());
        map_grid(x, y, |x, y| {
            tnfw::convergence(&p, x, y, sigma_cr, d_l, self.s)
        })
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
            tnfw::potential(&p, x, y, d_l, d_s, d_ls, self.s)
        })
    }
}
