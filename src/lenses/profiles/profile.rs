pub(super) use crate::error::LensError;
pub(super) use crate::float_trait::Float;
pub(super) use crate::lenses::context::LensContext;
pub(super) use crate::param::{ParamPack, Parameter, Valid};

use enum_dispatch::enum_dispatch;
pub(super) use macro_const::macro_const;
pub(super) use ndarray::{Array2, ArrayView2, Zip};
pub(super) use serde::{Deserialize, Serialize};
pub(super) use std::fmt::Debug;

/// Mass distribution of a single lens plane
///
/// Every method takes the module name the free parameters are looked up under. Positions are
/// arcsec grids of the same shape.
#[enum_dispatch]
pub trait ProfileTrait<T: Float>: Clone + Debug + Send + Sync {
    /// Name of the profile family
    fn name(&self) -> &'static str;

    /// Parameter declarations, in the order of the profile documentation
    fn params(&self) -> Vec<&Parameter<T>>;

    /// Deflection angle scaled by `d_ls / d_s`, arcsec
    fn reduced_deflection_angle(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError>;

    /// Deflection angle seen from the observer, arcsec
    fn physical_deflection_angle(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let (ax, ay) = self.reduced_deflection_angle(module, x, y, ctx, pack)?;
        let factor = ctx.d_s() / ctx.d_ls();
        Ok((ax * factor, ay * factor))
    }

    /// Dimensionless surface density
    fn convergence(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError>;

    /// Lensing potential, arcsec²
    fn potential(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError>;
}

#[enum_dispatch(ProfileTrait<T>)]
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Profile<T: Float> {
    Epl(super::epl::Epl<T>),
    ExternalShear(super::external_shear::ExternalShear<T>),
    MassSheet(super::mass_sheet::MassSheet<T>),
    Multipole(super::multipole::Multipole<T>),
    Nfw(super::nfw::Nfw<T>),
    Pixelated(super::pixelated::PixelatedConvergence<T>),
    Point(super::point::Point<T>),
    PseudoJaffe(super::pseudo_jaffe::PseudoJaffe<T>),
    Sie(super::sie::Sie<T>),
    Sis(super::sis::Sis<T>),
    Tnfw(super::tnfw::Tnfw<T>),
}

fn check_shapes<T>(x: &ArrayView2<T>, y: &ArrayView2<T>) -> Result<(), LensError> {
    if x.dim() == y.dim() {
        Ok(())
    } else {
        Err(LensError::ShapeMismatch {
            actual: y.dim(),
            expected: x.dim(),
        })
    }
}

/// Evaluate a scalar field of one position over a grid
pub(super) fn map_grid<T: Float>(
    x: ArrayView2<T>,
    y: ArrayView2<T>,
    f: impl Fn(T, T) -> T,
) -> Result<Array2<T>, LensError> {
    check_shapes(&x, &y)?;
    Ok(Zip::from(&x).and(&y).map_collect(|&x, &y| f(x, y)))
}

/// Evaluate a vector field of one position over a grid
pub(super) fn map_grid2<T: Float>(
    x: ArrayView2<T>,
    y: ArrayView2<T>,
    f: impl Fn(T, T) -> (T, T),
) -> Result<(Array2<T>, Array2<T>), LensError> {
    check_shapes(&x, &y)?;
    let mut ax = Array2::zeros(x.raw_dim());
    let mut ay = Array2::zeros(x.raw_dim());
    Zip::from(&mut ax)
        .and(&mut ay)
        .and(&x)
        .and(&y)
        .for_each(|ax, ay, &x, &y| (*ax, *ay) = f(x, y));
    Ok((ax, ay))
}

/// Lens centre parameters shared by all families
pub(super) fn center_params<T: Float>() -> (Parameter<T>, Parameter<T>) {
    (
        Parameter::new("x0", "arcsec", None),
        Parameter::new("y0", "arcsec", None),
    )
}

/// Position angle in `[0, period)`
pub(super) fn angle_param<T: Float>(name: &'static str, period: f64) -> Parameter<T> {
    Parameter::new(name, "radians", None).with_valid(Valid::cyclic(0.0, period))
}
