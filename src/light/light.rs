pub(super) use crate::error::LensError;
pub(super) use crate::float_trait::Float;
pub(super) use crate::param::{ParamPack, Parameter, Valid};

use enum_dispatch::enum_dispatch;
pub(super) use macro_const::macro_const;
pub(super) use ndarray::{Array2, ArrayView2, Zip};
pub(super) use serde::{Deserialize, Serialize};
pub(super) use std::fmt::Debug;

/// Surface brightness of a source or of the lens galaxy
#[enum_dispatch]
pub trait LightTrait<T: Float>: Clone + Debug + Send + Sync {
    /// Module name the free parameters are looked up under
    fn name(&self) -> &str;

    fn params(&self) -> Vec<&Parameter<T>>;

    /// Brightness at arcsec positions `(x, y)` of the same shape
    fn brightness(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError>;
}

#[enum_dispatch(LightTrait<T>)]
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Light<T: Float> {
    Sersic(super::sersic::Sersic<T>),
    Pixelated(super::pixelated::PixelatedSource<T>),
}

pub(super) fn check_shapes<T>(x: &ArrayView2<T>, y: &ArrayView2<T>) -> Result<(), LensError> {
    if x.dim() == y.dim() {
        Ok(())
    } else {
        Err(LensError::ShapeMismatch {
            actual: y.dim(),
            expected: x.dim(),
        })
    }
}
