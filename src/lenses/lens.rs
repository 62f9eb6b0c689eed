pub(super) use crate::error::LensError;
pub(super) use crate::float_trait::Float;
pub(super) use crate::param::ParamPack;

use super::image_search::{self, ImageSearch};

use enum_dispatch::enum_dispatch;
pub(super) use ndarray::{Array2, ArrayView2};
pub(super) use std::fmt::Debug;

/// Mapping from the image plane to a source plane
///
/// Positions are arcsec grids of the same shape, `z_s` is the source redshift.
#[enum_dispatch]
pub trait LensTrait<T: Float>: Clone + Debug + Send + Sync {
    /// Deflection angle scaled to the source plane, `theta - beta`
    fn reduced_deflection_angle(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError>;

    /// Bending angle of the ray seen from the observer
    fn physical_deflection_angle(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError>;

    /// Alias of [LensTrait::reduced_deflection_angle]
    fn alpha(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        self.reduced_deflection_angle(x, y, z_s, pack)
    }

    /// Source plane position `beta = theta - alpha(theta)`
    fn raytrace(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let (ax, ay) = self.reduced_deflection_angle(x.view(), y.view(), z_s, pack)?;
        Ok((&x - &ax, &y - &ay))
    }

    /// Image plane positions of a point source at `(bx, by)`, solving `raytrace(theta) = beta`
    ///
    /// Images are ordered by their source plane residual. Images outside of the searched field of
    /// view may be missed.
    fn forward_raytrace(
        &self,
        bx: T,
        by: T,
        z_s: T,
        pack: &ParamPack<T>,
        search: &ImageSearch<T>,
    ) -> Result<Vec<(T, T)>, LensError> {
        image_search::forward_raytrace(self, bx, by, z_s, pack, search)
    }
}

#[enum_dispatch(LensTrait<T>)]
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Lens<T: Float> {
    Thin(super::thin_lens::ThinLens<T>),
    Multiplane(super::multiplane::Multiplane<T>),
}
