use crate::convolve::ConvolutionMode;
use crate::lenses::func::pixelated::{self, PixelatedKernels};
use crate::lenses::profiles::profile::*;

use std::sync::Arc;

macro_const! {
    const DOC: &str = r"
Lens with the convergence given on a regular grid of square pixels

Deflection and potential are discrete convolutions of the map with the Green's functions
$\vec{r} / (\pi r^2)$ and $\ln(r) / \pi$ evaluated at the pixel centres, so every pixel acts as a
point mass. The kernels and their spectra are computed once for the map shape. Results are
interpolated bilinearly and vanish outside the map.

- Parameters: `x0`, `y0`, `kappa_map` (a map parameter)
- Configuration: `pixelscale`, map shape, convolution mode
";
}

#[doc = DOC!()]
#[derive(Clone, Debug)]
pub struct PixelatedConvergence<T: Float> {
    pub x0: Parameter<T>,
    pub y0: Parameter<T>,
    pub kappa_map: Parameter<T>,
    kernels: Arc<PixelatedKernels<T>>,
}

impl<T> PixelatedConvergence<T>
where
    T: Float,
{
    pub fn new(
        pixelscale: T,
        shape: (usize, usize),
        mode: ConvolutionMode,
    ) -> Result<Self, LensError> {
        let (x0, y0) = center_params();
        Ok(Self {
            x0,
            y0,
            kappa_map: Parameter::new_map("kappa_map", "unitless", None),
            kernels: Arc::new(PixelatedKernels::new(pixelscale, shape, mode)?),
        })
    }

    pub fn pixelscale(&self) -> T {
        self.kernels.pixelscale()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.kernels.shape()
    }

    pub fn mode(&self) -> ConvolutionMode {
        self.kernels.mode()
    }

    fn resolve<'a>(
        &'a self,
        module: &str,
        pack: &'a ParamPack<T>,
    ) -> Result<(T, T, &'a Array2<T>), LensError> {
        Ok((
            self.x0.resolve_scalar(module, pack)?,
            self.y0.resolve_scalar(module, pack)?,
            self.kappa_map.resolve_map(module, pack)?,
        ))
    }

    pub const fn doc() -> &'static str {
        DOC
    }
}

impl<T> ProfileTrait<T> for PixelatedConvergence<T>
where
    T: Float,
{
    fn name(&self) -> &'static str {
        "PixelatedConvergence"
    }

    fn params(&self) -> Vec<&Parameter<T>> {
        vec![&self.x0, &self.y0, &self.kappa_map]
    }

    fn reduced_deflection_angle(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        _ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let (x0, y0, map) = self.resolve(module, pack)?;
        pixelated::reduced_deflection_angle(&self.kernels, map.view(), x0, y0, x, y)
    }

    fn convergence(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        _ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let (x0, y0, map) = self.resolve(module, pack)?;
        pixelated::convergence(&self.kernels, map.view(), x0, y0, x, y)
    }

    fn potential(
        &self,
        module: &str,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        _ctx: &LensContext<T>,
        pack: &ParamPack<T>,
    ) -> Result<Array2<T>, LensError> {
        let (x0, y0, map) = self.resolve(module, pack)?;
        pixelated::potential(&self.kernels, map.view(), x0, y0, x, y)
    }
}
