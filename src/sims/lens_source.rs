use crate::convolve::{ConvolutionMode, FftConvolver, convolve_same};
use crate::error::SimulatorError;
use crate::float_trait::Float;
use crate::geometry::meshgrid;
use crate::lenses::{Lens, LensTrait};
use crate::light::{Light, LightTrait};
use crate::param::{ParamPack, Parameter, Valid};
use crate::quadrature::QuadratureGrid;
use crate::resample::{crop, sum_pool};

use log::{debug, trace, warn};
use ndarray::{Array2, ArrayView2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parts of the model to render in [LensSource::forward]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ForwardFlags {
    /// Render the source
    pub source_light: bool,
    /// Render the lens galaxy
    pub lens_light: bool,
    /// Trace the source through the lens, otherwise it is rendered unlensed
    pub lens_source: bool,
    /// Convolve with the PSF
    pub psf_convolve: bool,
    /// Gauss-Legendre nodes per pixel side, no sub-pixel integration for `None` or 1
    pub quad_level: Option<usize>,
}

impl Default for ForwardFlags {
    fn default() -> Self {
        Self {
            source_light: true,
            lens_light: true,
            lens_source: true,
            psf_convolve: true,
            quad_level: None,
        }
    }
}

/// Image geometry and PSF of a [LensSource]
#[derive(Clone, Debug)]
pub struct LensSourceConfig<T> {
    pub pixelscale: T,
    pub pixels_x: usize,
    /// Equals `pixels_x` if not set
    pub pixels_y: Option<usize>,
    pub upsample_factor: usize,
    /// PSF sampled at the upsampled resolution, normalised on construction
    pub psf: Option<Array2<T>>,
    /// Render a margin wide enough for the light scattered into the field of view by the PSF
    pub psf_pad: bool,
    pub psf_mode: ConvolutionMode,
    /// Fixed source redshift, looked up in the parameter pack if not set
    pub z_s: Option<T>,
}

impl<T> LensSourceConfig<T>
where
    T: Float,
{
    /// Square image of `pixels_x` pixels per side
    pub fn new(pixelscale: T, pixels_x: usize) -> Self {
        Self {
            pixelscale,
            pixels_x,
            pixels_y: None,
            upsample_factor: 1,
            psf: None,
            psf_pad: true,
            psf_mode: ConvolutionMode::default(),
            z_s: None,
        }
    }

    pub fn with_pixels_y(mut self, pixels_y: usize) -> Self {
        self.pixels_y = Some(pixels_y);
        self
    }

    pub fn with_upsample_factor(mut self, upsample_factor: usize) -> Self {
        self.upsample_factor = upsample_factor;
        self
    }

    pub fn with_psf(mut self, psf: Array2<T>) -> Self {
        self.psf = Some(psf);
        self
    }

    pub fn with_psf_pad(mut self, psf_pad: bool) -> Self {
        self.psf_pad = psf_pad;
        self
    }

    pub fn with_psf_mode(mut self, psf_mode: ConvolutionMode) -> Self {
        self.psf_mode = psf_mode;
        self
    }

    pub fn with_z_s(mut self, z_s: T) -> Self {
        self.z_s = Some(z_s);
        self
    }
}

#[derive(Debug)]
enum Psf<T: Float> {
    Fft { kernel: Array2<T>, convolver: FftConvolver<T> },
    Conv2d { kernel: Array2<T> },
}

impl<T: Float> Psf<T> {
    fn kernel(&self) -> &Array2<T> {
        match self {
            Self::Fft { kernel, .. } | Self::Conv2d { kernel } => kernel,
        }
    }

    fn convolve(&self, image: ArrayView2<T>) -> Result<Array2<T>, SimulatorError> {
        match self {
            Self::Fft { convolver, .. } => Ok(convolver.convolve(image)?),
            Self::Conv2d { kernel } => Ok(convolve_same(image, kernel.view())),
        }
    }
}

fn normalize_psf<T: Float>(
    psf: Array2<T>,
    upsample_factor: usize,
) -> Result<Array2<T>, SimulatorError> {
    let (ny, nx) = psf.dim();
    if ny == 0 || nx == 0 {
        return Err(SimulatorError::InvalidPsf("PSF is empty".to_owned()));
    }
    if psf.iter().any(|&w| !w.is_finite() || w < T::zero()) {
        return Err(SimulatorError::InvalidPsf(
            "PSF weights must be finite and non-negative".to_owned(),
        ));
    }
    let sum = psf.sum();
    if !(sum > T::zero()) {
        return Err(SimulatorError::InvalidPsf("PSF sums to zero".to_owned()));
    }
    if ny < upsample_factor || nx < upsample_factor {
        return Err(SimulatorError::InvalidPsf(format!(
            "PSF of shape {:?} cannot be sampled at the upsampled resolution, upsample factor is {}",
            (ny, nx),
            upsample_factor
        )));
    }
    Ok(psf / sum)
}

/// Image of a lensed source and the lens galaxy
///
/// The image is rendered on a grid `upsample_factor` times finer than the output pixels and
/// extended by the PSF margin, optionally convolved with the PSF, then block-summed to the output
/// resolution and cropped. Light models give the flux per fine pixel. The grid, the padding and
/// the PSF spectrum are computed once on construction.
#[derive(Debug)]
pub struct LensSource<T: Float> {
    name: String,
    lens: Lens<T>,
    source: Option<Light<T>>,
    lens_light: Option<Light<T>>,
    z_s: Parameter<T>,
    pixelscale: T,
    pixels: (usize, usize),
    upsample_factor: usize,
    padding: (usize, usize),
    grid: (Array2<T>, Array2<T>),
    psf: Option<Psf<T>>,
}

impl<T> LensSource<T>
where
    T: Float,
{
    /// `name` is the module of the source redshift parameter `z_s`
    pub fn new(
        name: impl Into<String>,
        lens: impl Into<Lens<T>>,
        config: LensSourceConfig<T>,
    ) -> Result<Self, SimulatorError> {
        let name = name.into();
        if !(config.pixelscale > T::zero()) {
            return Err(SimulatorError::InvalidConfiguration(format!(
                "pixelscale must be positive, got {}",
                config.pixelscale
            )));
        }
        let pixels_x = config.pixels_x;
        let pixels_y = config.pixels_y.unwrap_or(pixels_x);
        let upsample_factor = config.upsample_factor;
        if pixels_x == 0 || pixels_y == 0 || upsample_factor == 0 {
            return Err(SimulatorError::InvalidConfiguration(format!(
                "image shape {:?} and upsample factor {} must be positive",
                (pixels_y, pixels_x),
                upsample_factor
            )));
        }
        let psf = config
            .psf
            .map(|psf| normalize_psf(psf, upsample_factor))
            .transpose()?;
        let padding = match &psf {
            Some(psf) if config.psf_pad => {
                let (ky, kx) = psf.dim();
                (ky / 2 / upsample_factor + 1, kx / 2 / upsample_factor + 1)
            }
            _ => (0, 0),
        };
        let fine_shape = (
            (pixels_y + 2 * padding.0) * upsample_factor,
            (pixels_x + 2 * padding.1) * upsample_factor,
        );
        let grid = meshgrid(
            config.pixelscale / T::cast_usize(upsample_factor),
            fine_shape.1,
            fine_shape.0,
        );
        let psf = match psf {
            Some(kernel) => Some(match config.psf_mode {
                ConvolutionMode::Fft => {
                    let convolver = FftConvolver::new(kernel.view(), fine_shape)?;
                    debug!(
                        "{name}: PSF {:?} applied with FFT of shape {:?}",
                        kernel.dim(),
                        convolver.fft_shape()
                    );
                    Psf::Fft { kernel, convolver }
                }
                ConvolutionMode::Conv2d => Psf::Conv2d { kernel },
            }),
            None => None,
        };
        debug!(
            "{name}: {:?} image, upsample factor {upsample_factor}, padding {padding:?}, fine grid {fine_shape:?}",
            (pixels_y, pixels_x)
        );
        Ok(Self {
            z_s: Parameter::new("z_s", "unitless", config.z_s).with_valid(Valid::at_least(0.0)),
            name,
            lens: lens.into(),
            source: None,
            lens_light: None,
            pixelscale: config.pixelscale,
            pixels: (pixels_y, pixels_x),
            upsample_factor,
            padding,
            grid,
            psf,
        })
    }

    pub fn with_source(mut self, source: impl Into<Light<T>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_lens_light(mut self, lens_light: impl Into<Light<T>>) -> Self {
        self.lens_light = Some(lens_light.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lens(&self) -> &Lens<T> {
        &self.lens
    }

    pub fn source(&self) -> Option<&Light<T>> {
        self.source.as_ref()
    }

    pub fn lens_light(&self) -> Option<&Light<T>> {
        self.lens_light.as_ref()
    }

    pub fn z_s(&self) -> &Parameter<T> {
        &self.z_s
    }

    /// Output pixel size
    pub fn pixelscale(&self) -> T {
        self.pixelscale
    }

    /// Output shape `(pixels_y, pixels_x)`
    pub fn shape(&self) -> (usize, usize) {
        self.pixels
    }

    pub fn upsample_factor(&self) -> usize {
        self.upsample_factor
    }

    /// PSF margin `(rows, columns)` in output pixels
    pub fn padding(&self) -> (usize, usize) {
        self.padding
    }

    /// Fine sampling grid including the PSF margin
    pub fn grid(&self) -> (ArrayView2<'_, T>, ArrayView2<'_, T>) {
        (self.grid.0.view(), self.grid.1.view())
    }

    /// Normalised PSF
    pub fn psf(&self) -> Option<&Array2<T>> {
        self.psf.as_ref().map(Psf::kernel)
    }

    fn sample(
        &self,
        quad: Option<&QuadratureGrid<T>>,
        f: impl Fn(ArrayView2<T>, ArrayView2<T>) -> Result<Array2<T>, SimulatorError>,
    ) -> Result<Array2<T>, SimulatorError> {
        match quad {
            Some(quad) => {
                let fine = f(quad.x.view(), quad.y.view())?;
                Ok(quad.integrate(fine.view()))
            }
            None => f(self.grid.0.view(), self.grid.1.view()),
        }
    }

    /// Render the image of shape `(pixels_y, pixels_x)`
    ///
    /// Flags asking for an absent source, lens light or PSF are ignored.
    pub fn forward(
        &self,
        pack: &ParamPack<T>,
        flags: ForwardFlags,
    ) -> Result<Array2<T>, SimulatorError> {
        let z_s = self.z_s.resolve_scalar(&self.name, pack)?;
        trace!("{}: forward pass with z_s = {z_s}, {flags:?}", self.name);

        let source = match (&self.source, flags.source_light) {
            (Some(source), true) => Some(source),
            (None, true) => {
                warn!("{}: no source light model, source light is disabled", self.name);
                None
            }
            _ => None,
        };
        let lens_light = match (&self.lens_light, flags.lens_light) {
            (Some(light), true) => Some(light),
            (None, true) => {
                warn!("{}: no lens light model, lens light is disabled", self.name);
                None
            }
            _ => None,
        };
        let psf = match (&self.psf, flags.psf_convolve) {
            (Some(psf), true) => Some(psf),
            (None, true) => {
                warn!("{}: no PSF, convolution is disabled", self.name);
                None
            }
            _ => None,
        };

        let quad = flags.quad_level.filter(|&level| level > 1).map(|level| {
            QuadratureGrid::new(
                self.grid.0.view(),
                self.grid.1.view(),
                self.pixelscale / T::cast_usize(self.upsample_factor),
                level,
            )
        });

        let mut mu = match source {
            Some(source) if flags.lens_source => self.sample(quad.as_ref(), |x, y| {
                let (bx, by) = self.lens.raytrace(x, y, z_s, pack)?;
                Ok(source.brightness(bx.view(), by.view(), pack)?)
            })?,
            Some(source) => {
                self.sample(quad.as_ref(), |x, y| Ok(source.brightness(x, y, pack)?))?
            }
            None => Array2::zeros(self.grid.0.raw_dim()),
        };
        if let Some(light) = lens_light {
            mu += &self.sample(quad.as_ref(), |x, y| Ok(light.brightness(x, y, pack)?))?;
        }
        if let Some(psf) = psf {
            mu = psf.convolve(mu.view())?;
        }
        let native = sum_pool(mu.view(), self.upsample_factor);
        Ok(crop(native.view(), self.padding))
    }
}
