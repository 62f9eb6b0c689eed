//! Lens with a convergence given as a pixel map
//!
//! Deflection and potential maps are discrete convolutions of the map with the Green's function
//! kernels `(x, y) / r²` and `ln r`, scaled by `pixelscale² / π`, and are bilinearly
//! interpolated at the requested positions.

use crate::convolve::{ConvolutionMode, FftConvolver, convolve_same};
use crate::error::LensError;
use crate::float_trait::Float;
use crate::interp::Bilinear;

use ndarray::{Array2, ArrayView2};

#[derive(Debug)]
enum Engine<T: Float> {
    Fft {
        x: FftConvolver<T>,
        y: FftConvolver<T>,
        psi: FftConvolver<T>,
    },
    Conv2d,
}

/// Convolution kernels for convergence maps of a fixed shape
///
/// Kernels cover every pixel offset, `(2 ny - 1, 2 nx - 1)`, and vanish at zero offset.
#[derive(Debug)]
pub struct PixelatedKernels<T: Float> {
    pixelscale: T,
    shape: (usize, usize),
    kernel_x: Array2<T>,
    kernel_y: Array2<T>,
    kernel_psi: Array2<T>,
    engine: Engine<T>,
}

impl<T: Float> PixelatedKernels<T> {
    pub fn new(
        pixelscale: T,
        shape: (usize, usize),
        mode: ConvolutionMode,
    ) -> Result<Self, LensError> {
        let (ny, nx) = shape;
        if ny < 2 || nx < 2 {
            return Err(LensError::ShapeMismatch {
                actual: shape,
                expected: (ny.max(2), nx.max(2)),
            });
        }
        if !(pixelscale > T::zero()) {
            return Err(LensError::InvalidConfiguration(format!(
                "pixelscale must be positive, got {pixelscale}"
            )));
        }
        let kernel_shape = (2 * ny - 1, 2 * nx - 1);
        let offset = |i: usize, n: usize| (T::cast_usize(i) - T::cast_usize(n - 1)) * pixelscale;
        let kernel = |f: &dyn Fn(T, T, T) -> T| {
            Array2::from_shape_fn(kernel_shape, |(i, j)| {
                let (dx, dy) = (offset(j, nx), offset(i, ny));
                let r2 = dx * dx + dy * dy;
                if r2 == T::zero() { T::zero() } else { f(dx, dy, r2) }
            })
        };
        let kernel_x = kernel(&|dx, _, r2| dx / r2);
        let kernel_y = kernel(&|_, dy, r2| dy / r2);
        let kernel_psi = kernel(&|_, _, r2| T::half() * r2.ln());
        let engine = match mode {
            ConvolutionMode::Fft => Engine::Fft {
                x: FftConvolver::new(kernel_x.view(), shape)?,
                y: FftConvolver::new(kernel_y.view(), shape)?,
                psi: FftConvolver::new(kernel_psi.view(), shape)?,
            },
            ConvolutionMode::Conv2d => Engine::Conv2d,
        };
        Ok(Self {
            pixelscale,
            shape,
            kernel_x,
            kernel_y,
            kernel_psi,
            engine,
        })
    }

    pub fn pixelscale(&self) -> T {
        self.pixelscale
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn mode(&self) -> ConvolutionMode {
        match self.engine {
            Engine::Fft { .. } => ConvolutionMode::Fft,
            Engine::Conv2d => ConvolutionMode::Conv2d,
        }
    }

    fn check_shape(&self, map: &ArrayView2<T>) -> Result<(), LensError> {
        if map.dim() == self.shape {
            Ok(())
        } else {
            Err(LensError::ShapeMismatch {
                actual: map.dim(),
                expected: self.shape,
            })
        }
    }

    fn apply(
        &self,
        map: ArrayView2<T>,
        kernel: &Array2<T>,
        convolver: Option<&FftConvolver<T>>,
    ) -> Result<Array2<T>, LensError> {
        let mut result = match convolver {
            Some(convolver) => convolver.convolve(map)?,
            None => convolve_same(map, kernel.view()),
        };
        let factor = self.pixelscale * self.pixelscale / T::PI();
        result.mapv_inplace(|v| v * factor);
        Ok(result)
    }

    /// Deflection at the pixel centres of the map
    pub fn deflection_maps(&self, map: ArrayView2<T>) -> Result<(Array2<T>, Array2<T>), LensError> {
        self.check_shape(&map)?;
        let (cx, cy) = match &self.engine {
            Engine::Fft { x, y, .. } => (Some(x), Some(y)),
            Engine::Conv2d => (None, None),
        };
        Ok((
            self.apply(map, &self.kernel_x, cx)?,
            self.apply(map, &self.kernel_y, cy)?,
        ))
    }

    /// Potential at the pixel centres of the map
    pub fn potential_map(&self, map: ArrayView2<T>) -> Result<Array2<T>, LensError> {
        self.check_shape(&map)?;
        let convolver = match &self.engine {
            Engine::Fft { psi, .. } => Some(psi),
            Engine::Conv2d => None,
        };
        self.apply(map, &self.kernel_psi, convolver)
    }
}

/// Deflection at `(x, y)` of the map centred on `(x0, y0)`
pub fn reduced_deflection_angle<T: Float>(
    kernels: &PixelatedKernels<T>,
    map: ArrayView2<T>,
    x0: T,
    y0: T,
    x: ArrayView2<T>,
    y: ArrayView2<T>,
) -> Result<(Array2<T>, Array2<T>), LensError> {
    let (ax, ay) = kernels.deflection_maps(map)?;
    let ax = Bilinear::new(ax.view(), kernels.pixelscale, x0, y0)?.eval_grid(x, y);
    let ay = Bilinear::new(ay.view(), kernels.pixelscale, x0, y0)?.eval_grid(x, y);
    Ok((ax, ay))
}

pub fn potential<T: Float>(
    kernels: &PixelatedKernels<T>,
    map: ArrayView2<T>,
    x0: T,
    y0: T,
    x: ArrayView2<T>,
    y: ArrayView2<T>,
) -> Result<Array2<T>, LensError> {
    let psi = kernels.potential_map(map)?;
    Ok(Bilinear::new(psi.view(), kernels.pixelscale, x0, y0)?.eval_grid(x, y))
}

pub fn convergence<T: Float>(
    kernels: &PixelatedKernels<T>,
    map: ArrayView2<T>,
    x0: T,
    y0: T,
    x: ArrayView2<T>,
    y: ArrayView2<T>,
) -> Result<Array2<T>, LensError> {
    kernels.check_shape(&map)?;
    Ok(Bilinear::new(map, kernels.pixelscale, x0, y0)?.eval_grid(x, y))
}
