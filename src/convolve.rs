//! "Same"-size 2-D convolution, spatial and FFT-based

use crate::error::{LensError, SimulatorError};
use crate::fft::{Fft2, next_fast_len};
use crate::float_trait::Float;

use ndarray::{Array2, ArrayView2, Zip, s};
use num_complex::Complex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a kernel is applied to an image
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ConvolutionMode {
    /// Multiplication of zero-padded spectra
    #[default]
    Fft,
    /// Direct sum over the kernel
    Conv2d,
}

impl FromStr for ConvolutionMode {
    type Err = SimulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fft" => Ok(Self::Fft),
            "conv2d" => Ok(Self::Conv2d),
            _ => Err(SimulatorError::UnknownConvolutionMode(s.to_owned())),
        }
    }
}

/// Zero-padded convolution with the output of the image size
///
/// `out[i, j] = sum_{k, l} image[i + ky / 2 - k, j + kx / 2 - l] * kernel[k, l]`, so a kernel
/// with a single non-zero centre pixel is the identity for odd kernel sides.
pub fn convolve_same<T: Float>(image: ArrayView2<T>, kernel: ArrayView2<T>) -> Array2<T> {
    let (ny, nx) = image.dim();
    let (ky, kx) = kernel.dim();
    let (cy, cx) = (ky / 2, kx / 2);
    let mut output = Array2::zeros((ny, nx));
    for ((k, l), &w) in kernel.indexed_iter() {
        if w == T::zero() {
            continue;
        }
        // output rows i with 0 <= i + cy - k < ny
        let i_start = k.saturating_sub(cy);
        let i_end = (ny + k).saturating_sub(cy).min(ny);
        let j_start = l.saturating_sub(cx);
        let j_end = (nx + l).saturating_sub(cx).min(nx);
        if i_start >= i_end || j_start >= j_end {
            continue;
        }
        let source = image.slice(s![
            i_start + cy - k..i_end + cy - k,
            j_start + cx - l..j_end + cx - l
        ]);
        Zip::from(output.slice_mut(s![i_start..i_end, j_start..j_end]))
            .and(&source)
            .for_each(|o, &x| *o += x * w);
    }
    output
}

/// FFT convolution of images of a fixed shape with a fixed kernel
///
/// The kernel spectrum is computed once. Both arrays are zero-padded to
/// `next_fast_len(n + k - 1)` along every axis, so the result is the linear convolution without
/// any wrap-around, cropped like [convolve_same].
#[derive(Debug)]
pub struct FftConvolver<T: Float> {
    fft: Fft2<T>,
    kernel_spectrum: Array2<Complex<T>>,
    image_shape: (usize, usize),
    kernel_shape: (usize, usize),
}

impl<T: Float> FftConvolver<T> {
    pub fn new(kernel: ArrayView2<T>, image_shape: (usize, usize)) -> Result<Self, LensError> {
        let kernel_shape = kernel.dim();
        if kernel_shape.0 == 0 || kernel_shape.1 == 0 || image_shape.0 == 0 || image_shape.1 == 0
        {
            return Err(LensError::InvalidConfiguration(format!(
                "cannot convolve {image_shape:?} image with {kernel_shape:?} kernel"
            )));
        }
        let fft = Fft2::new(
            next_fast_len(image_shape.0 + kernel_shape.0 - 1),
            next_fast_len(image_shape.1 + kernel_shape.1 - 1),
        );
        let kernel_spectrum = fft.forward(kernel)?;
        Ok(Self {
            fft,
            kernel_spectrum,
            image_shape,
            kernel_shape,
        })
    }

    /// Shape of the padded transform
    pub fn fft_shape(&self) -> (usize, usize) {
        self.fft.shape()
    }

    pub fn image_shape(&self) -> (usize, usize) {
        self.image_shape
    }

    pub fn convolve(&self, image: ArrayView2<T>) -> Result<Array2<T>, LensError> {
        if image.dim() != self.image_shape {
            return Err(LensError::ShapeMismatch {
                actual: image.dim(),
                expected: self.image_shape,
            });
        }
        let mut spectrum = self.fft.forward(image)?;
        Zip::from(&mut spectrum)
            .and(&self.kernel_spectrum)
            .for_each(|s, &k| *s = *s * k);
        let full = self.fft.inverse(spectrum)?;
        let (oy, ox) = (self.kernel_shape.0 / 2, self.kernel_shape.1 / 2);
        let (ny, nx) = self.image_shape;
        Ok(full.slice(s![oy..oy + ny, ox..ox + nx]).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::prelude::*;

    #[test]
    fn mode_from_str() {
        assert_eq!("fft".parse::<ConvolutionMode>().unwrap(), ConvolutionMode::Fft);
        assert_eq!(
            "conv2d".parse::<ConvolutionMode>().unwrap(),
            ConvolutionMode::Conv2d
        );
        assert_eq!(
            "fourier".parse::<ConvolutionMode>().unwrap_err(),
            SimulatorError::UnknownConvolutionMode("fourier".to_owned())
        );
    }

    #[test]
    fn mode_serde_is_lowercase() {
        let json = serde_json::to_string(&ConvolutionMode::Conv2d).unwrap();
        assert_eq!(json, r#""conv2d""#);
    }

    #[test]
    fn kernel_is_flipped() {
        let image = array![[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        let kernel = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        // convolution of an impulse reproduces the kernel, a correlation would flip it
        assert_eq!(convolve_same(image.view(), kernel.view()), kernel);
    }

    #[test]
    fn edges_are_zero_padded() {
        let image = Array2::<f64>::ones((3, 4));
        let kernel = Array2::<f64>::ones((3, 3));
        let out = convolve_same(image.view(), kernel.view());
        assert_eq!(out[[0, 0]], 4.0);
        assert_eq!(out[[1, 1]], 9.0);
        assert_eq!(out[[0, 1]], 6.0);
    }

    #[test]
    fn fft_matches_direct_sum() {
        let mut rng = StdRng::seed_from_u64(42);
        for ((ny, nx), (ky, kx)) in [((16, 12), (5, 5)), ((9, 11), (4, 7)), ((7, 7), (13, 13))] {
            let image = Array2::from_shape_simple_fn((ny, nx), || rng.random::<f64>());
            let kernel = Array2::from_shape_simple_fn((ky, kx), || rng.random::<f64>());
            let direct = convolve_same(image.view(), kernel.view());
            let convolver = FftConvolver::new(kernel.view(), (ny, nx)).unwrap();
            let fft = convolver.convolve(image.view()).unwrap();
            assert_abs_diff_eq!(fft, direct, epsilon = 1e-10);
        }
    }

    #[test]
    fn wrong_image_shape() {
        let kernel = Array2::<f64>::ones((3, 3));
        let convolver = FftConvolver::new(kernel.view(), (8, 8)).unwrap();
        let image = Array2::<f64>::ones((8, 9));
        assert!(convolver.convolve(image.view()).is_err());
    }
}
