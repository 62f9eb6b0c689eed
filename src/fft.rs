//! Two-dimensional real FFT built from `realfft` row transforms and `rustfft` column transforms

use crate::error::LensError;
use crate::float_trait::Float;

use ndarray::{Array2, ArrayView2, Axis};
use num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// The smallest integer `m >= n` with no prime factors other than 2, 3 and 5
pub fn next_fast_len(n: usize) -> usize {
    let is_smooth = |mut m: usize| {
        for p in [2, 3, 5] {
            while m % p == 0 {
                m /= p;
            }
        }
        m == 1
    };
    let mut m = n.max(1);
    while !is_smooth(m) {
        m += 1;
    }
    m
}

/// Planned real-to-complex FFT of `(ny, nx)` arrays and its inverse
///
/// The spectrum has shape `(ny, nx / 2 + 1)`. The inverse transform is normalised, so
/// `inverse(forward(a)) == a`.
pub struct Fft2<T: Float> {
    shape: (usize, usize),
    row_forward: Arc<dyn RealToComplex<T>>,
    row_inverse: Arc<dyn ComplexToReal<T>>,
    column_forward: Arc<dyn Fft<T>>,
    column_inverse: Arc<dyn Fft<T>>,
}

impl<T: Float> fmt::Debug for Fft2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft2").field("shape", &self.shape).finish()
    }
}

impl<T: Float> Fft2<T> {
    pub fn new(ny: usize, nx: usize) -> Self {
        assert!(ny > 0 && nx > 0, "FFT shape must be non-empty");
        let mut real_planner = RealFftPlanner::<T>::new();
        let mut planner = FftPlanner::<T>::new();
        Self {
            shape: (ny, nx),
            row_forward: real_planner.plan_fft_forward(nx),
            row_inverse: real_planner.plan_fft_inverse(nx),
            column_forward: planner.plan_fft_forward(ny),
            column_inverse: planner.plan_fft_inverse(ny),
        }
    }

    /// Real-space shape `(ny, nx)`
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn spectrum_shape(&self) -> (usize, usize) {
        (self.shape.0, self.shape.1 / 2 + 1)
    }

    /// Forward transform, `input` is zero-padded at the high-index end up to the FFT shape
    pub fn forward(&self, input: ArrayView2<T>) -> Result<Array2<Complex<T>>, LensError> {
        let (ny, nx) = self.shape;
        let (in_ny, in_nx) = input.dim();
        if in_ny > ny || in_nx > nx {
            return Err(LensError::ShapeMismatch {
                actual: (in_ny, in_nx),
                expected: self.shape,
            });
        }

        let mut spectrum = Array2::zeros(self.spectrum_shape());
        let mut row = self.row_forward.make_input_vec();
        let mut row_spectrum = self.row_forward.make_output_vec();
        let mut scratch = self.row_forward.make_scratch_vec();
        for (i, input_row) in input.outer_iter().enumerate() {
            row.fill(T::zero());
            row[..in_nx]
                .iter_mut()
                .zip(input_row.iter())
                .for_each(|(r, &x)| *r = x);
            self.row_forward
                .process_with_scratch(&mut row, &mut row_spectrum, &mut scratch)?;
            spectrum
                .row_mut(i)
                .iter_mut()
                .zip(row_spectrum.iter())
                .for_each(|(s, &c)| *s = c);
        }

        self.columns(&mut spectrum, &self.column_forward);
        Ok(spectrum)
    }

    /// Normalised inverse transform
    pub fn inverse(&self, mut spectrum: Array2<Complex<T>>) -> Result<Array2<T>, LensError> {
        let (ny, nx) = self.shape;
        if spectrum.dim() != self.spectrum_shape() {
            return Err(LensError::ShapeMismatch {
                actual: spectrum.dim(),
                expected: self.spectrum_shape(),
            });
        }

        self.columns(&mut spectrum, &self.column_inverse);

        let norm = T::one() / T::cast_usize(nx * ny);
        let mut output = Array2::zeros(self.shape);
        let mut row_spectrum = self.row_inverse.make_input_vec();
        let mut row = self.row_inverse.make_output_vec();
        let mut scratch = self.row_inverse.make_scratch_vec();
        let last = row_spectrum.len() - 1;
        for (spectrum_row, mut output_row) in spectrum.outer_iter().zip(output.outer_iter_mut()) {
            row_spectrum
                .iter_mut()
                .zip(spectrum_row.iter())
                .for_each(|(r, &c)| *r = c);
            // c2r requires real DC and Nyquist terms, round-off leaves small imaginary parts
            row_spectrum[0].im = T::zero();
            if nx % 2 == 0 {
                row_spectrum[last].im = T::zero();
            }
            self.row_inverse
                .process_with_scratch(&mut row_spectrum, &mut row, &mut scratch)?;
            output_row
                .iter_mut()
                .zip(row.iter())
                .for_each(|(o, &x)| *o = x * norm);
        }
        Ok(output)
    }

    fn columns(&self, spectrum: &mut Array2<Complex<T>>, plan: &Arc<dyn Fft<T>>) {
        let mut column = vec![Complex::new(T::zero(), T::zero()); self.shape.0];
        let mut scratch =
            vec![Complex::new(T::zero(), T::zero()); plan.get_inplace_scratch_len()];
        for mut lane in spectrum.axis_iter_mut(Axis(1)) {
            column
                .iter_mut()
                .zip(lane.iter())
                .for_each(|(c, &x)| *c = x);
            plan.process_with_scratch(&mut column, &mut scratch);
            lane.iter_mut().zip(column.iter()).for_each(|(x, &c)| *x = c);
        }
    }
}
