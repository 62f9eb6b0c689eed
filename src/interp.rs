use crate::error::LensError;
use crate::float_trait::Float;

use ndarray::{Array2, ArrayView2, Zip};

/// Bilinear interpolation of a pixel map placed on the sky
///
/// The map is centred on `(x0, y0)` with square pixels of size `pixelscale`, row index growing
/// with `y` and column index growing with `x`, like [meshgrid](crate::geometry::meshgrid).
/// Positions outside the pixel centres of the map evaluate to zero.
#[derive(Clone, Debug)]
pub struct Bilinear<'a, T> {
    map: ArrayView2<'a, T>,
    pixelscale: T,
    x0: T,
    y0: T,
}

impl<'a, T: Float> Bilinear<'a, T> {
    pub fn new(map: ArrayView2<'a, T>, pixelscale: T, x0: T, y0: T) -> Result<Self, LensError> {
        let (ny, nx) = map.dim();
        if nx < 2 || ny < 2 {
            return Err(LensError::ShapeMismatch {
                actual: (ny, nx),
                expected: (ny.max(2), nx.max(2)),
            });
        }
        if pixelscale <= T::zero() {
            return Err(LensError::InvalidConfiguration(format!(
                "pixelscale must be positive, got {pixelscale}"
            )));
        }
        Ok(Self {
            map,
            pixelscale,
            x0,
            y0,
        })
    }

    fn fractional_index(&self, coord: T, origin: T, n: usize) -> Option<(usize, T)> {
        let last = T::cast_usize(n - 1);
        let f = (coord - origin) / self.pixelscale + last * T::half();
        if !(f >= T::zero() && f <= last) {
            return None;
        }
        let i = f.floor().to_usize()?.min(n - 2);
        Some((i, f - T::cast_usize(i)))
    }

    pub fn eval(&self, x: T, y: T) -> T {
        let (ny, nx) = self.map.dim();
        let (Some((j, tx)), Some((i, ty))) = (
            self.fractional_index(x, self.x0, nx),
            self.fractional_index(y, self.y0, ny),
        ) else {
            return T::zero();
        };
        let m = &self.map;
        let one = T::one();
        (one - ty) * ((one - tx) * m[[i, j]] + tx * m[[i, j + 1]])
            + ty * ((one - tx) * m[[i + 1, j]] + tx * m[[i + 1, j + 1]])
    }

    pub fn eval_grid(&self, x: ArrayView2<T>, y: ArrayView2<T>) -> Array2<T> {
        Zip::from(&x).and(&y).map_collect(|&x, &y| self.eval(x, y))
    }
}
