use crate::float_trait::Float;

use ndarray::{Array2, ArrayView2, s};

/// Sum over non-overlapping `factor × factor` blocks
///
/// This is average pooling without the division: the flux of the fine pixels is preserved.
pub fn sum_pool<T: Float>(image: ArrayView2<T>, factor: usize) -> Array2<T> {
    assert!(factor > 0, "downsampling factor must be positive");
    let (ny, nx) = image.dim();
    assert!(
        ny % factor == 0 && nx % factor == 0,
        "image shape {:?} is not a multiple of the downsampling factor {}",
        (ny, nx),
        factor
    );
    if factor == 1 {
        return image.to_owned();
    }
    Array2::from_shape_fn((ny / factor, nx / factor), |(i, j)| {
        image
            .slice(s![i * factor..(i + 1) * factor, j * factor..(j + 1) * factor])
            .sum()
    })
}

/// Drop `pad_y` rows and `pad_x` columns from both sides
pub fn crop<T: Float>(image: ArrayView2<T>, (pad_y, pad_x): (usize, usize)) -> Array2<T> {
    let (ny, nx) = image.dim();
    assert!(
        2 * pad_y <= ny && 2 * pad_x <= nx,
        "cannot crop {:?} pixels from {:?} image",
        (pad_y, pad_x),
        (ny, nx)
    );
    image
        .slice(s![pad_y..ny - pad_y, pad_x..nx - pad_x])
        .to_owned()
}
