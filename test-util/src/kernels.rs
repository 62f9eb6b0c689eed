use ndarray::Array2;

/// Normalised circular Gaussian on a `size × size` grid, `size` must be odd
pub fn gaussian_kernel(size: usize, sigma: f64) -> Array2<f64> {
    assert!(size % 2 == 1, "kernel size must be odd");
    let c = (size / 2) as f64;
    let kernel = Array2::from_shape_fn((size, size), |(i, j)| {
        let dx = j as f64 - c;
        let dy = i as f64 - c;
        f64::exp(-0.5 * (dx * dx + dy * dy) / (sigma * sigma))
    });
    let sum = kernel.sum();
    kernel / sum
}

/// Unit weight in the central pixel of a `size × size` grid, `size` must be odd
pub fn impulse_kernel(size: usize) -> Array2<f64> {
    assert!(size % 2 == 1, "kernel size must be odd");
    let mut kernel = Array2::zeros((size, size));
    kernel[[size / 2, size / 2]] = 1.0;
    kernel
}
