use ndarray::Array2;

/// Largest absolute difference between an image and the image rotated by 180 degrees
pub fn max_point_asymmetry(image: &Array2<f64>) -> f64 {
    let (ny, nx) = image.dim();
    image
        .indexed_iter()
        .map(|((i, j), &v)| (v - image[[ny - 1 - i, nx - 1 - j]]).abs())
        .fold(0.0, f64::max)
}
