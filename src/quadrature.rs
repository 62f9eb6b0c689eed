//! Gauss-Legendre sub-pixel quadrature

use crate::float_trait::Float;

use ndarray::{Array2, ArrayView2, Zip, s};
use std::f64::consts::PI;

/// Nodes and weights of the `n`-point Gauss-Legendre rule on `[-1, 1]`
///
/// Roots of the Legendre polynomial are found with Newton iterations in `f64` and converted to
/// `T` at the end. Nodes are in ascending order, weights sum to 2.
pub fn gauss_legendre<T: Float>(n: usize) -> (Vec<T>, Vec<T>) {
    assert!(n > 0, "quadrature needs at least one node");
    let mut nodes = vec![0.0_f64; n];
    let mut weights = vec![0.0_f64; n];
    let m = n.div_ceil(2);
    let n_f = n as f64;
    for i in 0..m {
        let mut z = (PI * (i as f64 + 0.75) / (n_f + 0.5)).cos();
        let mut dp = 1.0;
        for _ in 0..100 {
            // Legendre recurrence for P_n(z) and P_{n-1}(z)
            let mut p1 = 1.0;
            let mut p2 = 0.0;
            for j in 0..n {
                let p3 = p2;
                p2 = p1;
                let j = j as f64;
                p1 = ((2.0 * j + 1.0) * z * p2 - j * p3) / (j + 1.0);
            }
            dp = n_f * (z * p1 - p2) / (z * z - 1.0);
            let dz = p1 / dp;
            z -= dz;
            if dz.abs() < 1e-15 {
                break;
            }
        }
        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        let w = 2.0 / ((1.0 - z * z) * dp * dp);
        weights[i] = w;
        weights[n - 1 - i] = w;
    }
    (
        nodes.into_iter().map(T::cast).collect(),
        weights.into_iter().map(T::cast).collect(),
    )
}

/// Sub-pixel sampling grid with `level × level` Gauss-Legendre nodes per pixel
#[derive(Clone, Debug)]
pub struct QuadratureGrid<T> {
    pub x: Array2<T>,
    pub y: Array2<T>,
    /// Per-pixel weights of shape `(level, level)`, summing to one
    pub weights: Array2<T>,
}

impl<T: Float> QuadratureGrid<T> {
    /// Refine the pixel-centred grid `(x, y)` with the given pixel size
    ///
    /// The output arrays have shape `(ny * level, nx * level)`: the samples of the pixel
    /// `(i, j)` occupy the block `[i * level..(i + 1) * level, j * level..(j + 1) * level]`.
    pub fn new(x: ArrayView2<T>, y: ArrayView2<T>, pixelscale: T, level: usize) -> Self {
        assert_eq!(x.dim(), y.dim(), "x and y grids must have the same shape");
        let (nodes, node_weights) = gauss_legendre::<T>(level);
        let half_pixel = pixelscale * T::half();
        let (ny, nx) = x.dim();
        let fine_x = Array2::from_shape_fn((ny * level, nx * level), |(i, j)| {
            x[[i / level, j / level]] + nodes[j % level] * half_pixel
        });
        let fine_y = Array2::from_shape_fn((ny * level, nx * level), |(i, j)| {
            y[[i / level, j / level]] + nodes[i % level] * half_pixel
        });
        let weights = Array2::from_shape_fn((level, level), |(a, b)| {
            node_weights[a] * node_weights[b] / T::four()
        });
        Self {
            x: fine_x,
            y: fine_y,
            weights,
        }
    }

    pub fn level(&self) -> usize {
        self.weights.nrows()
    }

    /// Weighted sum of the samples of every pixel
    pub fn integrate(&self, values: ArrayView2<T>) -> Array2<T> {
        quadrature_integrator(values, self.weights.view())
    }
}

/// Collapse `(level × level)` blocks of `values` with the quadrature `weights`
pub fn quadrature_integrator<T: Float>(values: ArrayView2<T>, weights: ArrayView2<T>) -> Array2<T> {
    let level = weights.nrows();
    assert_eq!(weights.ncols(), level, "quadrature weights must be square");
    let (fine_ny, fine_nx) = values.dim();
    assert!(
        fine_ny % level == 0 && fine_nx % level == 0,
        "values shape must be a multiple of the quadrature level"
    );
    Array2::from_shape_fn((fine_ny / level, fine_nx / level), |(i, j)| {
        let block = values.slice(s![i * level..(i + 1) * level, j * level..(j + 1) * level]);
        let mut sum = T::zero();
        Zip::from(&block)
            .and(&weights)
            .for_each(|&v, &w| sum += v * w);
        sum
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::geometry::meshgrid;

    use approx::assert_relative_eq;

    #[test]
    fn known_three_point_rule() {
        let (nodes, weights) = gauss_legendre::<f64>(3);
        let x = f64::sqrt(0.6);
        assert_relative_eq!(nodes[0], -x, epsilon = 1e-14);
        assert_relative_eq!(nodes[1], 0.0, epsilon = 1e-14);
        assert_relative_eq!(nodes[2], x, epsilon = 1e-14);
        assert_relative_eq!(weights[0], 5.0 / 9.0, epsilon = 1e-14);
        assert_relative_eq!(weights[1], 8.0 / 9.0, epsilon = 1e-14);
    }

    #[test]
    fn polynomials_up_to_degree_2n_minus_1_are_exact() {
        for n in 1..=8 {
            let (nodes, weights) = gauss_legendre::<f64>(n);
            for degree in 0..2 * n {
                let actual: f64 = nodes
                    .iter()
                    .zip(weights.iter())
                    .map(|(&x, &w)| w * x.powi(degree as i32))
                    .sum();
                let desired = if degree % 2 == 1 {
                    0.0
                } else {
                    2.0 / (degree as f64 + 1.0)
                };
                assert_relative_eq!(actual, desired, epsilon = 1e-13);
            }
        }
    }

    #[test]
    fn weights_sum_to_one_per_pixel() {
        let (x, y) = meshgrid(0.1_f64, 4, 3);
        let grid = QuadratureGrid::new(x.view(), y.view(), 0.1, 3);
        assert_eq!(grid.x.dim(), (9, 12));
        assert_eq!(grid.level(), 3);
        assert_relative_eq!(grid.weights.sum(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn constant_is_integrated_exactly() {
        let (x, y) = meshgrid(0.05_f64, 5, 6);
        let grid = QuadratureGrid::new(x.view(), y.view(), 0.05, 4);
        let values = Array2::from_elem(grid.x.dim(), 2.5);
        let integrated = grid.integrate(values.view());
        assert_eq!(integrated.dim(), (6, 5));
        for &v in integrated.iter() {
            assert_relative_eq!(v, 2.5, epsilon = 1e-13);
        }
    }

    #[test]
    fn linear_brightness_gives_pixel_centre_value() {
        let (x, y) = meshgrid(0.2_f64, 3, 3);
        let grid = QuadratureGrid::new(x.view(), y.view(), 0.2, 2);
        let values = Zip::from(&grid.x)
            .and(&grid.y)
            .map_collect(|&x, &y| 1.0 + 2.0 * x - 3.0 * y);
        let integrated = grid.integrate(values.view());
        Zip::from(&integrated)
            .and(&x)
            .and(&y)
            .for_each(|&v, &x, &y| assert_relative_eq!(v, 1.0 + 2.0 * x - 3.0 * y, epsilon = 1e-13));
    }
}
