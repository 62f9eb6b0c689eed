use crate::geometry::meshgrid;
use crate::lenses::lens::*;

use itertools::{Itertools, izip};
use ndarray::{Array1, Axis};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e12;

/// Settings of [LensTrait::forward_raytrace]
///
/// Levenberg-Marquardt iterations start from a `n_init` x `n_init` grid of seeds covering a
/// square field of view. A seed is an image when its source plane position is closer than
/// `epsilon` to the source, images closer than `merge_radius` to each other are merged.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct ImageSearch<T> {
    /// Side of the seeded field of view, arcsec
    pub fov: T,
    /// Centre of the field of view, arcsec
    pub center: (T, T),
    /// Seeds per side
    pub n_init: usize,
    pub max_iter: usize,
    /// Source plane tolerance, arcsec
    pub epsilon: T,
    /// Step of the finite-difference Jacobian, arcsec
    pub step: T,
    pub merge_radius: T,
}

impl<T> ImageSearch<T>
where
    T: Float,
{
    /// Field of view of side `fov` centred at the origin
    pub fn new(fov: T) -> Self {
        let tolerance = fov * T::epsilon().sqrt();
        Self {
            fov,
            center: (T::zero(), T::zero()),
            n_init: 30,
            max_iter: 100,
            epsilon: tolerance,
            step: tolerance,
            merge_radius: fov * T::cast(1e-3),
        }
    }

    pub fn with_center(mut self, x: T, y: T) -> Self {
        self.center = (x, y);
        self
    }

    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_epsilon(mut self, epsilon: T) -> Self {
        self.epsilon = epsilon;
        self
    }

    fn check(&self) -> Result<(), LensError> {
        let positive = [self.fov, self.epsilon, self.step, self.merge_radius]
            .iter()
            .all(|&v| v > T::zero() && v.is_finite());
        if positive && self.n_init > 0 {
            Ok(())
        } else {
            Err(LensError::InvalidConfiguration(format!(
                "image search needs a positive field of view, tolerances and seed count, got {self:?}"
            )))
        }
    }
}

struct Seed<T> {
    x: T,
    y: T,
    residual: (T, T),
    lambda: T,
}

impl<T: Float> Seed<T> {
    fn error(&self) -> T {
        self.residual.0.hypot(self.residual.1)
    }

    /// Damped Gauss-Newton step from residuals at `x + h` and `y + h`
    fn trial(&self, shifted_x: (T, T), shifted_y: (T, T), h: T) -> (T, T) {
        let (rx, ry) = self.residual;
        let (j11, j21) = ((shifted_x.0 - rx) / h, (shifted_x.1 - ry) / h);
        let (j12, j22) = ((shifted_y.0 - rx) / h, (shifted_y.1 - ry) / h);
        // (J^T J + lambda I) d = -J^T r
        let a11 = j11 * j11 + j21 * j21 + self.lambda;
        let a22 = j12 * j12 + j22 * j22 + self.lambda;
        let a12 = j11 * j12 + j21 * j22;
        let g1 = j11 * rx + j21 * ry;
        let g2 = j12 * rx + j22 * ry;
        let det = a11 * a22 - a12 * a12;
        if !(det > T::zero()) || !det.is_finite() {
            return (self.x, self.y);
        }
        (
            self.x - (a22 * g1 - a12 * g2) / det,
            self.y - (a11 * g2 - a12 * g1) / det,
        )
    }

    fn update(&mut self, position: (T, T), residual: (T, T)) {
        if residual.0.hypot(residual.1) < self.error() {
            (self.x, self.y) = position;
            self.residual = residual;
            self.lambda = (self.lambda / T::cast(10.0)).max(T::cast(LAMBDA_MIN));
        } else {
            self.lambda = (self.lambda * T::cast(10.0)).min(T::cast(LAMBDA_MAX));
        }
    }
}

fn row<T: Float>(values: Vec<T>) -> Array2<T> {
    Array1::from(values).insert_axis(Axis(0))
}

/// `raytrace(theta) - beta` for a batch of positions
fn residuals<T, L>(
    lens: &L,
    positions: impl Iterator<Item = (T, T)>,
    beta: (T, T),
    z_s: T,
    pack: &ParamPack<T>,
) -> Result<Vec<(T, T)>, LensError>
where
    T: Float,
    L: LensTrait<T>,
{
    let (x, y): (Vec<T>, Vec<T>) = positions.unzip();
    let (bx, by) = lens.raytrace(row(x).view(), row(y).view(), z_s, pack)?;
    Ok(bx
        .iter()
        .zip(by.iter())
        .map(|(&bx, &by)| (bx - beta.0, by - beta.1))
        .collect())
}

pub(super) fn forward_raytrace<T, L>(
    lens: &L,
    bx: T,
    by: T,
    z_s: T,
    pack: &ParamPack<T>,
    search: &ImageSearch<T>,
) -> Result<Vec<(T, T)>, LensError>
where
    T: Float,
    L: LensTrait<T>,
{
    search.check()?;
    let beta = (bx, by);
    let h = search.step;
    let (gx, gy) = meshgrid(
        search.fov / T::cast_usize(search.n_init),
        search.n_init,
        search.n_init,
    );
    let starts: Vec<(T, T)> = gx
        .iter()
        .zip(gy.iter())
        .map(|(&x, &y)| (x + search.center.0, y + search.center.1))
        .collect();
    let initial = residuals(lens, starts.iter().copied(), beta, z_s, pack)?;
    let mut seeds: Vec<Seed<T>> = starts
        .into_iter()
        .zip(initial)
        .map(|((x, y), residual)| Seed {
            x,
            y,
            residual,
            lambda: T::cast(LAMBDA_INIT),
        })
        .collect();

    for _ in 0..search.max_iter {
        if seeds.iter().all(|seed| seed.error() < search.epsilon) {
            break;
        }
        let shifted_x = residuals(lens, seeds.iter().map(|s| (s.x + h, s.y)), beta, z_s, pack)?;
        let shifted_y = residuals(lens, seeds.iter().map(|s| (s.x, s.y + h)), beta, z_s, pack)?;
        let trials: Vec<(T, T)> = izip!(&seeds, shifted_x, shifted_y)
            .map(|(seed, sx, sy)| seed.trial(sx, sy, h))
            .collect();
        let trial_residuals = residuals(lens, trials.iter().copied(), beta, z_s, pack)?;
        for (seed, position, residual) in izip!(&mut seeds, trials, trial_residuals) {
            seed.update(position, residual);
        }
    }

    let mut images: Vec<(T, T)> = Vec::new();
    let converged = seeds
        .iter()
        .filter(|seed| seed.error() < search.epsilon)
        .sorted_by(|a, b| a.error().partial_cmp(&b.error()).unwrap_or(Ordering::Equal));
    for seed in converged {
        if images
            .iter()
            .all(|&(x, y)| (seed.x - x).hypot(seed.y - y) > search.merge_radius)
        {
            images.push((seed.x, seed.y));
        }
    }
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cosmology::FlatLambdaCdm;
    use crate::lenses::profiles::{Sie, Sis};
    use crate::lenses::thin_lens::ThinLens;

    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use std::sync::Arc;

    fn lens(profile: impl Into<crate::lenses::Profile<f64>>) -> ThinLens<f64> {
        ThinLens::new("lens", Arc::new(FlatLambdaCdm::<f64>::default()), profile).with_z_l(0.5)
    }

    fn pack() -> ParamPack<f64> {
        ParamPack::new()
            .with("lens", "x0", 0.0)
            .with("lens", "y0", 0.0)
            .with("lens", "q", 0.7)
            .with("lens", "phi", 0.0)
            .with("lens", "Rein", 1.0)
    }

    #[test]
    fn isothermal_sphere_has_two_images() {
        let lens = lens(Sis::new());
        let images = lens
            .forward_raytrace(0.3, 0.0, 1.5, &pack(), &ImageSearch::new(4.0))
            .unwrap();
        assert_eq!(images.len(), 2);
        let (mut xs, ys): (Vec<f64>, Vec<f64>) = images.into_iter().unzip();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        // beta -+ Rein along the source direction
        assert_abs_diff_eq!(xs[0], -0.7, epsilon = 1e-6);
        assert_abs_diff_eq!(xs[1], 1.3, epsilon = 1e-6);
        for y in ys {
            assert_abs_diff_eq!(y, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn source_inside_the_caustic_of_an_ellipsoid() {
        let lens = lens(Sie::new());
        let pack = pack();
        let images = lens
            .forward_raytrace(0.03, 0.02, 1.5, &pack, &ImageSearch::new(4.0))
            .unwrap();
        assert_eq!(images.len(), 4);
        for (x, y) in images {
            let (bx, by) = lens
                .raytrace(array![[x]].view(), array![[y]].view(), 1.5, &pack)
                .unwrap();
            assert_abs_diff_eq!(bx[[0, 0]], 0.03, epsilon = 1e-6);
            assert_abs_diff_eq!(by[[0, 0]], 0.02, epsilon = 1e-6);
        }
    }

    #[test]
    fn search_field_around_one_image() {
        let lens = lens(Sis::new());
        let search = ImageSearch::new(1.0).with_center(1.3, 0.0).with_n_init(10);
        let images = lens
            .forward_raytrace(0.3, 0.0, 1.5, &pack(), &search)
            .unwrap();
        assert_eq!(images.len(), 1);
        assert_abs_diff_eq!(images[0].0, 1.3, epsilon = 1e-6);
    }

    #[test]
    fn invalid_search() {
        let lens = lens(Sis::new());
        let search = ImageSearch::new(4.0).with_n_init(0);
        assert!(matches!(
            lens.forward_raytrace(0.3, 0.0, 1.5, &pack(), &search),
            Err(LensError::InvalidConfiguration(_))
        ));
    }
}
