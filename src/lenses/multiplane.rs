use crate::cosmology::Cosmology;
use crate::lenses::lens::*;
use crate::lenses::thin_lens::ThinLens;
use crate::param::Parameter;

use itertools::Itertools;
use std::cmp::Ordering;
use std::sync::Arc;

/// Ray positions on a source plane together with the accumulated bending
struct PlanePosition<T> {
    x: Array2<T>,
    y: Array2<T>,
    bend_x: Array2<T>,
    bend_y: Array2<T>,
}

/// Running sums of the recursive multi-plane lens equation
struct Accumulator<T> {
    x0: Array2<T>,
    y0: Array2<T>,
    sum_x: Array2<T>,
    sum_y: Array2<T>,
    chi_sum_x: Array2<T>,
    chi_sum_y: Array2<T>,
    planes: usize,
}

impl<T: Float> Accumulator<T> {
    fn new(x: ArrayView2<T>, y: ArrayView2<T>) -> Self {
        Self {
            x0: x.to_owned(),
            y0: y.to_owned(),
            sum_x: Array2::zeros(x.raw_dim()),
            sum_y: Array2::zeros(y.raw_dim()),
            chi_sum_x: Array2::zeros(x.raw_dim()),
            chi_sum_y: Array2::zeros(y.raw_dim()),
            planes: 0,
        }
    }

    /// `theta(chi) = theta_0 - sum alpha_i + sum chi_i alpha_i / chi`
    fn position_at(&self, chi: T) -> PlanePosition<T> {
        if self.planes == 0 {
            return PlanePosition {
                x: self.x0.clone(),
                y: self.y0.clone(),
                bend_x: self.sum_x.clone(),
                bend_y: self.sum_y.clone(),
            };
        }
        let inv_chi = T::one() / chi;
        PlanePosition {
            x: &self.x0 - &self.sum_x + &self.chi_sum_x * inv_chi,
            y: &self.y0 - &self.sum_y + &self.chi_sum_y * inv_chi,
            bend_x: self.sum_x.clone(),
            bend_y: self.sum_y.clone(),
        }
    }

    fn add(&mut self, chi: T, alpha_x: Array2<T>, alpha_y: Array2<T>) {
        self.chi_sum_x.scaled_add(chi, &alpha_x);
        self.chi_sum_y.scaled_add(chi, &alpha_y);
        self.sum_x += &alpha_x;
        self.sum_y += &alpha_y;
        self.planes += 1;
    }
}

/// Several thin lenses at different redshifts
///
/// Rays are traced through the lens planes in the order of increasing redshift, every lens
/// deflects the ray at the position it has on that lens plane. Deflections of the individual
/// lenses are converted to observer-frame angles with the source redshift of the call, so
/// angular parameters like Einstein radii refer to that source.
#[derive(Clone, Debug)]
pub struct Multiplane<T: Float> {
    cosmology: Arc<dyn Cosmology<T>>,
    lenses: Vec<ThinLens<T>>,
}

impl<T> Multiplane<T>
where
    T: Float,
{
    pub fn new(cosmology: Arc<dyn Cosmology<T>>, lenses: Vec<ThinLens<T>>) -> Self {
        Self { cosmology, lenses }
    }

    pub fn lenses(&self) -> &[ThinLens<T>] {
        &self.lenses
    }

    pub fn params(&self) -> Vec<&Parameter<T>> {
        self.lenses.iter().flat_map(|lens| lens.params()).collect()
    }

    fn trace(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_ref: T,
        z_sources: &[T],
        pack: &ParamPack<T>,
    ) -> Result<Vec<PlanePosition<T>>, LensError> {
        if x.dim() != y.dim() {
            return Err(LensError::ShapeMismatch {
                actual: y.dim(),
                expected: x.dim(),
            });
        }
        let lenses: Vec<_> = self
            .lenses
            .iter()
            .map(|lens| lens.resolve_z_l(pack).map(|z_l| (z_l, lens)))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .sorted_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .collect();
        let sources: Vec<_> = z_sources
            .iter()
            .copied()
            .enumerate()
            .sorted_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .collect();

        let mut acc = Accumulator::new(x, y);
        let mut positions: Vec<Option<PlanePosition<T>>> =
            std::iter::repeat_with(|| None).take(z_sources.len()).collect();
        let mut next_source = sources.iter().peekable();
        for (z_l, lens) in lenses {
            while let Some(&&(index, z_s)) = next_source.peek() {
                if z_s > z_l {
                    break;
                }
                positions[index] = Some(acc.position_at(self.cosmology.comoving_distance(z_s)));
                next_source.next();
            }
            if next_source.peek().is_none() {
                break;
            }
            let chi = self.cosmology.comoving_distance(z_l);
            let plane = acc.position_at(chi);
            let (alpha_x, alpha_y) =
                lens.physical_deflection_angle(plane.x.view(), plane.y.view(), z_ref, pack)?;
            acc.add(chi, alpha_x, alpha_y);
        }
        for &(index, z_s) in next_source {
            positions[index] = Some(acc.position_at(self.cosmology.comoving_distance(z_s)));
        }
        Ok(positions.into_iter().flatten().collect())
    }

    /// Ray positions on several source planes
    ///
    /// A lens at or behind a source plane doesn't affect that plane. `z_ref` is the source
    /// redshift the angular lens parameters refer to, it must be larger than every lens redshift
    /// in front of the farthest source.
    pub fn raytrace_to_planes(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_ref: T,
        z_sources: &[T],
        pack: &ParamPack<T>,
    ) -> Result<Vec<(Array2<T>, Array2<T>)>, LensError> {
        Ok(self
            .trace(x, y, z_ref, z_sources, pack)?
            .into_iter()
            .map(|p| (p.x, p.y))
            .collect())
    }

    fn trace_single(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<PlanePosition<T>, LensError> {
        self.trace(x, y, z_s, &[z_s], pack)?
            .pop()
            .ok_or_else(|| LensError::InvalidConfiguration("no source plane traced".to_owned()))
    }
}

impl<T> LensTrait<T> for Multiplane<T>
where
    T: Float,
{
    fn reduced_deflection_angle(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let plane = self.trace_single(x.view(), y.view(), z_s, pack)?;
        Ok((&x - &plane.x, &y - &plane.y))
    }

    /// Sum of the observer-frame deflections of the lenses in front of the source
    fn physical_deflection_angle(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let plane = self.trace_single(x, y, z_s, pack)?;
        Ok((plane.bend_x, plane.bend_y))
    }

    fn raytrace(
        &self,
        x: ArrayView2<T>,
        y: ArrayView2<T>,
        z_s: T,
        pack: &ParamPack<T>,
    ) -> Result<(Array2<T>, Array2<T>), LensError> {
        let plane = self.trace_single(x, y, z_s, pack)?;
        Ok((plane.x, plane.y))
    }
}
