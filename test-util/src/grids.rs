use rand::prelude::*;

/// Reproducible uniform positions in the square `[-half_width, half_width]²`
pub fn random_positions(seed: u64, n: usize, half_width: f64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            (
                rng.random_range(-half_width..half_width),
                rng.random_range(-half_width..half_width),
            )
        })
        .collect()
}
