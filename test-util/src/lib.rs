pub use derivatives::{central_gradient, central_laplacian};
pub use kernels::{gaussian_kernel, impulse_kernel};
pub use symmetry::max_point_asymmetry;
pub use grids::random_positions;

mod derivatives;
mod grids;
mod kernels;
mod symmetry;
