//! Surface brightness models of sources and lens galaxies

pub mod func;

#[allow(clippy::module_inception)]
mod light;
pub use light::{Light, LightTrait};

mod pixelated;
pub use pixelated::PixelatedSource;

mod sersic;
pub use sersic::Sersic;
