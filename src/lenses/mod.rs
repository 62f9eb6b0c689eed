//! Gravitational lenses: single-plane profiles and multi-plane ray tracing

mod context;
pub use context::LensContext;

pub mod func;

mod image_search;
pub use image_search::ImageSearch;

mod lens;
pub use lens::{Lens, LensTrait};

mod multiplane;
pub use multiplane::Multiplane;

pub mod profiles;
pub use profiles::{Profile, ProfileTrait};

mod thin_lens;
pub use thin_lens::ThinLens;
