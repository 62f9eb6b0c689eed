//! Image simulators

mod lens_source;
pub use lens_source::{ForwardFlags, LensSource, LensSourceConfig};
