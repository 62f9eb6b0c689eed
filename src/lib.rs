#![doc = include_str!("../README.md")]

pub mod constants;

mod convolve;
pub use convolve::{ConvolutionMode, FftConvolver, convolve_same};

pub mod cosmology;
pub use cosmology::{Cosmology, FlatLambdaCdm};

mod error;
pub use error::{LensError, SimulatorError};

mod fft;
pub use fft::{Fft2, next_fast_len};

mod float_trait;
pub use float_trait::Float;

pub mod geometry;

mod interp;
pub use interp::Bilinear;

pub mod lenses;
pub use lenses::{
    ImageSearch, Lens, LensContext, LensTrait, Multiplane, Profile, ProfileTrait, ThinLens,
};

pub mod light;
pub use light::{Light, LightTrait};

pub mod param;
pub use param::{ParamPack, ParamValue, Parameter, Valid};

pub mod prelude;

pub mod quadrature;

pub mod resample;

pub mod sims;
pub use sims::{ForwardFlags, LensSource, LensSourceConfig};

pub use ndarray;
