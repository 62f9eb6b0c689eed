pub use crate::cosmology::Cosmology;
pub use crate::lenses::{LensTrait, ProfileTrait};
pub use crate::light::LightTrait;
