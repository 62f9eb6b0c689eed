//! Thin-lens mass profiles with their parameter declarations

mod profile;
pub use profile::{Profile, ProfileTrait};

mod epl;
pub use epl::Epl;

mod external_shear;
pub use external_shear::ExternalShear;

mod mass_sheet;
pub use mass_sheet::MassSheet;

mod multipole;
pub use multipole::Multipole;

mod nfw;
pub use nfw::Nfw;

mod pixelated;
pub use pixelated::PixelatedConvergence;

mod point;
pub use point::Point;

mod pseudo_jaffe;
pub use pseudo_jaffe::PseudoJaffe;

mod sie;
pub use sie::Sie;

mod sis;
pub use sis::Sis;

mod tnfw;
pub use tnfw::{Tnfw, TnfwMassConvention};
