//! Parameter declarations and the values supplied at evaluation time

mod pack;
pub use pack::{ParamPack, ParamValue};

mod parameter;
pub use parameter::Parameter;

mod valid;
pub use valid::{Bound, Valid};
