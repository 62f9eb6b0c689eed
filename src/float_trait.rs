use ndarray::{LinalgScalar, ScalarOperand};
use num_traits::{FloatConst, NumAssign};
use rustfft::FftNum;
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Display, LowerExp};
use std::iter::Sum;

/// Floating point trait used by every lens and light model, implemented for `f32` and `f64`
///
/// Note that `FftNum` brings `num_traits::Signed` into scope, so `abs` and `signum` are ambiguous
/// for generic code: compare against bounds instead, or call them through `num_traits::Float`
pub trait Float:
    'static
    + Sized
    + num_traits::Float
    + FloatConst
    + NumAssign
    + FftNum
    + LinalgScalar
    + ScalarOperand
    + Sum
    + Debug
    + Display
    + LowerExp
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
    + JsonSchema
{
    fn half() -> Self;
    fn two() -> Self;
    fn three() -> Self;
    fn four() -> Self;
    /// Lossy conversion of a literal constant
    fn cast(x: f64) -> Self;
    /// Lossy conversion of an index or a size
    fn cast_usize(n: usize) -> Self;
}

macro_rules! float_impl {
    ($t: ty) => {
        impl Float for $t {
            #[inline]
            fn half() -> Self {
                0.5
            }

            #[inline]
            fn two() -> Self {
                2.0
            }

            #[inline]
            fn three() -> Self {
                3.0
            }

            #[inline]
            fn four() -> Self {
                4.0
            }

            #[inline]
            fn cast(x: f64) -> Self {
                x as $t
            }

            #[inline]
            fn cast_usize(n: usize) -> Self {
                n as $t
            }
        }
    };
}

float_impl!(f32);
float_impl!(f64);
