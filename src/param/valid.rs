use crate::error::LensError;
use crate::float_trait::Float;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One side of a parameter range
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub enum Bound {
    Inclusive(f64),
    Exclusive(f64),
}

/// Valid range of a scalar parameter
///
/// Cyclic parameters, like position angles, are wrapped into `[start, start + period)` instead
/// of being rejected.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub enum Valid {
    #[default]
    Any,
    Range {
        lower: Option<Bound>,
        upper: Option<Bound>,
    },
    Cyclic {
        start: f64,
        period: f64,
    },
}

impl Valid {
    /// `x >= lower`
    pub fn at_least(lower: f64) -> Self {
        Self::Range {
            lower: Some(Bound::Inclusive(lower)),
            upper: None,
        }
    }

    /// `x > lower`
    pub fn greater_than(lower: f64) -> Self {
        Self::Range {
            lower: Some(Bound::Exclusive(lower)),
            upper: None,
        }
    }

    /// `lower < x < upper`
    pub fn open(lower: f64, upper: f64) -> Self {
        assert!(lower < upper, "lower bound must be smaller than upper bound");
        Self::Range {
            lower: Some(Bound::Exclusive(lower)),
            upper: Some(Bound::Exclusive(upper)),
        }
    }

    /// `lower < x <= upper`
    pub fn left_open(lower: f64, upper: f64) -> Self {
        assert!(lower < upper, "lower bound must be smaller than upper bound");
        Self::Range {
            lower: Some(Bound::Exclusive(lower)),
            upper: Some(Bound::Inclusive(upper)),
        }
    }

    /// `start <= x < end`, values outside are wrapped
    pub fn cyclic(start: f64, end: f64) -> Self {
        assert!(start < end, "cyclic range must have positive length");
        Self::Cyclic {
            start,
            period: end - start,
        }
    }

    pub fn contains<T: Float>(&self, x: T) -> bool {
        match self {
            Self::Any => !x.is_nan(),
            Self::Range { lower, upper } => {
                let above = match lower {
                    None => true,
                    Some(Bound::Inclusive(b)) => x >= T::cast(*b),
                    Some(Bound::Exclusive(b)) => x > T::cast(*b),
                };
                let below = match upper {
                    None => true,
                    Some(Bound::Inclusive(b)) => x <= T::cast(*b),
                    Some(Bound::Exclusive(b)) => x < T::cast(*b),
                };
                above && below
            }
            Self::Cyclic { .. } => x.is_finite(),
        }
    }

    /// Check the value, wrapping cyclic parameters into their period
    pub fn apply<T: Float>(&self, key: &str, x: T) -> Result<T, LensError> {
        if !self.contains(x) {
            return Err(LensError::OutOfRange {
                key: key.to_owned(),
                value: x.to_f64().unwrap_or(f64::NAN),
                valid: *self,
            });
        }
        match self {
            Self::Cyclic { start, period } => {
                let start = T::cast(*start);
                let period = T::cast(*period);
                let shifted = x - start;
                let wrapped = start + shifted - period * (shifted / period).floor();
                // rounding may land exactly on the excluded end
                Ok(if wrapped >= start + period { start } else { wrapped })
            }
            _ => Ok(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn open_range_excludes_bounds() {
        let valid = Valid::open(0.0, 1.0);
        assert!(!valid.contains(0.0_f64));
        assert!(valid.contains(0.5_f64));
        assert!(!valid.contains(1.0_f64));
        assert!(!valid.contains(f64::NAN));
    }

    #[test]
    fn at_least_includes_bound() {
        let valid = Valid::at_least(0.0);
        assert!(valid.contains(0.0_f32));
        assert!(!valid.contains(-1e-6_f32));
        assert!(valid.contains(1e30_f32));
    }

    #[test]
    fn cyclic_wraps_angles() {
        let valid = Valid::cyclic(0.0, PI);
        assert_relative_eq!(valid.apply("phi", 0.25).unwrap(), 0.25);
        assert_relative_eq!(valid.apply("phi", PI + 0.25).unwrap(), 0.25, epsilon = 1e-12);
        assert_relative_eq!(valid.apply("phi", -0.25).unwrap(), PI - 0.25, epsilon = 1e-12);
        assert!(valid.apply("phi", f64::INFINITY).is_err());
    }

    #[test]
    fn cyclic_excludes_period_end() {
        let valid = Valid::cyclic(0.0, PI);
        // -1e-17 + PI rounds to PI
        let wrapped = valid.apply("phi", -1e-17_f64).unwrap();
        assert!((0.0..PI).contains(&wrapped));
        assert_eq!(wrapped, 0.0);
        let shifted = Valid::cyclic(-PI, PI);
        assert!((-PI..PI).contains(&shifted.apply("phi", -PI - 1e-17_f64).unwrap()));
    }

    #[test]
    fn out_of_range_reports_key() {
        let error = Valid::open(0.0, 1.0).apply("lens.q", 1.5).unwrap_err();
        assert_eq!(
            error,
            LensError::OutOfRange {
                key: "lens.q".to_owned(),
                value: 1.5,
                valid: Valid::open(0.0, 1.0),
            }
        );
    }
}
