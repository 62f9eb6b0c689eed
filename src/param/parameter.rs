use crate::error::LensError;
use crate::float_trait::Float;
use crate::param::pack::{ParamPack, ParamValue};
use crate::param::valid::Valid;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Declaration of a named model parameter
///
/// A parameter is either fixed, carrying its value, or free, in which case the value is taken
/// from a [ParamPack] at evaluation time. A fixed value always wins over a value in the pack.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct Parameter<T> {
    name: Cow<'static, str>,
    units: Cow<'static, str>,
    valid: Valid,
    value: Option<ParamValue<T>>,
}

impl<T> Parameter<T>
where
    T: Float,
{
    /// Scalar parameter, free if `value` is `None`
    pub fn new(name: &'static str, units: &'static str, value: Option<T>) -> Self {
        Self {
            name: Cow::Borrowed(name),
            units: Cow::Borrowed(units),
            valid: Valid::Any,
            value: value.map(ParamValue::Scalar),
        }
    }

    /// Map-valued parameter, free if `value` is `None`
    pub fn new_map(name: &'static str, units: &'static str, value: Option<Array2<T>>) -> Self {
        Self {
            name: Cow::Borrowed(name),
            units: Cow::Borrowed(units),
            valid: Valid::Any,
            value: value.map(ParamValue::Map),
        }
    }

    pub fn with_valid(mut self, valid: Valid) -> Self {
        self.valid = valid;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn valid(&self) -> Valid {
        self.valid
    }

    pub fn is_free(&self) -> bool {
        self.value.is_none()
    }

    pub fn value(&self) -> Option<&ParamValue<T>> {
        self.value.as_ref()
    }

    /// Fix the parameter to the given value
    pub fn set_value(&mut self, value: impl Into<ParamValue<T>>) {
        self.value = Some(value.into());
    }

    /// Make the parameter free
    pub fn set_free(&mut self) {
        self.value = None;
    }

    fn lookup<'a>(&'a self, module: &str, pack: &'a ParamPack<T>) -> Result<&'a ParamValue<T>, LensError> {
        match &self.value {
            Some(value) => Ok(value),
            None => pack
                .get(module, &self.name)
                .ok_or_else(|| LensError::UnresolvedParameter {
                    key: ParamPack::<T>::key(module, &self.name),
                }),
        }
    }

    /// Resolve a scalar value and check it against the valid range
    pub fn resolve_scalar(&self, module: &str, pack: &ParamPack<T>) -> Result<T, LensError> {
        let key = || ParamPack::<T>::key(module, &self.name);
        let value = self
            .lookup(module, pack)?
            .as_scalar()
            .ok_or_else(|| LensError::WrongParameterKind {
                key: key(),
                expected: "scalar",
            })?;
        self.valid.apply(&key(), value)
    }

    /// Resolve a map value
    pub fn resolve_map<'a>(
        &'a self,
        module: &str,
        pack: &'a ParamPack<T>,
    ) -> Result<&'a Array2<T>, LensError> {
        self.lookup(module, pack)?
            .as_map()
            .ok_or_else(|| LensError::WrongParameterKind {
                key: ParamPack::<T>::key(module, &self.name),
                expected: "map",
            })
    }
}
