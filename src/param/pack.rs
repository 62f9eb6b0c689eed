use crate::float_trait::Float;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a single parameter: a scalar or a pixel map
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub enum ParamValue<T> {
    Scalar(T),
    Map(Array2<T>),
}

impl<T: Float> ParamValue<T> {
    pub fn as_scalar(&self) -> Option<T> {
        match self {
            Self::Scalar(x) => Some(*x),
            Self::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&Array2<T>> {
        match self {
            Self::Scalar(_) => None,
            Self::Map(a) => Some(a),
        }
    }
}

impl<T: Float> From<T> for ParamValue<T> {
    fn from(x: T) -> Self {
        Self::Scalar(x)
    }
}

impl<T: Float> From<Array2<T>> for ParamValue<T> {
    fn from(a: Array2<T>) -> Self {
        Self::Map(a)
    }
}

/// Values of the free parameters for a single forward evaluation
///
/// Values are keyed by `"<module>.<parameter>"`, where module is the name given to a lens,
/// a light model or a simulator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(bound = "T: Float")]
pub struct ParamPack<T> {
    values: BTreeMap<String, ParamValue<T>>,
}

impl<T: Float> ParamPack<T> {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn key(module: &str, name: &str) -> String {
        format!("{module}.{name}")
    }

    pub fn insert(&mut self, module: &str, name: &str, value: impl Into<ParamValue<T>>) {
        self.values.insert(Self::key(module, name), value.into());
    }

    /// Builder-style [ParamPack::insert]
    pub fn with(mut self, module: &str, name: &str, value: impl Into<ParamValue<T>>) -> Self {
        self.insert(module, name, value);
        self
    }

    pub fn get(&self, module: &str, name: &str) -> Option<&ParamValue<T>> {
        self.values.get(&Self::key(module, name))
    }

    pub fn remove(&mut self, module: &str, name: &str) -> Option<ParamValue<T>> {
        self.values.remove(&Self::key(module, name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue<T>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T: Float> Default for ParamPack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;

    #[test]
    fn keys_are_namespaced() {
        let pack: ParamPack<f64> = ParamPack::new()
            .with("lens", "x0", 0.5)
            .with("source", "x0", -0.5);
        assert_eq!(pack.len(), 2);
        assert_eq!(pack.get("lens", "x0").unwrap().as_scalar(), Some(0.5));
        assert_eq!(pack.get("source", "x0").unwrap().as_scalar(), Some(-0.5));
        assert!(pack.get("sim", "x0").is_none());
    }

    #[test]
    fn maps_are_not_scalars() {
        let pack: ParamPack<f64> =
            ParamPack::new().with("source", "image", array![[1.0, 2.0], [3.0, 4.0]]);
        let value = pack.get("source", "image").unwrap();
        assert_eq!(value.as_scalar(), None);
        assert_eq!(value.as_map().unwrap()[[1, 0]], 3.0);
    }

    #[test]
    fn serde_json_round_trip() {
        let pack: ParamPack<f64> = ParamPack::new().with("lens", "Rein", 1.25);
        let json = serde_json::to_string(&pack).unwrap();
        let restored: ParamPack<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(pack, restored);
    }
}
