//! Prop values and the per-kind property machinery
//!
//! - [`PropValue`] / [`Props`]: dynamically typed element props
//! - [`descriptor`]: declared simple props, groups and wrapped props per kind
//! - [`group`]: the property group coordinator that batches grouped changes
//! - [`wrapper`]: the ref/resource wrapper for literal, element and pre-built values

pub mod descriptor;
pub mod group;
pub mod wrapper;

pub use descriptor::{Mutability, PropContext, PropertyGroup, PropertySet, SimpleProperty, WrappedProperty};
pub use group::{GroupPhase, GroupValues, PropertyGroupCoordinator};
pub use wrapper::{Binding, PropForm, RefWrapper, Transition};

use crate::element::Element;
use crate::error::{HostError, HostResult};
use crate::foundation::math::{Color, Fog, Vec3};
use crate::native::ObjectId;
use std::collections::BTreeMap;

/// A single prop value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// Explicit null (e.g. `camera={null}`)
    Null,
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    Text(String),
    /// Color
    Color(Color),
    /// 3D vector
    Vector(Vec3),
    /// Fog settings
    Fog(Fog),
    /// Reference to a pre-built native object owned by the caller
    Object(ObjectId),
    /// Nested element describing a sub-object to construct
    Element(Box<Element>),
}

impl PropValue {
    /// Whether this is [`PropValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// String value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Color value; numbers are read as packed `0xRRGGBB`
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Number(hex) if *hex >= 0.0 => Some(Color::from_hex(*hex as u32)),
            _ => None,
        }
    }

    /// Vector value
    pub fn as_vector(&self) -> Option<Vec3> {
        match self {
            Self::Vector(value) => Some(*value),
            _ => None,
        }
    }

    /// Fog value
    pub fn as_fog(&self) -> Option<Fog> {
        match self {
            Self::Fog(fog) => Some(*fog),
            _ => None,
        }
    }

    /// Pre-built object reference
    pub fn as_object(&self) -> Option<ObjectId> {
        match self {
            Self::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Nested element
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Numeric value as `f32`, or an [`HostError::InvalidPropValue`]
    pub fn expect_f32(&self, kind: &'static str, prop: &str) -> HostResult<f32> {
        self.as_number()
            .map(|value| value as f32)
            .ok_or_else(|| HostError::invalid_value(kind, prop, "a number"))
    }

    /// Non-negative integral value as `u32`, or an [`HostError::InvalidPropValue`]
    pub fn expect_u32(&self, kind: &'static str, prop: &str) -> HostResult<u32> {
        match self.as_number() {
            Some(value) if value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) => {
                Ok(value as u32)
            }
            _ => Err(HostError::invalid_value(kind, prop, "a non-negative integer")),
        }
    }

    /// Boolean value, or an [`HostError::InvalidPropValue`]
    pub fn expect_bool(&self, kind: &'static str, prop: &str) -> HostResult<bool> {
        self.as_bool()
            .ok_or_else(|| HostError::invalid_value(kind, prop, "a boolean"))
    }

    /// String value, or an [`HostError::InvalidPropValue`]
    pub fn expect_text(&self, kind: &'static str, prop: &str) -> HostResult<&str> {
        self.as_text()
            .ok_or_else(|| HostError::invalid_value(kind, prop, "a string"))
    }

    /// Color value, or an [`HostError::InvalidPropValue`]
    pub fn expect_color(&self, kind: &'static str, prop: &str) -> HostResult<Color> {
        self.as_color()
            .ok_or_else(|| HostError::invalid_value(kind, prop, "a color or 0xRRGGBB number"))
    }

    /// Vector value, or an [`HostError::InvalidPropValue`]
    pub fn expect_vector(&self, kind: &'static str, prop: &str) -> HostResult<Vec3> {
        self.as_vector()
            .ok_or_else(|| HostError::invalid_value(kind, prop, "a vector"))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for PropValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Color> for PropValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl From<Vec3> for PropValue {
    fn from(value: Vec3) -> Self {
        Self::Vector(value)
    }
}

impl From<Fog> for PropValue {
    fn from(value: Fog) -> Self {
        Self::Fog(value)
    }
}

impl From<ObjectId> for PropValue {
    fn from(value: ObjectId) -> Self {
        Self::Object(value)
    }
}

impl From<Element> for PropValue {
    fn from(value: Element) -> Self {
        Self::Element(Box::new(value))
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Named props of one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: BTreeMap<String, PropValue>,
}

impl Props {
    /// Empty prop set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prop
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a prop
    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.values.remove(name)
    }

    /// Look up a prop
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get(name)
    }

    /// Whether a prop is present
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate props in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of props
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no props
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (name, value) in iter {
            props.insert(name, value);
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_accepts_hex_numbers() {
        let value = PropValue::from(0x00ff00);
        assert_eq!(value.as_color(), Some(Color::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_expect_u32_rejects_fractions() {
        assert_eq!(PropValue::from(4).expect_u32("boxGeometry", "widthSegments").unwrap(), 4);
        assert!(PropValue::from(1.5).expect_u32("boxGeometry", "widthSegments").is_err());
    }

    #[test]
    fn test_none_becomes_null() {
        let value: PropValue = Option::<ObjectId>::None.into();
        assert!(value.is_null());
    }
}
