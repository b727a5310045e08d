//! Loosely typed component property values

use crate::tree::ElementNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Properties supplied to a component, keyed by property name.
///
/// Ordered so that two renders of the same description compare and print
/// identically.
pub type Props = BTreeMap<String, PropValue>;

/// A single property value.
///
/// Deserializes from JSON and TOML. An object whose keys are element fields
/// (`namespace`, `type`, ...) becomes an `Element`; any other object is a
/// `Mapping`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<PropValue>),
    Element(Box<ElementNode>),
    Mapping(BTreeMap<String, PropValue>),
}

/// The shallow kind of a [`PropValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Element,
    Mapping,
}

impl PropKind {
    pub fn name(&self) -> &'static str {
        match self {
            PropKind::Null => "null",
            PropKind::Bool => "bool",
            PropKind::Number => "number",
            PropKind::String => "string",
            PropKind::Sequence => "sequence",
            PropKind::Element => "element",
            PropKind::Mapping => "mapping",
        }
    }
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PropValue {
    pub fn kind(&self) -> PropKind {
        match self {
            PropValue::Null => PropKind::Null,
            PropValue::Bool(_) => PropKind::Bool,
            PropValue::Number(_) => PropKind::Number,
            PropValue::String(_) => PropKind::String,
            PropValue::Sequence(_) => PropKind::Sequence,
            PropValue::Element(_) => PropKind::Element,
            PropValue::Mapping(_) => PropKind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            PropValue::Element(node) => Some(node),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::String(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::String(s)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        PropValue::Number(n as f64)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<ElementNode> for PropValue {
    fn from(node: ElementNode) -> Self {
        PropValue::Element(Box::new(node))
    }
}

impl<T: Into<PropValue>> From<Vec<T>> for PropValue {
    fn from(items: Vec<T>) -> Self {
        PropValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}
