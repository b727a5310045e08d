//! Component identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a component implementation: the library namespace that
/// provides it and the type name inside that library.
///
/// Keys are plain values; two keys built from the same strings are equal
/// and hash identically.
#[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ComponentKey {
    pub namespace: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ComponentKey {
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
        }
    }

    /// Parse `namespace.Type`. The namespace may itself contain dots; the
    /// type is everything after the last one.
    pub fn parse(s: &str) -> Option<Self> {
        let (namespace, type_name) = s.rsplit_once('.')?;
        if namespace.is_empty() || type_name.is_empty() {
            return None;
        }
        Some(Self::new(namespace, type_name))
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKey({}.{})", self.namespace, self.type_name)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_structural_equality() {
        let a = ComponentKey::new("mylib", "Widget");
        let b = ComponentKey::new(String::from("mylib"), String::from("Widget"));
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_parse() {
        let key = ComponentKey::parse("dash_core.Dropdown").unwrap();
        assert_eq!(key.namespace, "dash_core");
        assert_eq!(key.type_name, "Dropdown");

        let nested = ComponentKey::parse("org.ui.Button").unwrap();
        assert_eq!(nested.namespace, "org.ui");
        assert_eq!(nested.type_name, "Button");

        assert!(ComponentKey::parse("NoNamespace").is_none());
        assert!(ComponentKey::parse(".Widget").is_none());
        assert!(ComponentKey::parse("mylib.").is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(ComponentKey::new("mylib", "Widget").to_string(), "mylib.Widget");
    }
}
