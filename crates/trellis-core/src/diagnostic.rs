//! Structured diagnostics
//!
//! Load failures, resolution errors and property violations all surface as
//! `Diagnostic` records. There is no fixed wire format; records serialize to
//! JSON for hosts that want one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of problem a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Fetching or registering a namespace failed
    LoadFailure,
    /// A namespace reported loaded but registered no components
    UnknownNamespace,
    /// A namespace is loaded but never registered the requested type
    UnknownType,
    /// Supplied props do not match the declared contract
    PropertyViolation,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::LoadFailure => "load failure",
            DiagnosticKind::UnknownNamespace => "unknown namespace",
            DiagnosticKind::UnknownType => "unknown type",
            DiagnosticKind::PropertyViolation => "property violation",
        };
        f.write_str(name)
    }
}

/// A single diagnostic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub namespace: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    pub kind: DiagnosticKind,
    pub detail: String,
}

impl Diagnostic {
    pub fn load_failure(namespace: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: None,
            kind: DiagnosticKind::LoadFailure,
            detail: reason.into(),
        }
    }

    pub fn new(
        kind: DiagnosticKind,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: Some(type_name.into()),
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.type_name {
            Some(t) => write!(f, "[{}] {}.{}: {}", self.kind, self.namespace, t, self.detail),
            None => write!(f, "[{}] {}: {}", self.kind, self.namespace, self.detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let d = Diagnostic::load_failure("mylib", "network error");
        assert_eq!(d.to_string(), "[load failure] mylib: network error");

        let d = Diagnostic::new(DiagnosticKind::UnknownType, "mylib", "Gadget", "not registered");
        assert_eq!(d.to_string(), "[unknown type] mylib.Gadget: not registered");
    }

    #[test]
    fn test_json_shape() {
        let d = Diagnostic::new(
            DiagnosticKind::PropertyViolation,
            "mylib",
            "Widget",
            "missing required property 'required_string'",
        );
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "property_violation");
        assert_eq!(json["type"], "Widget");

        let d = Diagnostic::load_failure("mylib", "boom");
        let json = serde_json::to_value(&d).unwrap();
        assert!(json.get("type").is_none());
    }
}
