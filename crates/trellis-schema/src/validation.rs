//! Validation of supplied props against a component's contract
//!
//! Validation is advisory: it produces a list of violations for the host to
//! log and never stops a component from rendering.

use crate::contract::{ComponentContract, PropType};
use crate::record::ComponentRecord;
use serde::Serialize;
use std::fmt;
use trellis_core::{ComponentKey, Diagnostic, DiagnosticKind, ElementNode, PropKind, PropValue, Props};

/// Property name the contract uses to describe an element's children
const CHILDREN: &str = "children";

/// What is wrong with a property
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required property is absent or null
    MissingRequired,
    /// The value's kind does not match the declared type
    WrongKind { expected: String, got: PropKind },
    /// The value is not one of the declared enum values
    NotInEnum { expected: String },
    /// The property is not declared in the contract
    Unknown,
}

/// A single mismatch between supplied props and the contract
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub prop: String,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl Violation {
    fn new(prop: &str, kind: ViolationKind) -> Self {
        Self {
            prop: prop.to_string(),
            kind,
        }
    }

    pub fn to_diagnostic(&self, key: &ComponentKey) -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::PropertyViolation,
            key.namespace.clone(),
            key.type_name.clone(),
            self.to_string(),
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingRequired => {
                write!(f, "missing required property '{}'", self.prop)
            }
            ViolationKind::WrongKind { expected, got } => write!(
                f,
                "property '{}' expected {}, got {}",
                self.prop, expected, got
            ),
            ViolationKind::NotInEnum { expected } => write!(
                f,
                "property '{}' expected one of {}",
                self.prop, expected
            ),
            ViolationKind::Unknown => write!(f, "unknown property '{}'", self.prop),
        }
    }
}

/// Check supplied props against a record's contract. A record without a
/// contract accepts anything.
pub fn check(record: &ComponentRecord, supplied: &Props) -> Vec<Violation> {
    match &record.contract {
        Some(contract) => check_contract(contract, supplied),
        None => Vec::new(),
    }
}

/// Check an element's props and children against a record's contract.
///
/// Children are checked only when the contract declares them and are never
/// reported as unknown.
pub fn check_element(record: &ComponentRecord, node: &ElementNode) -> Vec<Violation> {
    let Some(contract) = &record.contract else {
        return Vec::new();
    };

    let mut violations = check_contract(contract, &node.props);
    if let Some(schema) = contract.get_prop(CHILDREN) {
        let children = match node.children.as_slice() {
            [] => None,
            [single] => Some(single.clone()),
            many => Some(PropValue::Sequence(many.to_vec())),
        };
        match children {
            None if schema.required => {
                violations.push(Violation::new(CHILDREN, ViolationKind::MissingRequired));
            }
            None => {}
            Some(value) => {
                if let Some(kind) = check_value(&schema.prop_type, &value) {
                    violations.push(Violation::new(CHILDREN, kind));
                }
            }
        }
    }
    violations
}

/// Check supplied props against a bare contract
pub fn check_contract(contract: &ComponentContract, supplied: &Props) -> Vec<Violation> {
    let mut violations = Vec::new();

    // Required props must be present and non-null
    for (name, schema) in &contract.props {
        if name == CHILDREN {
            continue;
        }
        let present = supplied.get(name).map(|v| !v.is_null()).unwrap_or(false);
        if schema.required && !present {
            violations.push(Violation::new(name, ViolationKind::MissingRequired));
        }
    }

    for (name, value) in supplied {
        match contract.get_prop(name) {
            None => violations.push(Violation::new(name, ViolationKind::Unknown)),
            // Null stands for "not supplied"; the required check covers it
            Some(_) if value.is_null() => {}
            Some(schema) => {
                if let Some(kind) = check_value(&schema.prop_type, value) {
                    violations.push(Violation::new(name, kind));
                }
            }
        }
    }

    violations
}

fn check_value(prop_type: &PropType, value: &PropValue) -> Option<ViolationKind> {
    if let PropType::Enum { values } = prop_type {
        if values.contains(value) {
            return None;
        }
        return Some(ViolationKind::NotInEnum {
            expected: prop_type.describe(),
        });
    }

    if prop_type.accepts_kind(value.kind()) {
        None
    } else {
        Some(ViolationKind::WrongKind {
            expected: prop_type.describe(),
            got: value.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::PropSchema;
    use crate::record::DeclaredComponent;
    use std::sync::Arc;

    fn widget(contract: ComponentContract) -> ComponentRecord {
        ComponentRecord::new(
            ComponentKey::new("mylib", "Widget"),
            Arc::new(DeclaredComponent::new("div")),
        )
        .with_contract(contract)
    }

    fn required_string_only() -> ComponentRecord {
        widget(ComponentContract::new().with_prop("required_string", PropSchema::required(PropType::String)))
    }

    fn props(pairs: &[(&str, PropValue)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_missing_required() {
        let violations = check(&required_string_only(), &Props::new());
        assert_eq!(
            violations,
            vec![Violation::new("required_string", ViolationKind::MissingRequired)]
        );
    }

    #[test]
    fn test_unknown_property() {
        let supplied = props(&[
            ("required_string", PropValue::from("x")),
            ("extra", PropValue::from(1i64)),
        ]);
        let violations = check(&required_string_only(), &supplied);
        assert_eq!(violations, vec![Violation::new("extra", ViolationKind::Unknown)]);
    }

    #[test]
    fn test_valid_props() {
        let supplied = props(&[("required_string", PropValue::from("x"))]);
        assert!(check(&required_string_only(), &supplied).is_empty());
    }

    #[test]
    fn test_null_counts_as_missing() {
        let supplied = props(&[("required_string", PropValue::Null)]);
        let violations = check(&required_string_only(), &supplied);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::MissingRequired);
    }

    #[test]
    fn test_wrong_kind() {
        let record = widget(
            ComponentContract::new()
                .with_prop("a_number", PropSchema::new(PropType::Number))
                .with_prop(
                    "union",
                    PropSchema::new(PropType::Union {
                        variants: vec![PropType::Number, PropType::String],
                    }),
                ),
        );
        let supplied = props(&[
            ("a_number", PropValue::from("three")),
            ("union", PropValue::from(true)),
        ]);

        let violations = check(&record, &supplied);
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].kind,
            ViolationKind::WrongKind {
                expected: "number".to_string(),
                got: PropKind::String
            }
        );
        assert_eq!(
            violations[1].to_string(),
            "property 'union' expected number | string, got bool"
        );
    }

    #[test]
    fn test_enum_membership() {
        let record = widget(ComponentContract::new().with_prop(
            "enum_string",
            PropSchema::new(PropType::Enum {
                values: vec!["one".into(), "two".into()],
            }),
        ));

        assert!(check(&record, &props(&[("enum_string", "two".into())])).is_empty());
        let violations = check(&record, &props(&[("enum_string", "three".into())]));
        assert!(matches!(violations[0].kind, ViolationKind::NotInEnum { .. }));
    }

    #[test]
    fn test_shallow_only() {
        // Element types of arrays are documentation; contents are not inspected
        let record = widget(ComponentContract::new().with_prop(
            "array_string",
            PropSchema::new(PropType::Array {
                element: Some(Box::new(PropType::String)),
            }),
        ));
        let supplied = props(&[("array_string", PropValue::from(vec![1i64, 2]))]);
        assert!(check(&record, &supplied).is_empty());
    }

    #[test]
    fn test_no_contract_accepts_anything() {
        let record = ComponentRecord::new(
            ComponentKey::new("mylib", "Free"),
            Arc::new(DeclaredComponent::new("div")),
        );
        assert!(check(&record, &props(&[("whatever", 1i64.into())])).is_empty());
    }

    #[test]
    fn test_children() {
        let record = widget(
            ComponentContract::new()
                .with_prop("children", PropSchema::required(PropType::Node)),
        );

        let bare = ElementNode::new("mylib", "Widget");
        assert_eq!(
            check_element(&record, &bare),
            vec![Violation::new("children", ViolationKind::MissingRequired)]
        );

        let with_text = ElementNode::new("mylib", "Widget").with_child("hello");
        assert!(check_element(&record, &with_text).is_empty());

        let bad = ElementNode::new("mylib", "Widget").with_child(PropValue::Bool(true));
        assert!(matches!(
            check_element(&record, &bad)[0].kind,
            ViolationKind::WrongKind { .. }
        ));

        // Undeclared children are not flagged
        let plain = required_string_only();
        let node = ElementNode::new("mylib", "Widget")
            .with_prop("required_string", "x")
            .with_child("text");
        assert!(check_element(&plain, &node).is_empty());
    }

    #[test]
    fn test_violation_diagnostic() {
        let v = Violation::new("required_string", ViolationKind::MissingRequired);
        let d = v.to_diagnostic(&ComponentKey::new("mylib", "Widget"));
        assert_eq!(d.kind, DiagnosticKind::PropertyViolation);
        assert_eq!(d.type_name.as_deref(), Some("Widget"));
        assert_eq!(d.detail, "missing required property 'required_string'");
    }

    #[test]
    fn test_violation_json() {
        let v = Violation::new("extra", ViolationKind::Unknown);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["prop"], "extra");
        assert_eq!(json["kind"], "unknown");
    }
}
