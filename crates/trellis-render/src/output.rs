//! Rendered output handed to the host

use serde_json::{json, Value};
use std::fmt::Write;
use std::sync::Arc;
use trellis_core::{ComponentKey, Diagnostic, ElementNode, PropValue, Props};
use trellis_schema::ComponentRecord;

/// The output of rendering one tree position
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Placeholder while the node's namespace is not loaded
    Empty,
    /// Plain child value (text, number, ...)
    Value(PropValue),
    /// A list of children
    Fragment(Vec<Rendered>),
    Element(ConcreteElement),
    /// The node failed; siblings are unaffected
    Error(Diagnostic),
}

/// A resolved component populated with its props and rendered children
#[derive(Debug, Clone)]
pub struct ConcreteElement {
    pub record: Arc<ComponentRecord>,
    pub props: Props,
    pub extra_props: Props,
    pub children: Vec<Rendered>,
}

impl PartialEq for ConcreteElement {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
            && self.props == other.props
            && self.extra_props == other.extra_props
            && self.children == other.children
    }
}

impl ConcreteElement {
    pub fn new(record: Arc<ComponentRecord>, node: &ElementNode, children: Vec<Rendered>) -> Self {
        Self {
            record,
            props: node.props.clone(),
            extra_props: node.extra_props.clone(),
            children,
        }
    }

    pub fn key(&self) -> &ComponentKey {
        &self.record.key
    }

    pub fn tag(&self) -> &str {
        self.record.implementation.tag()
    }

    /// Props as the component sees them: declared defaults for absent or
    /// null props, then supplied props, then implicit props.
    pub fn resolved_props(&self) -> Props {
        let mut resolved = Props::new();
        if let Some(contract) = &self.record.contract {
            for (name, default) in contract.defaults() {
                resolved.insert(name.to_string(), default.clone());
            }
        }
        for (name, value) in &self.props {
            if !(value.is_null() && resolved.contains_key(name)) {
                resolved.insert(name.clone(), value.clone());
            }
        }
        for (name, value) in &self.extra_props {
            resolved.insert(name.clone(), value.clone());
        }
        resolved
    }
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        matches!(self, Rendered::Empty)
    }

    pub fn as_element(&self) -> Option<&ConcreteElement> {
        match self {
            Rendered::Element(el) => Some(el),
            _ => None,
        }
    }

    /// JSON form for hosts and the CLI
    pub fn to_json(&self) -> Value {
        match self {
            Rendered::Empty => Value::Null,
            Rendered::Value(v) => serde_json::to_value(v).unwrap_or_default(),
            Rendered::Fragment(items) => Value::Array(items.iter().map(|r| r.to_json()).collect()),
            Rendered::Element(el) => json!({
                "namespace": el.key().namespace,
                "type": el.key().type_name,
                "tag": el.tag(),
                "props": el.resolved_props(),
                "children": el.children.iter().map(|r| r.to_json()).collect::<Vec<_>>(),
            }),
            Rendered::Error(d) => json!({ "error": d }),
        }
    }

    /// Indented text outline, one node per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            Rendered::Empty => {
                let _ = writeln!(out, "{}(pending)", indent);
            }
            Rendered::Value(v) => {
                let text = serde_json::to_string(v).unwrap_or_default();
                let _ = writeln!(out, "{}{}", indent, text);
            }
            Rendered::Fragment(items) => {
                for item in items {
                    item.write_outline(out, depth);
                }
            }
            Rendered::Element(el) => {
                let props = serde_json::to_string(&el.resolved_props()).unwrap_or_default();
                let _ = writeln!(out, "{}<{}> {} {}", indent, el.tag(), el.key(), props);
                for child in &el.children {
                    child.write_outline(out, depth + 1);
                }
            }
            Rendered::Error(d) => {
                let _ = writeln!(out, "{}!! {}", indent, d);
            }
        }
    }
}
