//! Tree descriptions
//!
//! An `ElementNode` is what the host hands over for every node of the UI
//! tree. Descriptions are rebuilt on every render; only load state (keyed by
//! namespace) survives between renders.

use crate::error::{Result, TrellisError};
use crate::key::ComponentKey;
use crate::value::{PropValue, Props};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One node of a tree description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawElementNode")]
pub struct ElementNode {
    pub namespace: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Props::is_empty")]
    pub props: Props,
    /// Implicit props injected by the host (callbacks, loading state, ...).
    /// Passed through untouched and never validated.
    #[serde(skip_serializing_if = "Props::is_empty")]
    pub extra_props: Props,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PropValue>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub props_check: bool,
}

/// Wire shape of an element. `children` may also arrive inside `props`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawElementNode {
    namespace: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    props: Props,
    #[serde(default)]
    extra_props: Props,
    #[serde(default)]
    children: Vec<PropValue>,
    #[serde(default)]
    props_check: bool,
}

impl From<RawElementNode> for ElementNode {
    fn from(raw: RawElementNode) -> Self {
        let mut props = raw.props;
        let mut children = raw.children;
        if let Some(inline) = props.remove("children") {
            if children.is_empty() {
                children = match inline {
                    PropValue::Null => Vec::new(),
                    PropValue::Sequence(items) => items,
                    other => vec![other],
                };
            }
        }
        ElementNode {
            namespace: raw.namespace,
            type_name: raw.type_name,
            props,
            extra_props: raw.extra_props,
            children,
            props_check: raw.props_check,
        }
    }
}

impl ElementNode {
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            props: Props::new(),
            extra_props: Props::new(),
            children: Vec::new(),
            props_check: false,
        }
    }

    /// Builder: set one prop
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Builder: set one implicit prop
    pub fn with_extra_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.extra_props.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: impl Into<PropValue>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: enable property checking for this node
    pub fn with_props_check(mut self, enabled: bool) -> Self {
        self.props_check = enabled;
        self
    }

    pub fn key(&self) -> ComponentKey {
        ComponentKey::new(self.namespace.clone(), self.type_name.clone())
    }

    /// Every namespace referenced by this node and its descendants, in
    /// first-seen order.
    pub fn namespaces(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_namespaces(&mut out);
        out
    }

    fn collect_namespaces(&self, out: &mut Vec<String>) {
        if !out.contains(&self.namespace) {
            out.push(self.namespace.clone());
        }
        for child in &self.children {
            collect_value_namespaces(child, out);
        }
    }

    /// Parse a tree description from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let node: ElementNode = serde_json::from_str(content)
            .map_err(|e| TrellisError::TreeError(format!("Invalid tree description: {}", e)))?;
        Ok(node)
    }

    /// Load a tree description from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            TrellisError::TreeError(msg) => {
                TrellisError::TreeError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }
}

fn collect_value_namespaces(value: &PropValue, out: &mut Vec<String>) {
    match value {
        PropValue::Element(node) => node.collect_namespaces(out),
        PropValue::Sequence(items) => {
            for item in items {
                collect_value_namespaces(item, out);
            }
        }
        _ => {}
    }
}
