//! Library bundles and their TOML manifest format

use crate::contract::{ComponentContract, PropSchemaDefinition};
use crate::record::{Component, ComponentRecord, DeclaredComponent};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use trellis_core::{ComponentKey, Fingerprint, Result, TrellisError};

/// Every component one namespace provides.
///
/// A bundle is registered as a unit so a namespace's components become
/// visible together.
#[derive(Debug, Clone)]
pub struct LibraryBundle {
    pub namespace: String,
    pub version: Option<String>,
    pub description: Option<String>,
    /// Digest of the manifest the bundle was parsed from, if any
    pub fingerprint: Option<Fingerprint>,
    pub records: Vec<ComponentRecord>,
}

impl LibraryBundle {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            version: None,
            description: None,
            fingerprint: None,
            records: Vec::new(),
        }
    }

    /// Builder: add a component implemented in code
    pub fn with_component(
        mut self,
        type_name: impl Into<String>,
        implementation: Arc<dyn Component>,
        contract: Option<ComponentContract>,
    ) -> Self {
        let key = ComponentKey::new(self.namespace.clone(), type_name);
        let mut record = ComponentRecord::new(key, implementation);
        record.contract = contract;
        self.records.push(record);
        self
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.key.type_name.as_str()).collect()
    }

    /// Parse a bundle from a TOML manifest
    pub fn from_manifest_str(content: &str) -> Result<Self> {
        let file: LibraryManifestFile = toml::from_str(content)
            .map_err(|e| TrellisError::ManifestError(format!("Invalid library manifest: {}", e)))?;

        let namespace = file.library.namespace;
        if namespace.is_empty() {
            return Err(TrellisError::ManifestError(
                "Library namespace must not be empty".to_string(),
            ));
        }

        let mut records = Vec::with_capacity(file.component.len());
        for (type_name, def) in file.component {
            let mut contract = ComponentContract::new();
            for (prop_name, prop_def) in def.props {
                let schema = prop_def.to_prop_schema().map_err(|e| {
                    TrellisError::ManifestError(format!(
                        "{}.{} prop '{}': {}",
                        namespace, type_name, prop_name, e
                    ))
                })?;
                contract.props.insert(prop_name, schema);
            }

            let tag = def.element.unwrap_or_else(|| type_name.clone());
            let key = ComponentKey::new(namespace.clone(), type_name);
            records.push(ComponentRecord {
                key,
                implementation: Arc::new(DeclaredComponent::new(tag)),
                contract: Some(contract),
                description: def.description,
            });
        }

        Ok(Self {
            namespace,
            version: file.library.version,
            description: file.library.description,
            fingerprint: Some(Fingerprint::from_bytes(content.as_bytes())),
            records,
        })
    }

    /// Reject a bundle that does not belong to the namespace it was
    /// fetched for
    pub fn expect_namespace(self, requested: &str) -> Result<Self> {
        if self.namespace != requested {
            return Err(TrellisError::NamespaceMismatch {
                requested: requested.to_string(),
                declared: self.namespace,
            });
        }
        Ok(self)
    }
}

/// TOML file format for library manifests
#[derive(Debug, Deserialize)]
struct LibraryManifestFile {
    library: LibraryHeader,
    #[serde(default)]
    component: BTreeMap<String, ComponentDefinition>,
}

#[derive(Debug, Deserialize)]
struct LibraryHeader {
    namespace: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ComponentDefinition {
    #[serde(default)]
    description: Option<String>,
    /// Host element tag; defaults to the type name
    #[serde(default)]
    element: Option<String>,
    #[serde(default)]
    props: BTreeMap<String, PropSchemaDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::PropType;

    const MANIFEST: &str = r#"
[library]
namespace = "mylib"
version = "1.2.0"

[component.Widget]
description = "A test widget"
element = "div"

[component.Widget.props]
required_string = { type = "string", required = true }
a_number = "number"

[component.Label]
"#;

    #[test]
    fn test_from_manifest_str() {
        let bundle = LibraryBundle::from_manifest_str(MANIFEST).unwrap();
        assert_eq!(bundle.namespace, "mylib");
        assert_eq!(bundle.version.as_deref(), Some("1.2.0"));
        assert_eq!(bundle.type_names(), vec!["Label", "Widget"]);
        assert!(bundle.fingerprint.is_some());

        let widget = bundle
            .records
            .iter()
            .find(|r| r.key.type_name == "Widget")
            .unwrap();
        assert_eq!(widget.implementation.tag(), "div");
        let contract = widget.contract.as_ref().unwrap();
        assert!(contract.is_prop_required("required_string"));
        assert_eq!(contract.get_prop("a_number").unwrap().prop_type, PropType::Number);

        let label = bundle
            .records
            .iter()
            .find(|r| r.key.type_name == "Label")
            .unwrap();
        assert_eq!(label.implementation.tag(), "Label");
    }

    #[test]
    fn test_bad_prop_type_names_component() {
        let manifest = r#"
[library]
namespace = "mylib"

[component.Widget.props]
size = "huge"
"#;
        let err = LibraryBundle::from_manifest_str(manifest).unwrap_err();
        assert!(err.to_string().contains("mylib.Widget prop 'size'"));
    }

    #[test]
    fn test_expect_namespace() {
        let bundle = LibraryBundle::from_manifest_str(MANIFEST).unwrap();
        assert!(matches!(
            bundle.expect_namespace("other"),
            Err(TrellisError::NamespaceMismatch { .. })
        ));
    }

    #[test]
    fn test_builder() {
        let bundle = LibraryBundle::new("codelib").with_component(
            "Button",
            Arc::new(DeclaredComponent::new("button")),
            None,
        );
        assert_eq!(bundle.records[0].key, ComponentKey::new("codelib", "Button"));
    }
}
