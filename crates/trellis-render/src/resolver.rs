//! Element resolution
//!
//! Maps a namespace/type pair to its registered record. Callers must have
//! confirmed the namespace is loaded; the resolver itself never waits or
//! fetches.

use std::sync::Arc;
use trellis_core::{ComponentKey, Diagnostic, DiagnosticKind, Result, TrellisError};
use trellis_schema::{ComponentRecord, ComponentRegistry};

/// Resolve a component, telling an unknown type inside a known namespace
/// apart from a namespace that registered nothing at all.
pub fn resolve_component(
    registry: &ComponentRegistry,
    namespace: &str,
    type_name: &str,
) -> Result<Arc<ComponentRecord>> {
    if let Some(record) = registry.get(namespace, type_name) {
        return Ok(record);
    }

    if registry.has_namespace(namespace) {
        Err(TrellisError::UnknownType {
            namespace: namespace.to_string(),
            type_name: type_name.to_string(),
        })
    } else {
        Err(TrellisError::UnknownNamespace(namespace.to_string()))
    }
}

/// Diagnostic record for a node that failed to render
pub fn error_diagnostic(key: &ComponentKey, err: &TrellisError) -> Diagnostic {
    let kind = match err {
        TrellisError::UnknownNamespace(_) => DiagnosticKind::UnknownNamespace,
        _ => DiagnosticKind::UnknownType,
    };
    Diagnostic::new(
        kind,
        key.namespace.clone(),
        key.type_name.clone(),
        err.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_schema::DeclaredComponent;

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry.register(ComponentRecord::new(
            ComponentKey::new("mylib", "Widget"),
            Arc::new(DeclaredComponent::new("div")),
        ));
        registry
    }

    #[test]
    fn test_resolve_found() {
        let record = resolve_component(&registry(), "mylib", "Widget").unwrap();
        assert_eq!(record.key, ComponentKey::new("mylib", "Widget"));
    }

    #[test]
    fn test_unknown_type() {
        let err = resolve_component(&registry(), "mylib", "Gadget").unwrap_err();
        assert!(matches!(err, TrellisError::UnknownType { .. }));

        let d = error_diagnostic(&ComponentKey::new("mylib", "Gadget"), &err);
        assert_eq!(d.kind, DiagnosticKind::UnknownType);
    }

    #[test]
    fn test_unknown_namespace() {
        let err = resolve_component(&registry(), "other", "Widget").unwrap_err();
        assert!(matches!(err, TrellisError::UnknownNamespace(_)));

        let d = error_diagnostic(&ComponentKey::new("other", "Widget"), &err);
        assert_eq!(d.kind, DiagnosticKind::UnknownNamespace);
    }
}
