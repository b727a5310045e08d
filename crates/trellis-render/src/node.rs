//! Dynamic element node
//!
//! Per-position state for one node of the tree. The node is re-rendered on
//! every pass and must stay cheap: until its namespace is loaded it renders
//! an empty placeholder, afterwards it resolves once and reuses that
//! resolution for as long as its props stay the same.

use crate::output::{ConcreteElement, Rendered};
use crate::resolver::resolve_component;
use std::sync::Arc;
use trellis_core::{ComponentKey, Diagnostic, ElementNode, PropValue, Props, Result};
use trellis_loader::LoaderCoordinator;
use trellis_schema::{check_element, ComponentRecord};

/// Output of one node render
#[derive(Debug, Clone, PartialEq)]
pub struct NodeOutput {
    pub rendered: Rendered,
    /// Property violations found on this pass. Empty when the previous
    /// resolution was reused.
    pub diagnostics: Vec<Diagnostic>,
}

impl NodeOutput {
    fn placeholder() -> Self {
        Self {
            rendered: Rendered::Empty,
            diagnostics: Vec::new(),
        }
    }
}

/// Inputs the cached resolution was computed for
struct Resolution {
    record: Arc<ComponentRecord>,
    /// Namespace generation the record was resolved from
    generation: u64,
    props: Props,
    children: Vec<PropValue>,
    props_check: bool,
}

/// Lifetime state of one node at one tree position
pub struct DynamicElement {
    key: ComponentKey,
    mounted: bool,
    resolution: Option<Resolution>,
}

impl DynamicElement {
    pub fn new(key: ComponentKey) -> Self {
        Self {
            key,
            mounted: false,
            resolution: None,
        }
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Request the node's namespace. Only the first call does anything.
    pub fn mount(&mut self, coordinator: &LoaderCoordinator) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        coordinator.request_load(&self.key.namespace);
    }

    /// Forget the cached resolution, e.g. after the namespace was reloaded
    pub fn invalidate(&mut self) {
        self.resolution = None;
    }

    /// Render the node.
    ///
    /// `props_check` forces property checking on; the node's own
    /// `props_check` flag can also enable it. `render_children` is only
    /// invoked once the component resolved, so children of a pending node
    /// are not rendered.
    ///
    /// Returns an error when the namespace is loaded but does not provide
    /// the component.
    pub fn render<F>(
        &mut self,
        node: &ElementNode,
        coordinator: &LoaderCoordinator,
        props_check: bool,
        render_children: F,
    ) -> Result<NodeOutput>
    where
        F: FnOnce() -> Vec<Rendered>,
    {
        self.mount(coordinator);
        let check = props_check || node.props_check;

        if let Some(resolution) = &self.resolution {
            let unchanged = resolution.props == node.props
                && resolution.children == node.children
                && resolution.props_check == check;
            let current = coordinator.loaded_generation(&self.key.namespace);
            if unchanged && current == Some(resolution.generation) {
                let element =
                    ConcreteElement::new(Arc::clone(&resolution.record), node, render_children());
                return Ok(NodeOutput {
                    rendered: Rendered::Element(element),
                    diagnostics: Vec::new(),
                });
            }
        }

        // Read before resolving: a reload in between leaves an older
        // generation behind, which only forces another resolution.
        let generation = coordinator.loaded_generation(&self.key.namespace);
        let resolved = coordinator.with_loaded_registry(&self.key.namespace, |registry| {
            resolve_component(registry, &self.key.namespace, &self.key.type_name)
        });
        let (record, generation) = match (resolved, generation) {
            (Some(result), Some(generation)) => (result?, generation),
            _ => {
                self.resolution = None;
                return Ok(NodeOutput::placeholder());
            }
        };

        let mut diagnostics = Vec::new();
        if check {
            for violation in check_element(&record, node) {
                tracing::warn!(component = %self.key, "{}", violation);
                diagnostics.push(violation.to_diagnostic(&self.key));
            }
        }

        self.resolution = Some(Resolution {
            record: Arc::clone(&record),
            generation,
            props: node.props.clone(),
            children: node.children.clone(),
            props_check: check,
        });

        let element = ConcreteElement::new(record, node, render_children());
        Ok(NodeOutput {
            rendered: Rendered::Element(element),
            diagnostics,
        })
    }
}
