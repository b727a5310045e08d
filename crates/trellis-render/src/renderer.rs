//! Tree render pass
//!
//! A [`Renderer`] keeps one [`DynamicElement`] per tree position across
//! passes. Each pass commits finished loads, invalidates nodes whose
//! namespace changed and walks the tree depth-first. A node that fails to
//! resolve renders as [`Rendered::Error`] and leaves its siblings alone.

use crate::node::DynamicElement;
use crate::output::Rendered;
use crate::resolver::error_diagnostic;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use trellis_core::{Diagnostic, ElementNode, PropValue};
use trellis_loader::{LoadEvent, LoadState, LoaderCoordinator};

/// Result of one render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPass {
    #[serde(serialize_with = "serialize_rendered")]
    pub output: Rendered,
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderPass {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

fn serialize_rendered<S: serde::Serializer>(
    rendered: &Rendered,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    rendered.to_json().serialize(serializer)
}

/// Position of a node: child indices from the root
type NodePath = Vec<usize>;

struct Slot {
    element: DynamicElement,
    /// Detail of the last resolve error reported for this slot
    last_error: Option<String>,
    /// Pass in which the slot was last rendered
    seen: u64,
}

/// Renders a tree description against a shared coordinator
pub struct Renderer {
    coordinator: LoaderCoordinator,
    events: Receiver<LoadEvent>,
    nodes: HashMap<NodePath, Slot>,
    /// Failed namespaces this renderer has already reported
    reported_failures: HashSet<String>,
    props_check: bool,
    pass: u64,
}

impl Renderer {
    pub fn new(coordinator: LoaderCoordinator) -> Self {
        let events = coordinator.subscribe();
        Self {
            coordinator,
            events,
            nodes: HashMap::new(),
            reported_failures: HashSet::new(),
            props_check: false,
            pass: 0,
        }
    }

    /// Check props on every node, regardless of per-node flags
    pub fn with_props_check(mut self, enabled: bool) -> Self {
        self.props_check = enabled;
        self
    }

    pub fn coordinator(&self) -> &LoaderCoordinator {
        &self.coordinator
    }

    /// Number of tree positions with live node state
    pub fn mounted(&self) -> usize {
        self.nodes.len()
    }

    /// Run one pass over the tree. Never blocks on a fetch.
    pub fn render(&mut self, tree: &ElementNode) -> RenderPass {
        self.pass += 1;
        let mut diagnostics = Vec::new();

        self.coordinator.poll();
        let events: Vec<LoadEvent> = self.events.try_iter().collect();
        for event in &events {
            match event {
                LoadEvent::Failed { namespace, reason } => {
                    self.report_failure(namespace, reason, &mut diagnostics);
                }
                LoadEvent::Loaded { namespace, .. } | LoadEvent::Reloading { namespace } => {
                    self.reported_failures.remove(namespace);
                }
            }
            self.invalidate_namespace(event.namespace());
        }

        let output = self.render_element(tree, Vec::new(), &mut diagnostics);

        let pass = self.pass;
        self.nodes.retain(|_, slot| slot.seen == pass);

        RenderPass {
            output,
            diagnostics,
        }
    }

    /// Render repeatedly, waiting for loads in between, until a pass starts
    /// no new fetch or the timeout passes. Diagnostics of every pass are
    /// collected; the output is the last pass's.
    pub fn render_until_settled(&mut self, tree: &ElementNode, timeout: Duration) -> RenderPass {
        let deadline = Instant::now() + timeout;
        let mut diagnostics = Vec::new();
        loop {
            let pass = self.render(tree);
            diagnostics.extend(pass.diagnostics);

            let now = Instant::now();
            if !self.coordinator.has_pending() || now >= deadline {
                return RenderPass {
                    output: pass.output,
                    diagnostics,
                };
            }
            self.coordinator.settle(deadline - now);
        }
    }

    /// Report a namespace's load failure once per renderer, whether it is
    /// seen as an event or found on a placeholder node
    fn report_failure(&mut self, namespace: &str, reason: &str, diagnostics: &mut Vec<Diagnostic>) {
        if self.reported_failures.insert(namespace.to_string()) {
            diagnostics.push(Diagnostic::load_failure(namespace, reason));
        }
    }

    fn invalidate_namespace(&mut self, namespace: &str) {
        for slot in self.nodes.values_mut() {
            if slot.element.key().namespace == namespace {
                slot.element.invalidate();
                slot.last_error = None;
            }
        }
    }

    fn render_element(
        &mut self,
        node: &ElementNode,
        path: NodePath,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Rendered {
        let key = node.key();
        let mut slot = match self.nodes.remove(&path) {
            Some(slot) if slot.element.key() == &key => slot,
            _ => Slot {
                element: DynamicElement::new(key.clone()),
                last_error: None,
                seen: 0,
            },
        };
        slot.seen = self.pass;

        let coordinator = self.coordinator.clone();
        let props_check = self.props_check;
        let mut child_diagnostics = Vec::new();
        let result = slot.element.render(node, &coordinator, props_check, || {
            self.render_children(&node.children, &path, &mut child_diagnostics)
        });

        let rendered = match result {
            Ok(output) => {
                slot.last_error = None;
                if output.rendered.is_empty() {
                    // Failed before this renderer subscribed
                    if let LoadState::Failed(reason) = self.coordinator.load_state(&key.namespace) {
                        self.report_failure(&key.namespace, &reason, diagnostics);
                    }
                }
                diagnostics.extend(output.diagnostics);
                output.rendered
            }
            Err(e) => {
                let diagnostic = error_diagnostic(&key, &e);
                if slot.last_error.as_deref() != Some(diagnostic.detail.as_str()) {
                    tracing::warn!(component = %key, error = %e, "component failed to resolve");
                    slot.last_error = Some(diagnostic.detail.clone());
                    diagnostics.push(diagnostic.clone());
                }
                Rendered::Error(diagnostic)
            }
        };
        diagnostics.extend(child_diagnostics);

        self.nodes.insert(path, slot);
        rendered
    }

    fn render_children(
        &mut self,
        children: &[PropValue],
        path: &[usize],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Rendered> {
        children
            .iter()
            .enumerate()
            .map(|(index, child)| {
                let mut child_path = path.to_vec();
                child_path.push(index);
                self.render_value(child, child_path, diagnostics)
            })
            .collect()
    }

    fn render_value(
        &mut self,
        value: &PropValue,
        path: NodePath,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Rendered {
        match value {
            PropValue::Element(node) => self.render_element(node, path, diagnostics),
            PropValue::Sequence(items) => {
                Rendered::Fragment(self.render_children(items, &path, diagnostics))
            }
            other => Rendered::Value(other.clone()),
        }
    }
}
