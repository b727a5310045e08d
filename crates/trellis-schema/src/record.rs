//! Registered component implementations

use crate::contract::ComponentContract;
use std::fmt;
use std::sync::Arc;
use trellis_core::ComponentKey;

/// A concrete component implementation supplied by a library.
///
/// The rendering core never calls into the implementation beyond asking for
/// the host element it maps to; everything else belongs to the host's
/// rendering pass.
pub trait Component: Send + Sync + fmt::Debug {
    /// Host element tag this component renders as (e.g. "div")
    fn tag(&self) -> &str;
}

/// Implementation built from a library manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredComponent {
    tag: String,
}

impl DeclaredComponent {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl Component for DeclaredComponent {
    fn tag(&self) -> &str {
        &self.tag
    }
}

/// The registry's entry for one component key. Never mutated after
/// registration; consumers hold it behind an `Arc`.
#[derive(Clone)]
pub struct ComponentRecord {
    pub key: ComponentKey,
    pub implementation: Arc<dyn Component>,
    pub contract: Option<ComponentContract>,
    pub description: Option<String>,
}

impl ComponentRecord {
    pub fn new(key: ComponentKey, implementation: Arc<dyn Component>) -> Self {
        Self {
            key,
            implementation,
            contract: None,
            description: None,
        }
    }

    pub fn with_contract(mut self, contract: ComponentContract) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Debug for ComponentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRecord")
            .field("key", &self.key)
            .field("implementation", &self.implementation)
            .field("has_contract", &self.contract.is_some())
            .finish()
    }
}
