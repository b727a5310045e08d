//! Trellis Render - Dynamic element resolution and tree rendering
//!
//! Ties the loader and the registry together per tree node: a node asks for
//! its namespace on mount, renders as an empty placeholder until the
//! namespace is loaded, then resolves its component, optionally checks its
//! props and emits a concrete element.

mod node;
mod output;
mod renderer;
mod resolver;

pub use node::{DynamicElement, NodeOutput};
pub use output::{ConcreteElement, Rendered};
pub use renderer::{RenderPass, Renderer};
pub use resolver::{error_diagnostic, resolve_component};
