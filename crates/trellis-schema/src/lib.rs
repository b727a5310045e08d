//! Trellis Schema - Component contracts and the component registry
//!
//! This crate provides the process-wide dispatch table from
//! `(namespace, type)` to component implementations, the prop-type
//! metadata components declare, and the advisory property validator.

mod contract;
mod library;
mod record;
mod registry;
mod validation;

pub use contract::{ComponentContract, PropSchema, PropType};
pub use library::LibraryBundle;
pub use record::{Component, ComponentRecord, DeclaredComponent};
pub use registry::ComponentRegistry;
pub use validation::{check, check_contract, check_element, Violation, ViolationKind};
