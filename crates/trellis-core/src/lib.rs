//! Trellis Core - Foundational types for the Trellis rendering layer
//!
//! This crate provides the types every other Trellis crate depends on:
//! - `ComponentKey` - (namespace, type) component identifiers
//! - `PropValue`, `PropKind`, `Props` - loosely typed component properties
//! - `ElementNode` - one node of a tree description
//! - `Diagnostic` - structured records for the host to log or surface
//! - `Fingerprint` - SHA-256 digest of a library bundle's source
//! - Error types and Result alias

mod diagnostic;
mod error;
mod fingerprint;
mod key;
mod tree;
mod value;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{Result, TrellisError};
pub use fingerprint::Fingerprint;
pub use key::ComponentKey;
pub use tree::ElementNode;
pub use value::{PropKind, PropValue, Props};
