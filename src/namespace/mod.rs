//! Path to type-name resolution.
//!
//! - **registry**: longest-prefix map from base directory to namespace
//! - **resolver**: interpolation against the registry, with a namespace
//!   header fallback that learns new root mappings

pub mod registry;
pub mod resolver;

pub use registry::{NamespaceMapping, NamespaceRegistry};
pub use resolver::{declared_namespace, PathResolver};
