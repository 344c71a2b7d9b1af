/// Class Finder
///
/// Discovers PHP types below source directories. File paths are mapped to
/// fully-qualified names through a longest-prefix namespace registry that
/// learns new roots from namespace declarations, and the resulting types
/// are narrowed by a grouped filter pipeline over tree-sitter backed
/// declaration facts.
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod namespace;
pub mod output;
pub mod reflection;
pub mod utils;

pub use discovery::{ClassFinder, FilterPipeline, MethodScope, SearchPaths};
pub use namespace::{NamespaceMapping, NamespaceRegistry, PathResolver};
pub use reflection::{Introspector, ReflectedType, SourceIndex, TypeKind};
