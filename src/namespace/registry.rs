use parking_lot::RwLock;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, trace};

use crate::utils::{normalize_dir, normalize_namespace, normalize_path};

/// A base directory and the namespace its files live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceMapping {
    /// Absolute, `/`-separated, ends with `/`.
    pub base_path: String,
    /// No leading separator; ends with `\` unless it is the global namespace.
    pub namespace: String,
}

impl NamespaceMapping {
    pub fn new(base_path: &Path, namespace: &str) -> Self {
        Self {
            base_path: normalize_dir(base_path),
            namespace: normalize_namespace(namespace),
        }
    }
}

/// Process-lifetime map from base directory to namespace, evaluated
/// longest base path first.
///
/// Shared as `Arc<NamespaceRegistry>`. Inserting re-sorts the whole
/// collection, so every access goes through the lock.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    mappings: RwLock<Vec<NamespaceMapping>>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every pair, later pairs overwriting earlier ones for the
    /// same base path.
    pub fn bootstrap<P, N, I>(&self, pairs: I)
    where
        P: AsRef<Path>,
        N: AsRef<str>,
        I: IntoIterator<Item = (P, N)>,
    {
        for (base_path, namespace) in pairs {
            self.register(base_path.as_ref(), namespace.as_ref());
        }
    }

    /// Stores the mapping, replacing any namespace already held for the base path.
    pub fn register(&self, base_path: &Path, namespace: &str) {
        let mapping = NamespaceMapping::new(base_path, namespace);
        debug!(base_path = %mapping.base_path, namespace = %mapping.namespace, "registering namespace");

        let mut mappings = self.mappings.write();
        match mappings
            .iter_mut()
            .find(|m| m.base_path == mapping.base_path)
        {
            Some(existing) => existing.namespace = mapping.namespace,
            None => mappings.push(mapping),
        }
        sort_longest_first(&mut mappings);
    }

    /// Stores the mapping only when nothing is registered for that exact
    /// base path. Returns whether it was inserted.
    pub fn register_if_absent(&self, base_path: &Path, namespace: &str) -> bool {
        let mapping = NamespaceMapping::new(base_path, namespace);

        let mut mappings = self.mappings.write();
        if mappings.iter().any(|m| m.base_path == mapping.base_path) {
            trace!(base_path = %mapping.base_path, "mapping already present");
            return false;
        }

        debug!(base_path = %mapping.base_path, namespace = %mapping.namespace, "learned namespace mapping");
        mappings.push(mapping);
        sort_longest_first(&mut mappings);
        true
    }

    /// Most specific mapping whose base path prefixes `file_path`.
    pub fn resolve(&self, file_path: &Path) -> Option<NamespaceMapping> {
        self.resolve_normalized(&normalize_path(file_path))
    }

    pub(crate) fn resolve_normalized(&self, file_path: &str) -> Option<NamespaceMapping> {
        self.mappings
            .read()
            .iter()
            .find(|m| file_path.starts_with(m.base_path.as_str()))
            .cloned()
    }

    /// Snapshot in evaluation order.
    pub fn list_all(&self) -> Vec<NamespaceMapping> {
        self.mappings.read().clone()
    }

    pub fn len(&self) -> usize {
        self.mappings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.read().is_empty()
    }

    pub fn clear(&self) {
        self.mappings.write().clear();
    }
}

fn sort_longest_first(mappings: &mut [NamespaceMapping]) {
    mappings.sort_by(|a, b| b.base_path.len().cmp(&a.base_path.len()));
}
