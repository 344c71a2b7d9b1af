use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

use super::NamespaceRegistry;
use crate::utils::{namespace_segments, normalize_path, strip_extension, NAMESPACE_SEPARATOR};

/// First `namespace Foo\Bar;` at the start of a line.
static NAMESPACE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*namespace\s+([\w\\]+)\s*;").expect("valid namespace pattern")
});

/// Maps source file paths to fully-qualified type names.
///
/// Registered mappings are interpolated without touching the file. On a
/// miss the file's namespace declaration is read, and the root directory
/// it implies is learned into the registry so sibling files take the
/// interpolation path next time.
#[derive(Debug, Clone)]
pub struct PathResolver {
    registry: Arc<NamespaceRegistry>,
}

impl PathResolver {
    pub fn new(registry: Arc<NamespaceRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<NamespaceRegistry> {
        &self.registry
    }

    pub fn resolve_type(&self, file_path: &Path) -> Option<String> {
        let normalized = normalize_path(file_path);

        if let Some(mapping) = self.registry.resolve_normalized(&normalized) {
            let relative = &normalized[mapping.base_path.len()..];
            let name = interpolate(&mapping.namespace, relative);
            trace!(file = %normalized, name = ?name, "resolved from namespace mapping");
            return name;
        }

        self.resolve_from_source(&normalized)
    }

    fn resolve_from_source(&self, normalized: &str) -> Option<String> {
        let path = Path::new(normalized);
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                debug!(file = %normalized, error = %e, "skipping unreadable file");
                return None;
            }
        };

        let namespace = declared_namespace(&source).unwrap_or_default();
        let base_name = path
            .file_name()
            .map(|n| strip_extension(&n.to_string_lossy()).to_string())
            .unwrap_or_default();
        if base_name.is_empty() {
            debug!(file = %normalized, "skipping file without a base name");
            return None;
        }

        let name = if namespace.is_empty() {
            base_name
        } else {
            format!("{namespace}{NAMESPACE_SEPARATOR}{base_name}")
        };

        if let Some(dir) = path.parent() {
            self.learn_root(dir, &namespace);
        }

        trace!(file = %normalized, name = %name, "resolved from namespace declaration");
        Some(name)
    }

    /// Walks up one directory per namespace segment below the root and
    /// registers that directory under the root segment.
    fn learn_root(&self, dir: &Path, namespace: &str) {
        let segments = namespace_segments(namespace);
        let Some(root_namespace) = segments.first() else {
            return;
        };
        let extra_depth = segments.len() - 1;

        match dir.ancestors().nth(extra_depth) {
            Some(base) if !base.as_os_str().is_empty() => {
                self.registry.register_if_absent(base, root_namespace);
            }
            _ => {
                debug!(dir = %dir.display(), namespace, "namespace is deeper than the directory tree, not learning");
            }
        }
    }
}

/// Text of the first namespace declaration, without surrounding separators.
pub fn declared_namespace(source: &str) -> Option<String> {
    NAMESPACE_DECLARATION
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_matches(NAMESPACE_SEPARATOR).to_string())
}

fn interpolate(namespace: &str, relative: &str) -> Option<String> {
    let stem = match relative.rfind('/') {
        Some(idx) => {
            let (dirs, file) = relative.split_at(idx + 1);
            format!("{dirs}{}", strip_extension(file))
        }
        None => strip_extension(relative).to_string(),
    };
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }

    let suffix = stem.replace('/', &NAMESPACE_SEPARATOR.to_string());
    Some(format!("{namespace}{suffix}"))
}
