//! Class discovery.
//!
//! [`ClassFinder`] ties the namespace resolver, the filter pipeline and the
//! file/type collaborators together:
//!
//! - **enumerator**: candidate source files below the search paths
//! - **filter**: grouped predicates (AND across groups, OR within one)
//! - **predicates**: the structural shortcuts (`subclass_of`, `is_type`, ...)
//! - **search_path**: single path, list or path-to-namespace map input

pub mod enumerator;
pub mod filter;
pub mod predicates;
pub mod search_path;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, trace};

use crate::error::Result;
use crate::namespace::{NamespaceRegistry, PathResolver};
use crate::reflection::{Introspector, ReflectedType};
pub use enumerator::{FileEnumerator, ScanDepth, WalkDirEnumerator, SOURCE_PATTERN};
pub use filter::FilterPipeline;
pub use predicates::MethodScope;
pub use search_path::SearchPaths;

pub const TYPE_FILTER: &str = "type";
pub const ABSTRACT_FILTER: &str = "abstract";
pub const FINAL_FILTER: &str = "final";

/// Builder-style type discovery over a set of directories.
///
/// ```no_run
/// # use std::path::PathBuf;
/// # use std::sync::Arc;
/// # use class_finder::discovery::{ClassFinder, WalkDirEnumerator};
/// # use class_finder::namespace::NamespaceRegistry;
/// # use class_finder::reflection::SourceIndex;
/// let registry = Arc::new(NamespaceRegistry::new());
/// let index = SourceIndex::build(&[PathBuf::from("app")], &WalkDirEnumerator::new())?;
/// let listeners = ClassFinder::new(registry, Arc::new(index))
///     .in_paths("app/Listeners", Some("App\\Listeners"))
///     .implements(["App\\Contracts\\Listener"])
///     .is_abstract(false)
///     .discover()?;
/// # Ok::<(), class_finder::error::Error>(())
/// ```
pub struct ClassFinder {
    resolver: PathResolver,
    introspector: Arc<dyn Introspector>,
    enumerator: Arc<dyn FileEnumerator>,
    search_paths: Vec<PathBuf>,
    recursive: bool,
    filters: FilterPipeline,
}

impl ClassFinder {
    pub fn new(registry: Arc<NamespaceRegistry>, introspector: Arc<dyn Introspector>) -> Self {
        Self::with_enumerator(registry, introspector, Arc::new(WalkDirEnumerator::new()))
    }

    pub fn with_enumerator(
        registry: Arc<NamespaceRegistry>,
        introspector: Arc<dyn Introspector>,
        enumerator: Arc<dyn FileEnumerator>,
    ) -> Self {
        Self {
            resolver: PathResolver::new(registry),
            introspector,
            enumerator,
            search_paths: Vec::new(),
            recursive: true,
            filters: FilterPipeline::new(),
        }
    }

    pub fn registry(&self) -> &Arc<NamespaceRegistry> {
        self.resolver.registry()
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn filters(&self) -> &FilterPipeline {
        &self.filters
    }

    /// Adds every existing directory in `paths`. A namespace from a
    /// path-to-namespace map takes precedence over `namespace`.
    pub fn in_paths(&mut self, paths: impl Into<SearchPaths>, namespace: Option<&str>) -> &mut Self {
        for (path, own_namespace) in paths.into() {
            if !path.is_dir() {
                debug!(path = %path.display(), "ignoring search path that is not a directory");
                continue;
            }

            let path = std::path::absolute(&path).unwrap_or(path);
            if let Some(ns) = own_namespace.as_deref().or(namespace) {
                self.registry().register(&path, ns);
            }
            if !self.search_paths.contains(&path) {
                self.search_paths.push(path);
            }
        }
        self
    }

    /// `false` limits the scan to files directly inside each search path.
    pub fn recursive(&mut self, recursive: bool) -> &mut Self {
        self.recursive = recursive;
        self
    }

    /// Keeps subtypes of any of `types`.
    pub fn subclass_of<I, S>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters
            .register(None, predicates::subclass_of(collect(types)), false);
        self
    }

    /// Keeps types exposing any of `methods` with the required scope.
    pub fn has_method<I, S>(&mut self, methods: I, scope: MethodScope) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters
            .register(None, predicates::has_method(collect(methods), scope), false);
        self
    }

    /// `class`, `interface`, `trait` or `enum`, case-insensitively. Any other
    /// value matches nothing. Replaces an earlier kind constraint.
    pub fn is_type(&mut self, kind: &str) -> &mut Self {
        self.filters
            .register(Some(TYPE_FILTER), predicates::of_kind(kind), true);
        self
    }

    pub fn is_abstract(&mut self, is_abstract: bool) -> &mut Self {
        self.filters
            .register(Some(ABSTRACT_FILTER), predicates::is_abstract(is_abstract), true);
        self
    }

    pub fn is_final(&mut self, is_final: bool) -> &mut Self {
        self.filters
            .register(Some(FINAL_FILTER), predicates::is_final(is_final), true);
        self
    }

    /// Keeps types directly implementing any of `interfaces`.
    pub fn implements<I, S>(&mut self, interfaces: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters
            .register(None, predicates::implements(collect(interfaces)), false);
        self
    }

    /// Keeps types directly using any of `traits`.
    pub fn uses<I, S>(&mut self, traits: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters
            .register(None, predicates::uses(collect(traits)), false);
        self
    }

    /// Adds a custom predicate to group `id`; `None` creates a new group.
    pub fn filter<F>(&mut self, id: Option<&str>, predicate: F) -> &mut Self
    where
        F: Fn(&dyn ReflectedType) -> bool + Send + Sync + 'static,
    {
        self.filters.register(id, predicate, false);
        self
    }

    /// Replaces group `id` with a single custom predicate.
    pub fn filter_singular<F>(&mut self, id: &str, predicate: F) -> &mut Self
    where
        F: Fn(&dyn ReflectedType) -> bool + Send + Sync + 'static,
    {
        self.filters.register(Some(id), predicate, true);
        self
    }

    pub fn remove_filter(&mut self, id: &str) -> &mut Self {
        self.filters.remove(id);
        self
    }

    pub fn discover_in(&mut self, paths: impl Into<SearchPaths>) -> Result<Vec<String>> {
        self.in_paths(paths, None);
        self.discover()
    }

    /// Fully-qualified names of every matching type, in enumeration order.
    ///
    /// Files that resolve to no name, or to a name with no known type, are
    /// skipped. Enumeration and introspection failures are returned.
    pub fn discover(&mut self) -> Result<Vec<String>> {
        if !self.filters.contains(TYPE_FILTER) {
            self.is_type("class");
        }

        let depth = if self.recursive {
            ScanDepth::Unbounded
        } else {
            ScanDepth::TopLevel
        };
        let files = self
            .enumerator
            .enumerate(&self.search_paths, SOURCE_PATTERN, depth)?;

        let mut found = Vec::new();
        for file in &files {
            if let Some(name) = self.check_file(file)? {
                found.push(name);
            }
        }

        info!(
            files = files.len(),
            types = found.len(),
            "discovery finished"
        );
        Ok(found)
    }

    fn check_file(&self, file: &Path) -> Result<Option<String>> {
        let Some(name) = self.resolver.resolve_type(file) else {
            return Ok(None);
        };
        if !self.introspector.type_exists(&name) {
            debug!(file = %file.display(), name = %name, "no type declared under resolved name");
            return Ok(None);
        }

        let reflected = self.introspector.reflect(&name)?;
        let matched = self.filters.evaluate(&*reflected);
        trace!(name = %name, matched, "evaluated filters");
        Ok(matched.then_some(name))
    }
}

fn collect<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
