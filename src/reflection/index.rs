use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::parser::{PhpParser, TypeDecl};
use super::{Introspector, MethodInfo, ReflectedType, TypeKind};
use crate::discovery::enumerator::{FileEnumerator, ScanDepth, SOURCE_PATTERN};
use crate::error::{Error, IntrospectionError, IoError, ParserError};
use crate::utils::type_key;

/// Every type declared under a set of source roots, keyed by
/// case-insensitive fully-qualified name.
#[derive(Debug, Default)]
pub struct SourceIndex {
    types: IndexMap<String, TypeDecl>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every source file below `roots`. Files that cannot be read
    /// or parsed are skipped with a warning.
    pub fn build(roots: &[PathBuf], enumerator: &dyn FileEnumerator) -> Result<Self, Error> {
        let files = enumerator.enumerate(roots, SOURCE_PATTERN, ScanDepth::Unbounded)?;
        let mut parser = PhpParser::new()?;
        let mut index = Self::new();

        for file in &files {
            if let Err(e) = index.index_file(&mut parser, file) {
                warn!(file = %file.display(), error = %e, "skipping file");
            }
        }

        info!(files = files.len(), types = index.len(), "built source index");
        Ok(index)
    }

    pub fn index_file(&mut self, parser: &mut PhpParser, path: &Path) -> Result<usize, Error> {
        let source = fs::read_to_string(path).map_err(|e| IoError::read_error(path, e))?;
        Ok(self.index_source(parser, &source, path)?)
    }

    pub fn index_source(
        &mut self,
        parser: &mut PhpParser,
        source: &str,
        path: &Path,
    ) -> Result<usize, ParserError> {
        let decls = parser.parse_declarations(source, path)?;
        let count = decls.len();
        for decl in decls {
            self.insert(decl);
        }
        Ok(count)
    }

    /// The first declaration of a name wins.
    pub fn insert(&mut self, decl: TypeDecl) {
        let key = type_key(&decl.name);
        if let Some(existing) = self.types.get(&key) {
            debug!(
                name = %decl.name,
                kept = %existing.file.display(),
                ignored = %decl.file.display(),
                "duplicate type declaration"
            );
            return;
        }
        self.types.insert(key, decl);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(&type_key(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.values().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Introspector for SourceIndex {
    fn type_exists(&self, name: &str) -> bool {
        self.types.contains_key(&type_key(name))
    }

    fn reflect<'a>(
        &'a self,
        name: &str,
    ) -> Result<Box<dyn ReflectedType + 'a>, IntrospectionError> {
        let decl = self
            .get(name)
            .ok_or_else(|| IntrospectionError::type_not_found(name))?;
        Ok(Box::new(IndexedType { index: self, decl }))
    }
}

/// A declaration viewed through the index so ancestors can be followed.
pub struct IndexedType<'a> {
    index: &'a SourceIndex,
    decl: &'a TypeDecl,
}

impl IndexedType<'_> {
    /// Breadth-first walk over names reachable through `next`, skipping the
    /// start type and anything already seen. Unknown names are yielded but
    /// not expanded.
    fn walk<F>(&self, next: F) -> Vec<String>
    where
        F: Fn(&TypeDecl) -> Vec<&String>,
    {
        let mut seen = HashSet::from([type_key(&self.decl.name)]);
        let mut queue: VecDeque<String> = next(self.decl).into_iter().cloned().collect();
        let mut out = Vec::new();

        while let Some(name) = queue.pop_front() {
            if !seen.insert(type_key(&name)) {
                continue;
            }
            if let Some(decl) = self.index.get(&name) {
                queue.extend(next(decl).into_iter().cloned());
            }
            out.push(name);
        }
        out
    }
}

impl ReflectedType for IndexedType<'_> {
    fn name(&self) -> &str {
        &self.decl.name
    }

    fn kind(&self) -> TypeKind {
        self.decl.kind
    }

    fn is_abstract(&self) -> bool {
        self.decl.is_abstract
    }

    fn is_final(&self) -> bool {
        self.decl.is_final
    }

    fn is_subtype_of(&self, name: &str) -> bool {
        let target = type_key(name);
        self.walk(|d| d.parents.iter().chain(d.interfaces.iter()).collect())
            .iter()
            .any(|ancestor| type_key(ancestor) == target)
    }

    fn interfaces(&self) -> Vec<String> {
        self.decl.interfaces.clone()
    }

    fn traits(&self) -> Vec<String> {
        self.decl.traits.clone()
    }

    fn method(&self, name: &str) -> Option<MethodInfo> {
        let find = |decl: &TypeDecl| {
            decl.methods
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(name))
                .cloned()
        };

        if let Some(method) = find(self.decl) {
            return Some(method);
        }
        self.walk(|d| {
            d.traits
                .iter()
                .chain(d.parents.iter())
                .chain(d.interfaces.iter())
                .collect()
        })
        .iter()
        .filter_map(|ancestor| self.index.get(ancestor))
        .find_map(find)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(sources: &[(&str, &str)]) -> SourceIndex {
        let mut parser = PhpParser::new().unwrap();
        let mut index = SourceIndex::new();
        for (path, source) in sources {
            index
                .index_source(&mut parser, source, Path::new(path))
                .unwrap();
        }
        index
    }

    fn fixture() -> SourceIndex {
        index(&[
            (
                "/app/Contracts/Handler.php",
                "<?php\nnamespace App\\Contracts;\ninterface Handler extends Base {}\ninterface Base {}\n",
            ),
            (
                "/app/Concerns/Loggable.php",
                "<?php\nnamespace App\\Concerns;\ntrait Loggable { public static function logger() {} }\n",
            ),
            (
                "/app/Base.php",
                "<?php\nnamespace App;\nuse App\\Contracts\\Handler;\nabstract class Base implements Handler { public function boot() {} }\n",
            ),
            (
                "/app/Service.php",
                "<?php\nnamespace App;\nuse App\\Concerns\\Loggable;\nfinal class Service extends Base { use Loggable; }\n",
            ),
        ])
    }

    #[test]
    fn test_type_exists_is_case_insensitive() {
        let index = fixture();
        assert!(index.type_exists("App\\Service"));
        assert!(index.type_exists("\\app\\service"));
        assert!(!index.type_exists("App\\Missing"));
    }

    #[test]
    fn test_reflect_missing_type() {
        let index = fixture();
        assert!(matches!(
            index.reflect("App\\Missing"),
            Err(IntrospectionError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn test_subtype_is_transitive_over_classes_and_interfaces() {
        let index = fixture();
        let service = index.reflect("App\\Service").unwrap();

        assert!(service.is_subtype_of("App\\Base"));
        assert!(service.is_subtype_of("App\\Contracts\\Handler"));
        assert!(service.is_subtype_of("App\\Contracts\\Base"));
        assert!(!service.is_subtype_of("App\\Service"));
        assert!(!service.is_subtype_of("App\\Concerns\\Loggable"));
    }

    #[test]
    fn test_direct_interfaces_and_traits() {
        let index = fixture();
        let service = index.reflect("App\\Service").unwrap();
        let base = index.reflect("App\\Base").unwrap();

        assert!(service.interfaces().is_empty());
        assert_eq!(base.interfaces(), vec!["App\\Contracts\\Handler"]);
        assert_eq!(service.traits(), vec!["App\\Concerns\\Loggable"]);
    }

    #[test]
    fn test_methods_come_from_traits_and_parents() {
        let index = fixture();
        let service = index.reflect("App\\Service").unwrap();

        let logger = service.method("logger").unwrap();
        assert!(logger.is_static);
        let boot = service.method("BOOT").unwrap();
        assert!(!boot.is_static);
        assert!(service.method("missing").is_none());
    }

    #[test]
    fn test_modifiers_and_kind() {
        let index = fixture();
        let base = index.reflect("App\\Base").unwrap();
        let handler = index.reflect("App\\Contracts\\Handler").unwrap();

        assert!(base.is_abstract());
        assert!(!base.is_final());
        assert!(handler.is_interface());
        assert!(!handler.is_trait());
    }

    #[test]
    fn test_method_declared_only_on_interface() {
        let index = index(&[(
            "/app/Base.php",
            "<?php\nnamespace App;\ninterface Handler { public function handle(); }\nabstract class Base implements Handler {}\n",
        )]);
        let base = index.reflect("App\\Base").unwrap();
        let handle = base.method("handle").unwrap();
        assert!(!handle.is_static);
        assert!(base.has_method("HANDLE"));
    }

    #[test]
    fn test_cyclic_hierarchy_terminates() {
        let index = index(&[(
            "/app/Loop.php",
            "<?php\nnamespace App;\nclass A extends B {}\nclass B extends A {}\n",
        )]);
        let a = index.reflect("App\\A").unwrap();
        assert!(a.is_subtype_of("App\\B"));
        assert!(!a.is_subtype_of("App\\C"));
    }

    #[test]
    fn test_duplicate_declaration_keeps_first() {
        let index = index(&[
            ("/a/User.php", "<?php\nnamespace App;\nclass User {}\n"),
            ("/b/User.php", "<?php\nnamespace App;\nfinal class User {}\n"),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get("App\\User").unwrap().file,
            PathBuf::from("/a/User.php")
        );
    }
}
