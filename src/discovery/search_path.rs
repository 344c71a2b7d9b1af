use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Directories to scan, each with an optional namespace to register for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    entries: Vec<(PathBuf, Option<String>)>,
}

impl SearchPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, path: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        self.entries.push((path.into(), Some(namespace.into())));
        self
    }

    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.entries.push((path.into(), None));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, Option<&str>)> {
        self.entries
            .iter()
            .map(|(path, namespace)| (path.as_path(), namespace.as_deref()))
    }
}

impl IntoIterator for SearchPaths {
    type Item = (PathBuf, Option<String>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<&str> for SearchPaths {
    fn from(path: &str) -> Self {
        PathBuf::from(path).into()
    }
}

impl From<&Path> for SearchPaths {
    fn from(path: &Path) -> Self {
        path.to_path_buf().into()
    }
}

impl From<PathBuf> for SearchPaths {
    fn from(path: PathBuf) -> Self {
        Self {
            entries: vec![(path, None)],
        }
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for SearchPaths {
    fn from(paths: Vec<P>) -> Self {
        Self {
            entries: paths.into_iter().map(|p| (p.into(), None)).collect(),
        }
    }
}

impl<P: Into<PathBuf>, const N: usize> From<[P; N]> for SearchPaths {
    fn from(paths: [P; N]) -> Self {
        Self {
            entries: paths.into_iter().map(|p| (p.into(), None)).collect(),
        }
    }
}

macro_rules! from_namespace_map {
    ($map:ident) => {
        impl<P: Into<PathBuf>, N: Into<String>> From<$map<P, N>> for SearchPaths {
            fn from(map: $map<P, N>) -> Self {
                Self {
                    entries: map
                        .into_iter()
                        .map(|(path, namespace)| (path.into(), Some(namespace.into())))
                        .collect(),
                }
            }
        }
    };
}

from_namespace_map!(IndexMap);
from_namespace_map!(BTreeMap);
from_namespace_map!(HashMap);
