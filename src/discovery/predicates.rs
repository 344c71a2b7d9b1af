//! Structural predicates behind the `ClassFinder` shortcuts.

use clap::ValueEnum;
use serde::Deserialize;

use crate::reflection::{ReflectedType, TypeKind};
use crate::utils::type_names_eq;

/// Which methods satisfy a method requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MethodScope {
    #[default]
    Any,
    Static,
    Instance,
}

impl MethodScope {
    pub fn accepts(&self, is_static: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Static => is_static,
            Self::Instance => !is_static,
        }
    }
}

pub fn subclass_of(types: Vec<String>) -> impl Fn(&dyn ReflectedType) -> bool + Send + Sync {
    move |t: &dyn ReflectedType| types.iter().any(|parent| t.is_subtype_of(parent))
}

pub fn has_method(
    names: Vec<String>,
    scope: MethodScope,
) -> impl Fn(&dyn ReflectedType) -> bool + Send + Sync {
    move |t: &dyn ReflectedType| {
        names
            .iter()
            .filter_map(|name| t.method(name))
            .any(|method| scope.accepts(method.is_static))
    }
}

/// Unknown kinds produce a predicate that rejects everything.
pub fn of_kind(kind: &str) -> impl Fn(&dyn ReflectedType) -> bool + Send + Sync {
    let expected = TypeKind::parse(kind);
    move |t: &dyn ReflectedType| expected == Some(t.kind())
}

pub fn is_abstract(expected: bool) -> impl Fn(&dyn ReflectedType) -> bool + Send + Sync {
    move |t: &dyn ReflectedType| t.is_abstract() == expected
}

pub fn is_final(expected: bool) -> impl Fn(&dyn ReflectedType) -> bool + Send + Sync {
    move |t: &dyn ReflectedType| t.is_final() == expected
}

pub fn implements(interfaces: Vec<String>) -> impl Fn(&dyn ReflectedType) -> bool + Send + Sync {
    move |t: &dyn ReflectedType| {
        let own = t.interfaces();
        interfaces
            .iter()
            .any(|wanted| own.iter().any(|i| type_names_eq(i, wanted)))
    }
}

pub fn uses(traits: Vec<String>) -> impl Fn(&dyn ReflectedType) -> bool + Send + Sync {
    move |t: &dyn ReflectedType| {
        let own = t.traits();
        traits
            .iter()
            .any(|wanted| own.iter().any(|u| type_names_eq(u, wanted)))
    }
}
