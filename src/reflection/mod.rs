//! Type introspection.
//!
//! Discovery only talks to [`Introspector`] and [`ReflectedType`]; the
//! [`SourceIndex`] implementation answers both from PHP declarations read
//! with tree-sitter.

pub mod index;
pub mod names;
pub mod parser;

use serde::Serialize;

use crate::error::IntrospectionError;
pub use index::SourceIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Interface,
    Trait,
    Enum,
}

impl TypeKind {
    /// Case-insensitive; unknown kinds yield `None`.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "trait" => Some(Self::Trait),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Trait => "trait",
            Self::Enum => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    pub name: String,
    pub is_static: bool,
}

/// Structural questions asked of one type.
pub trait ReflectedType {
    fn name(&self) -> &str;

    fn kind(&self) -> TypeKind;

    fn is_abstract(&self) -> bool;

    fn is_final(&self) -> bool;

    /// True for any ancestor class or interface, never for the type itself.
    fn is_subtype_of(&self, name: &str) -> bool;

    /// Interfaces named in the type's own declaration.
    fn interfaces(&self) -> Vec<String>;

    /// Traits composed directly by the type.
    fn traits(&self) -> Vec<String>;

    fn method(&self, name: &str) -> Option<MethodInfo>;

    fn is_interface(&self) -> bool {
        self.kind() == TypeKind::Interface
    }

    fn is_trait(&self) -> bool {
        self.kind() == TypeKind::Trait
    }

    fn is_enum(&self) -> bool {
        self.kind() == TypeKind::Enum
    }

    fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }
}

/// Looks types up by fully-qualified name.
pub trait Introspector: Send + Sync {
    /// Whether a loadable definition exists under `name`.
    fn type_exists(&self, name: &str) -> bool;

    fn reflect<'a>(&'a self, name: &str)
        -> Result<Box<dyn ReflectedType + 'a>, IntrospectionError>;
}
