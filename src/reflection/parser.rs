use std::path::{Path, PathBuf};
use tracing::trace;
use tree_sitter::{Language, Node, Parser};

use super::names::{parse_use_declaration, NameContext};
use super::{MethodInfo, TypeKind};
use crate::error::ParserError;

/// Declaration facts for one PHP class-like type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub is_final: bool,
    /// `extends` targets: at most one for classes, any number for interfaces.
    pub parents: Vec<String>,
    pub interfaces: Vec<String>,
    pub traits: Vec<String>,
    pub methods: Vec<MethodInfo>,
    pub file: PathBuf,
}

pub struct PhpParser {
    parser: Parser,
}

impl PhpParser {
    pub fn new() -> Result<Self, ParserError> {
        let language: Language = tree_sitter_php::LANGUAGE_PHP.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|_| ParserError::language_setup_failed("php"))?;
        Ok(Self { parser })
    }

    /// Class, interface, trait and enum declarations at file level or
    /// directly inside a namespace block.
    pub fn parse_declarations(
        &mut self,
        source: &str,
        path: &Path,
    ) -> Result<Vec<TypeDecl>, ParserError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParserError::parse_failed(path))?;

        let mut collector = Collector {
            source,
            path,
            decls: Vec::new(),
        };
        let mut ctx = NameContext::default();
        collector.statements(tree.root_node(), &mut ctx);

        trace!(file = %path.display(), count = collector.decls.len(), "parsed declarations");
        Ok(collector.decls)
    }
}

struct Collector<'s> {
    source: &'s str,
    path: &'s Path,
    decls: Vec<TypeDecl>,
}

impl<'s> Collector<'s> {
    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn statements(&mut self, node: Node, ctx: &mut NameContext) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "namespace_definition" => {
                    let name = child
                        .child_by_field_name("name")
                        .map(|n| self.text(n))
                        .unwrap_or("");
                    match child.child_by_field_name("body") {
                        Some(body) => {
                            let mut scoped = NameContext::new(name);
                            self.statements(body, &mut scoped);
                        }
                        None => *ctx = NameContext::new(name),
                    }
                }
                "namespace_use_declaration" => {
                    for (name, alias) in parse_use_declaration(self.text(child)) {
                        ctx.add_import(&name, alias.as_deref());
                    }
                }
                "class_declaration" => self.declaration(child, TypeKind::Class, ctx),
                "interface_declaration" => self.declaration(child, TypeKind::Interface, ctx),
                "trait_declaration" => self.declaration(child, TypeKind::Trait, ctx),
                "enum_declaration" => self.declaration(child, TypeKind::Enum, ctx),
                _ => {}
            }
        }
    }

    fn declaration(&mut self, node: Node, kind: TypeKind, ctx: &NameContext) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };

        let mut decl = TypeDecl {
            name: ctx.qualify_declaration(self.text(name_node)),
            kind,
            is_abstract: false,
            // Enums can never be extended.
            is_final: kind == TypeKind::Enum,
            parents: Vec::new(),
            interfaces: Vec::new(),
            traits: Vec::new(),
            methods: Vec::new(),
            file: self.path.to_path_buf(),
        };

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "abstract_modifier" | "abstract" => decl.is_abstract = true,
                "final_modifier" | "final" => decl.is_final = true,
                "base_clause" => decl.parents = self.type_names(child, ctx),
                "class_interface_clause" => decl.interfaces = self.type_names(child, ctx),
                "declaration_list" | "enum_declaration_list" => self.members(child, ctx, &mut decl),
                _ => {}
            }
        }

        self.decls.push(decl);
    }

    fn members(&self, body: Node, ctx: &NameContext, decl: &mut TypeDecl) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" => {
                    if let Some(name) = member.child_by_field_name("name") {
                        decl.methods.push(MethodInfo {
                            name: self.text(name).to_string(),
                            is_static: has_child_kind(member, &["static_modifier", "static"]),
                        });
                    }
                }
                "use_declaration" => decl.traits.extend(self.type_names(member, ctx)),
                _ => {}
            }
        }
    }

    fn type_names(&self, node: Node, ctx: &NameContext) -> Vec<String> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|n| matches!(n.kind(), "name" | "qualified_name"))
            .map(|n| ctx.resolve(self.text(n)))
            .collect()
    }
}

fn has_child_kind(node: Node, kinds: &[&str]) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| kinds.contains(&c.kind()));
    found
}
