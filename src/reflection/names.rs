use std::collections::HashMap;

use crate::utils::{extract_last_segment, trim_type_name, NAMESPACE_SEPARATOR};

/// Namespace and `use` imports in effect at a point in a PHP file.
#[derive(Debug, Clone, Default)]
pub struct NameContext {
    namespace: String,
    imports: HashMap<String, String>,
}

impl NameContext {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.trim().trim_matches(NAMESPACE_SEPARATOR).to_string(),
            imports: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `use Foo\Bar;` imports `Bar`, `use Foo\Bar as Baz;` imports `Baz`.
    pub fn add_import(&mut self, name: &str, alias: Option<&str>) {
        let target = trim_type_name(name).to_string();
        if target.is_empty() {
            return;
        }
        let alias = alias.unwrap_or_else(|| extract_last_segment(&target));
        self.imports.insert(alias.to_ascii_lowercase(), target);
    }

    /// Name of a type declared in this context.
    pub fn qualify_declaration(&self, short_name: &str) -> String {
        self.prefix_namespace(short_name.trim())
    }

    /// Resolves a name used in this context to its fully-qualified form.
    pub fn resolve(&self, name: &str) -> String {
        let name = name.trim();
        if let Some(absolute) = name.strip_prefix(NAMESPACE_SEPARATOR) {
            return absolute.to_string();
        }

        let (first, rest) = match name.split_once(NAMESPACE_SEPARATOR) {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };

        if first.eq_ignore_ascii_case("namespace") {
            return self.prefix_namespace(rest.unwrap_or_default());
        }

        match self.imports.get(&first.to_ascii_lowercase()) {
            Some(imported) => match rest {
                Some(rest) => format!("{imported}{NAMESPACE_SEPARATOR}{rest}"),
                None => imported.clone(),
            },
            None => self.prefix_namespace(name),
        }
    }

    fn prefix_namespace(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}{NAMESPACE_SEPARATOR}{name}", self.namespace)
        }
    }
}

/// Imports named by a `use` statement, group form included. Function and
/// constant imports are ignored.
pub fn parse_use_declaration(text: &str) -> Vec<(String, Option<String>)> {
    let text = text.trim();
    let body = match text.get(..3) {
        Some(keyword) if keyword.eq_ignore_ascii_case("use") => &text[3..],
        _ => text,
    };
    let body = body.trim().trim_end_matches(';').trim();
    if is_non_type_import(body) {
        return Vec::new();
    }

    match (body.find('{'), body.rfind('}')) {
        (Some(open), Some(close)) if open < close => {
            let prefix = body[..open].trim().trim_end_matches(NAMESPACE_SEPARATOR);
            body[open + 1..close]
                .split(',')
                .filter(|clause| !is_non_type_import(clause.trim()))
                .filter_map(parse_use_clause)
                .map(|(name, alias)| (format!("{prefix}{NAMESPACE_SEPARATOR}{name}"), alias))
                .collect()
        }
        _ => body.split(',').filter_map(parse_use_clause).collect(),
    }
}

fn is_non_type_import(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.starts_with("function ") || lower.starts_with("const ")
}

/// Splits `Foo\Bar as Baz` into the imported name and its optional alias.
pub fn parse_use_clause(text: &str) -> Option<(String, Option<String>)> {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
        .collect();

    let name = tokens.first()?;
    let alias = match tokens.as_slice() {
        [_, keyword, alias, ..] if keyword.eq_ignore_ascii_case("as") => Some(alias.to_string()),
        _ => None,
    };
    Some((name.to_string(), alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_unqualified_uses_namespace() {
        let ctx = NameContext::new("App\\Models");
        assert_eq!(ctx.resolve("User"), "App\\Models\\User");
        assert_eq!(ctx.resolve("Concerns\\HasName"), "App\\Models\\Concerns\\HasName");
    }

    #[test]
    fn test_resolve_fully_qualified() {
        let ctx = NameContext::new("App\\Models");
        assert_eq!(ctx.resolve("\\Countable"), "Countable");
        assert_eq!(ctx.resolve("\\Lib\\Base"), "Lib\\Base");
    }

    #[test]
    fn test_resolve_through_imports() {
        let mut ctx = NameContext::new("App");
        ctx.add_import("Lib\\Contracts\\Handler", None);
        ctx.add_import("Lib\\Support\\Collection", Some("Items"));

        assert_eq!(ctx.resolve("Handler"), "Lib\\Contracts\\Handler");
        assert_eq!(ctx.resolve("handler"), "Lib\\Contracts\\Handler");
        assert_eq!(ctx.resolve("Items"), "Lib\\Support\\Collection");
        assert_eq!(ctx.resolve("Items\\Lazy"), "Lib\\Support\\Collection\\Lazy");
    }

    #[test]
    fn test_resolve_namespace_relative() {
        let ctx = NameContext::new("App");
        assert_eq!(ctx.resolve("namespace\\Sub\\Thing"), "App\\Sub\\Thing");
    }

    #[test]
    fn test_global_namespace() {
        let ctx = NameContext::new("");
        assert_eq!(ctx.qualify_declaration("helpers"), "helpers");
        assert_eq!(ctx.resolve("Base"), "Base");
    }

    #[test]
    fn test_parse_use_declaration_list() {
        let imports = parse_use_declaration("use Lib\\Base, Lib\\Contracts\\Handler as H;");
        assert_eq!(
            imports,
            vec![
                ("Lib\\Base".to_string(), None),
                ("Lib\\Contracts\\Handler".to_string(), Some("H".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_use_declaration_group() {
        let imports = parse_use_declaration("use Lib\\Contracts\\{Handler, Listener as L};");
        assert_eq!(
            imports,
            vec![
                ("Lib\\Contracts\\Handler".to_string(), None),
                ("Lib\\Contracts\\Listener".to_string(), Some("L".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_use_declaration_skips_functions_and_constants() {
        assert!(parse_use_declaration("use function Lib\\helper;").is_empty());
        assert!(parse_use_declaration("use const Lib\\VERSION;").is_empty());
    }

    #[test]
    fn test_parse_use_clause() {
        assert_eq!(
            parse_use_clause("Lib\\Base"),
            Some(("Lib\\Base".to_string(), None))
        );
        assert_eq!(
            parse_use_clause("Lib\\Base AS Parent"),
            Some(("Lib\\Base".to_string(), Some("Parent".to_string())))
        );
        assert_eq!(parse_use_clause("  "), None);
    }
}
