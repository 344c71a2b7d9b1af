use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;
use crate::namespace::NamespaceRegistry;

pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["class-finder.yaml", "class-finder.yml", "class-finder.json"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base directory -> root namespace, registered at startup.
    pub namespaces: IndexMap<PathBuf, String>,
    /// Directories to scan.
    pub paths: Vec<PathBuf>,
    /// Directories indexed for ancestor lookups but never reported.
    pub include: Vec<PathBuf>,
    pub recursive: Option<bool>,
}

impl Config {
    /// Reads a YAML or JSON config. Relative paths are taken relative to the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::read_error(path, e.to_string()))?;

        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        let config: Config = match format.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
            other => return Err(ConfigError::unsupported_format(other)),
        };

        let base = path.parent().unwrap_or(Path::new("."));
        debug!(config = %path.display(), "loaded config");
        Ok(config.relative_to(base))
    }

    /// First default config file present in `dir`, if any.
    pub fn find_default(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    pub fn relative_to(self, base: &Path) -> Self {
        let anchor = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        Self {
            namespaces: self
                .namespaces
                .into_iter()
                .map(|(path, ns)| (anchor(path), ns))
                .collect(),
            paths: self.paths.into_iter().map(anchor).collect(),
            include: self.include.into_iter().map(anchor).collect(),
            recursive: self.recursive,
        }
    }

    /// Registers every configured namespace mapping.
    pub fn bootstrap(&self, registry: &NamespaceRegistry) {
        registry.bootstrap(self.namespaces.iter());
    }
}

/// Parses a `DIR=NAMESPACE` command-line mapping.
pub fn parse_mapping(value: &str) -> Result<(PathBuf, String), ConfigError> {
    match value.split_once('=') {
        Some((dir, namespace)) if !dir.trim().is_empty() => {
            Ok((PathBuf::from(dir.trim()), namespace.trim().to_string()))
        }
        _ => Err(ConfigError::invalid_mapping(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_load_yaml_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("class-finder.yaml");
        fs::write(
            &path,
            "namespaces:\n  src: App\n  /opt/lib: Lib\npaths: [src]\nrecursive: false\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let namespaces: Vec<(PathBuf, String)> = config.namespaces.into_iter().collect();
        assert_eq!(
            namespaces,
            vec![
                (temp_dir.path().join("src"), "App".to_string()),
                (PathBuf::from("/opt/lib"), "Lib".to_string()),
            ]
        );
        assert_eq!(config.paths, vec![temp_dir.path().join("src")]);
        assert!(config.include.is_empty());
        assert_eq!(config.recursive, Some(false));
    }

    #[test]
    fn test_load_json_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("class-finder.json");
        fs::write(&path, r#"{ "paths": ["app"], "include": ["vendor"] }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.paths, vec![temp_dir.path().join("app")]);
        assert_eq!(config.include, vec![temp_dir.path().join("vendor")]);
        assert_eq!(config.recursive, None);
    }

    #[test]
    fn test_load_rejects_unknown_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("class-finder.toml");
        fs::write(&path, "paths = []").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("class-finder.yaml");
        fs::write(&path, "namespace: App\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_find_default() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(Config::find_default(temp_dir.path()), None);

        fs::write(temp_dir.path().join("class-finder.yml"), "paths: []\n").unwrap();
        assert_eq!(
            Config::find_default(temp_dir.path()),
            Some(temp_dir.path().join("class-finder.yml"))
        );
    }

    #[test]
    fn test_bootstrap_registers_namespaces() {
        let mut config = Config::default();
        config.namespaces.insert(PathBuf::from("/app/src"), "App".to_string());

        let registry = NamespaceRegistry::new();
        config.bootstrap(&registry);

        let hit = registry.resolve(Path::new("/app/src/User.php")).unwrap();
        assert_eq!(hit.namespace, "App\\");
    }

    #[test]
    fn test_parse_mapping() {
        assert_eq!(
            parse_mapping("src=App\\Models").unwrap(),
            (PathBuf::from("src"), "App\\Models".to_string())
        );
        assert!(parse_mapping("src").is_err());
        assert!(parse_mapping("=App").is_err());
    }
}
