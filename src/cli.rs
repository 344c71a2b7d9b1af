use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::config::{parse_mapping, Config};
use crate::discovery::{ClassFinder, MethodScope, WalkDirEnumerator};
use crate::namespace::NamespaceRegistry;
use crate::output::OutputFormatter;
use crate::reflection::SourceIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Parser, Debug, Default)]
#[command(name = "class-finder")]
#[command(about = "Class finder - discover PHP types below source directories", long_about = None)]
pub struct Args {
    /// Directory to scan. Can be specified multiple times.
    #[arg(long, value_name = "DIR")]
    pub path: Vec<PathBuf>,

    /// Map a base directory to a root namespace (e.g. src=App).
    #[arg(short, long, value_name = "DIR=NAMESPACE", value_parser = parse_mapping)]
    pub namespace: Vec<(PathBuf, String)>,

    /// Directory indexed for parent types but never reported (e.g. vendor).
    #[arg(long, value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Only scan files directly inside each directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Keep subtypes of any of these types
    #[arg(long, value_name = "TYPE")]
    pub subclass_of: Vec<String>,

    /// Keep types directly implementing any of these interfaces
    #[arg(long, value_name = "INTERFACE")]
    pub implements: Vec<String>,

    /// Keep types directly using any of these traits
    #[arg(long, value_name = "TRAIT")]
    pub uses: Vec<String>,

    /// Keep types exposing any of these methods
    #[arg(long, value_name = "METHOD")]
    pub has_method: Vec<String>,

    /// Static-ness required of --has-method matches
    #[arg(long, default_value = "any")]
    pub method_scope: MethodScope,

    /// Kind of type: class, interface, trait or enum
    #[arg(short = 't', long = "type", value_name = "KIND")]
    pub kind: Option<String>,

    /// Keep only abstract types
    #[arg(long = "abstract", conflicts_with = "concrete")]
    pub is_abstract: bool,

    /// Keep only non-abstract types
    #[arg(long)]
    pub concrete: bool,

    /// Keep only final types
    #[arg(long = "final", conflicts_with = "non_final")]
    pub is_final: bool,

    /// Keep only non-final types
    #[arg(long)]
    pub non_final: bool,

    /// Config file (YAML or JSON). Defaults to ./class-finder.yaml if present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'O', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output format (plain, json)
    #[arg(short = 'f', long, default_value = "plain")]
    pub format: OutputFormat,

    /// Include the namespace mappings in effect after discovery (json only)
    #[arg(long)]
    pub show_namespaces: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        for path in self.path.iter().chain(&self.include) {
            validate_dir(path)?;
        }
        if let Some(ref config) = self.config {
            if !config.is_file() {
                anyhow::bail!("Config file does not exist: {}", config.display());
            }
        }
        Ok(())
    }

    pub fn abstract_filter(&self) -> Option<bool> {
        flag_pair(self.is_abstract, self.concrete)
    }

    pub fn final_filter(&self) -> Option<bool> {
        flag_pair(self.is_final, self.non_final)
    }

    pub fn load_config(&self) -> Result<Config> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => Config::find_default(Path::new(".")),
        };
        match path {
            Some(path) => Config::load(&path)
                .with_context(|| format!("Failed to load config: {}", path.display())),
            None => Ok(Config::default()),
        }
    }
}

fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

pub fn validate_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }
    if !path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", path.display());
    }
    std::fs::read_dir(path)
        .with_context(|| format!("Cannot read directory: {}", path.display()))?;
    Ok(())
}

/// Runs one discovery and returns the rendered output.
pub fn run(args: &Args, config: Config) -> Result<String> {
    let registry = Arc::new(NamespaceRegistry::new());
    config.bootstrap(&registry);
    registry.bootstrap(args.namespace.iter().map(|(dir, ns)| (dir, ns)));

    let search_paths: Vec<PathBuf> = config.paths.iter().chain(&args.path).cloned().collect();
    if search_paths.is_empty() {
        anyhow::bail!("No directories to scan. Pass --path or set `paths` in the config file");
    }

    let index_roots: Vec<PathBuf> = search_paths
        .iter()
        .chain(&config.include)
        .chain(&args.include)
        .filter(|p| p.is_dir())
        .cloned()
        .collect();
    debug!(roots = index_roots.len(), "indexing source roots");
    let index = SourceIndex::build(&index_roots, &WalkDirEnumerator::new())
        .context("Failed to index source files")?;

    let mut finder = ClassFinder::new(Arc::clone(&registry), Arc::new(index));
    finder
        .in_paths(search_paths, None)
        .recursive(!args.no_recursive && config.recursive.unwrap_or(true));
    apply_filters(&mut finder, args);

    let types = finder.discover().context("Discovery failed")?;
    let namespaces = if args.show_namespaces {
        registry.list_all()
    } else {
        Vec::new()
    };

    OutputFormatter::format(&types, namespaces, args.format)
}

fn apply_filters(finder: &mut ClassFinder, args: &Args) {
    if !args.subclass_of.is_empty() {
        finder.subclass_of(args.subclass_of.iter().cloned());
    }
    if !args.implements.is_empty() {
        finder.implements(args.implements.iter().cloned());
    }
    if !args.uses.is_empty() {
        finder.uses(args.uses.iter().cloned());
    }
    if !args.has_method.is_empty() {
        finder.has_method(args.has_method.iter().cloned(), args.method_scope);
    }
    if let Some(kind) = &args.kind {
        finder.is_type(kind);
    }
    if let Some(is_abstract) = args.abstract_filter() {
        finder.is_abstract(is_abstract);
    }
    if let Some(is_final) = args.final_filter() {
        finder.is_final(is_final);
    }
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Plain => "plain",
            OutputFormat::Json => "json",
        }
    }
}
