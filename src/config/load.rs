use super::tree::{deep_merge, ConfigTree};
use anyhow::{anyhow, bail, Context};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of the configuration tree consumed at kernel construction.
pub trait ConfigLoader {
    /// Produce the configuration tree for the current environment.
    fn load(&self) -> anyhow::Result<ConfigTree>;
}

/// Configuration file on disk, sectioned by environment.
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    path: PathBuf,
    environment: String,
}

impl FileConfigLoader {
    pub fn new<P: Into<PathBuf>>(path: P, environment: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            environment: environment.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(&self) -> anyhow::Result<ConfigTree> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading config file {}", self.path.display()))?;
        let root = parse_tree(&self.path, &content)?;
        let tree = select_environment(root, &self.environment)?;
        debug!(
            path = %self.path.display(),
            environment = %self.environment,
            keys = tree.len(),
            "Configuration loaded"
        );
        Ok(tree)
    }
}

/// Already-built configuration, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(pub ConfigTree);

impl ConfigLoader for StaticConfig {
    fn load(&self) -> anyhow::Result<ConfigTree> {
        Ok(self.0.clone())
    }
}

fn parse_tree(path: &Path, content: &str) -> anyhow::Result<ConfigTree> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let value: Value = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(content)?,
        "json" => serde_json::from_str(content)?,
        "toml" => toml::from_str(content)?,
        other => bail!("unsupported config format '{other}' for {}", path.display()),
    };
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ConfigTree::new()),
        _ => bail!("config root of {} must be a mapping", path.display()),
    }
}

/// Pick the environment section (resolving `extends`) or keep the whole tree.
fn select_environment(root: ConfigTree, environment: &str) -> anyhow::Result<ConfigTree> {
    if !matches!(root.get(environment), Some(Value::Object(_))) {
        return Ok(root);
    }
    let mut visited = HashSet::new();
    resolve_section(&root, environment, &mut visited)
}

fn resolve_section(
    root: &ConfigTree,
    name: &str,
    visited: &mut HashSet<String>,
) -> anyhow::Result<ConfigTree> {
    if !visited.insert(name.to_string()) {
        bail!("circular 'extends' chain through section '{name}'");
    }
    let mut section = root
        .get(name)
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| anyhow!("config section '{name}' not found"))?;

    match section.remove("extends") {
        Some(Value::String(parent)) => {
            let mut base = resolve_section(root, &parent, visited)?;
            deep_merge(&mut base, section);
            Ok(base)
        }
        Some(_) => bail!("'extends' in section '{name}' must be a section name"),
        None => Ok(section),
    }
}
