use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// File-resolution strategy used by the loader.
pub trait PathResolver {
    /// Path of the code unit defining `name` inside `dir`.
    fn join_path(&self, dir: &Path, name: &str) -> PathBuf;
    fn exists(&self, path: &Path) -> bool;
    fn is_readable(&self, path: &Path) -> bool;
    /// Conventional directory for the module type selected by a request key.
    fn default_module_directory(&self, controller_key: &str) -> PathBuf;
}

/// [`PathResolver`] backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct FsResolver {
    application_path: PathBuf,
    extension: String,
    load_types: HashMap<String, String>,
}

impl FsResolver {
    /// Resolver rooted at `application_path`, unit files ending in `.rs`.
    pub fn new<P: Into<PathBuf>>(application_path: P) -> Self {
        let load_types = [
            ("controller", "controllers"),
            ("model", "models"),
            ("service", "services"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        FsResolver {
            application_path: application_path.into(),
            extension: "rs".to_string(),
            load_types,
        }
    }

    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Map a request key to a module directory name under the application path.
    #[must_use]
    pub fn with_load_type(mut self, key: &str, directory: &str) -> Self {
        self.load_types.insert(key.to_string(), directory.to_string());
        self
    }

    #[must_use]
    pub fn application_path(&self) -> &Path {
        &self.application_path
    }
}

impl PathResolver for FsResolver {
    fn join_path(&self, dir: &Path, name: &str) -> PathBuf {
        if self.extension.is_empty() {
            dir.join(name)
        } else {
            dir.join(format!("{}.{}", name, self.extension))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_readable(&self, path: &Path) -> bool {
        path.is_file() && File::open(path).is_ok()
    }

    fn default_module_directory(&self, controller_key: &str) -> PathBuf {
        let dir = self
            .load_types
            .get(controller_key)
            .map(String::as_str)
            .unwrap_or("controllers");
        self.application_path.join(dir)
    }
}
