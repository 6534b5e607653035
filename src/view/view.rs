use super::cache::PageCache;
use crate::config::{get_path, ConfigTree};
use crate::error::{KernelError, Result};
use minijinja::Environment;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

const DEFAULT_ENCODING: &str = "UTF-8";

#[derive(Debug, Default)]
struct PageState {
    key: String,
    cacheable: bool,
}

/// Rendering configuration shared by the controller and the layout.
pub struct View {
    encoding: String,
    script_path: PathBuf,
    cache: Option<(Arc<dyn PageCache>, Duration)>,
    page: RwLock<PageState>,
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("encoding", &self.encoding)
            .field("script_path", &self.script_path)
            .field("cache_enabled", &self.cache.is_some())
            .finish()
    }
}

impl View {
    /// Build a view from its options block; missing or malformed options fall
    /// back to defaults.
    pub fn new(application_path: &Path, options: &ConfigTree) -> Self {
        let encoding = get_path(options, &["encoding"])
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ENCODING)
            .to_string();
        let script_path = get_path(options, &["scriptPath"])
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|p| application_path.join(p))
            .unwrap_or_else(|| application_path.join("views"));

        View {
            encoding,
            script_path,
            cache: None,
            page: RwLock::new(PageState::default()),
        }
    }

    /// Attach a page cache; bodies handed to [`View::save_cache`] are stored for `lifetime`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn PageCache>, lifetime: Duration) -> Self {
        self.cache = Some((cache, lifetime));
        self
    }

    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    #[must_use]
    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Start a new page: set the key its body is cached under and make it cacheable.
    pub fn begin_page(&self, key: &str) {
        if let Ok(mut page) = self.page.write() {
            page.key = key.to_string();
            page.cacheable = true;
        }
    }

    /// Opt the current page out of caching.
    pub fn disable_page_cache(&self) {
        if let Ok(mut page) = self.page.write() {
            page.cacheable = false;
        }
    }

    #[must_use]
    pub fn page_key(&self) -> String {
        self.page.read().map(|p| p.key.clone()).unwrap_or_default()
    }

    /// Cache-save hook. Returns whether the body was stored.
    pub fn save_cache(&self, body: &[u8]) -> bool {
        let Some((cache, lifetime)) = &self.cache else {
            return false;
        };
        let Ok(page) = self.page.read() else {
            return false;
        };
        if !page.cacheable || page.key.is_empty() {
            return false;
        }
        cache.store(&page.key, body, *lifetime);
        debug!(
            page_key = %page.key,
            bytes = body.len(),
            lifetime_secs = lifetime.as_secs(),
            "Page cached"
        );
        true
    }

    /// Render a template file relative to the script path.
    ///
    /// # Errors
    ///
    /// Fails if the name escapes the script path, the file cannot be read or the
    /// template does not render.
    pub fn render<S: Serialize>(&self, template: &str, ctx: S) -> Result<String> {
        let path = self.template_path(template).ok_or_else(|| {
            KernelError::Controller(anyhow::anyhow!("invalid template name '{template}'"))
        })?;
        let source = std::fs::read_to_string(&path).map_err(|e| {
            KernelError::Controller(
                anyhow::Error::new(e).context(format!("reading template {}", path.display())),
            )
        })?;
        self.render_source(&source, ctx)
    }

    /// Render template source directly.
    ///
    /// # Errors
    ///
    /// Fails if the template does not compile or render.
    pub fn render_source<S: Serialize>(&self, source: &str, ctx: S) -> Result<String> {
        let env = Environment::new();
        env.render_str(source, ctx)
            .map_err(|e| KernelError::Controller(anyhow::Error::new(e)))
    }

    fn template_path(&self, template: &str) -> Option<PathBuf> {
        let mut pb = self.script_path.clone();
        for comp in Path::new(template.trim_start_matches('/')).components() {
            match comp {
                Component::Normal(s) => pb.push(s),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(pb)
    }
}
