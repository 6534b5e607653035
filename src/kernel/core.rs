use super::bootstrap::{Bootstrap, BootstrapRegistry};
use crate::adapter::{AdapterSettings, DataAdapter};
use crate::binder::bind_options;
use crate::config::{ConfigLoader, ConfigTree, FileConfigLoader};
use crate::controller::ControllerRegistry;
use crate::dispatcher::{ExceptionPolicy, LogSink};
use crate::error::{KernelError, Result};
use crate::loader::{FsResolver, PathResolver};
use crate::server::Request;
use crate::view::{MemoryPageCache, PageCache, View};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Page lifetime used when `cache.lifetime` is absent.
pub const DEFAULT_CACHE_LIFETIME: Duration = Duration::from_secs(3600);

/// The application kernel: configuration, wiring and dispatch of one request.
pub struct Kernel {
    pub(crate) environment: String,
    pub(crate) application_path: PathBuf,
    pub(crate) star_path: Option<PathBuf>,

    pub(crate) request: Request,
    pub(crate) view: Arc<View>,
    pub(crate) view_options: ConfigTree,

    pub(crate) page_cache: Arc<dyn PageCache>,
    pub(crate) cache_lifetime: Option<Duration>,

    pub(crate) bootstrap: Option<Box<dyn Bootstrap>>,
    pub(crate) controller_directory: Option<PathBuf>,
    pub(crate) process_settings: BTreeMap<String, String>,
    pub(crate) include_paths: Vec<PathBuf>,

    pub(crate) resolver: Box<dyn PathResolver>,
    pub(crate) controllers: ControllerRegistry,
    pub(crate) bootstraps: BootstrapRegistry,
    pub(crate) adapter: Box<dyn DataAdapter>,
    pub(crate) exceptions: ExceptionPolicy,
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("environment", &self.environment)
            .field("application_path", &self.application_path)
            .field("star_path", &self.star_path)
            .field("request", &self.request)
            .field("view", &self.view)
            .field("cache_lifetime", &self.cache_lifetime)
            .field("bootstrap_configured", &self.bootstrap.is_some())
            .field("controller_directory", &self.controller_directory)
            .field("display_exceptions", &self.exceptions.display_exceptions())
            .finish()
    }
}

/// Collects the kernel's collaborators before configuration is bound.
pub struct KernelBuilder {
    environment: String,
    application_path: PathBuf,
    config_file: PathBuf,
    config_loader: Option<Box<dyn ConfigLoader>>,
    star_path: Option<PathBuf>,
    resolver: Option<Box<dyn PathResolver>>,
    controllers: ControllerRegistry,
    bootstraps: BootstrapRegistry,
    adapter: Option<Box<dyn DataAdapter>>,
    log_sink: Option<Box<dyn LogSink>>,
    page_cache: Option<Arc<dyn PageCache>>,
    request: Option<Request>,
    on_server_error: Option<Box<dyn Fn(&KernelError)>>,
}

impl KernelBuilder {
    /// Replace the file loader, e.g. with [`crate::config::StaticConfig`].
    #[must_use]
    pub fn config_loader(mut self, loader: Box<dyn ConfigLoader>) -> Self {
        self.config_loader = Some(loader);
        self
    }

    /// Framework root, if the host keeps one.
    #[must_use]
    pub fn star_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.star_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn resolver(mut self, resolver: Box<dyn PathResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[must_use]
    pub fn controllers(mut self, controllers: ControllerRegistry) -> Self {
        self.controllers = controllers;
        self
    }

    #[must_use]
    pub fn bootstraps(mut self, bootstraps: BootstrapRegistry) -> Self {
        self.bootstraps = bootstraps;
        self
    }

    #[must_use]
    pub fn adapter(mut self, adapter: Box<dyn DataAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    #[must_use]
    pub fn log_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Backend used once `cache.is_cache` activates page caching.
    #[must_use]
    pub fn page_cache(mut self, cache: Arc<dyn PageCache>) -> Self {
        self.page_cache = Some(cache);
        self
    }

    #[must_use]
    pub fn request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    /// Hook run for every status-500 failure after it was handled.
    #[must_use]
    pub fn on_server_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&KernelError) + 'static,
    {
        self.on_server_error = Some(Box::new(hook));
        self
    }

    /// Load the configuration tree and bind it onto a new kernel.
    ///
    /// # Errors
    ///
    /// - [`KernelError::ConfigLoad`] if the loader fails
    /// - [`KernelError::Config`] / [`KernelError::BootstrapNotFound`] from the
    ///   `bootstrap` block
    pub fn build(self) -> Result<Kernel> {
        let loader: Box<dyn ConfigLoader> = match self.config_loader {
            Some(loader) => loader,
            None => Box::new(FileConfigLoader::new(
                self.config_file.clone(),
                self.environment.clone(),
            )),
        };
        let options = loader.load().map_err(KernelError::ConfigLoad)?;

        let mut exceptions = match self.log_sink {
            Some(sink) => ExceptionPolicy::new(sink),
            None => ExceptionPolicy::default(),
        };
        if let Some(hook) = self.on_server_error {
            exceptions.on_server_error(hook);
        }

        let application_path = self.application_path;
        let resolver = self
            .resolver
            .unwrap_or_else(|| Box::new(FsResolver::new(application_path.clone())));
        let view = Arc::new(View::new(&application_path, &ConfigTree::new()));

        let mut kernel = Kernel {
            environment: self.environment,
            star_path: self.star_path,
            request: self.request.unwrap_or_default(),
            view,
            view_options: ConfigTree::new(),
            page_cache: self
                .page_cache
                .unwrap_or_else(|| Arc::new(MemoryPageCache::new())),
            cache_lifetime: None,
            bootstrap: None,
            controller_directory: None,
            process_settings: BTreeMap::new(),
            include_paths: Vec::new(),
            resolver,
            controllers: self.controllers,
            bootstraps: self.bootstraps,
            adapter: self
                .adapter
                .unwrap_or_else(|| Box::new(AdapterSettings::new())),
            exceptions,
            application_path,
        };

        let applied = bind_options(&mut kernel, &options)?;
        info!(
            environment = %kernel.environment,
            application_path = %kernel.application_path.display(),
            options_applied = applied,
            display_exceptions = kernel.exceptions.display_exceptions(),
            page_cache = kernel.cache_lifetime.is_some(),
            "Kernel configured"
        );
        Ok(kernel)
    }
}

impl Kernel {
    /// Start building a kernel for `environment`, rooted at `application_path`,
    /// configured from `config_file`.
    pub fn builder<P, C>(environment: &str, application_path: P, config_file: C) -> KernelBuilder
    where
        P: Into<PathBuf>,
        C: Into<PathBuf>,
    {
        KernelBuilder {
            environment: environment.to_string(),
            application_path: application_path.into(),
            config_file: config_file.into(),
            config_loader: None,
            star_path: None,
            resolver: None,
            controllers: ControllerRegistry::new(),
            bootstraps: BootstrapRegistry::new(),
            adapter: None,
            log_sink: None,
            page_cache: None,
            request: None,
            on_server_error: None,
        }
    }

    /// Build with default collaborators.
    ///
    /// # Errors
    ///
    /// See [`KernelBuilder::build`].
    pub fn new<P, C>(environment: &str, application_path: P, config_file: C) -> Result<Self>
    where
        P: Into<PathBuf>,
        C: Into<PathBuf>,
    {
        Self::builder(environment, application_path, config_file).build()
    }

    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }

    #[must_use]
    pub fn application_path(&self) -> &Path {
        &self.application_path
    }

    #[must_use]
    pub fn star_path(&self) -> Option<&Path> {
        self.star_path.as_deref()
    }

    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// Replace the request. An already resolved controller directory is kept.
    pub fn set_request(&mut self, request: Request) {
        self.request = request;
    }

    #[must_use]
    pub fn view(&self) -> &Arc<View> {
        &self.view
    }

    #[must_use]
    pub fn page_cache(&self) -> &Arc<dyn PageCache> {
        &self.page_cache
    }

    /// Lifetime of cached pages, `None` while page caching is off.
    #[must_use]
    pub fn cache_lifetime(&self) -> Option<Duration> {
        self.cache_lifetime
    }

    #[must_use]
    pub fn display_exceptions(&self) -> bool {
        self.exceptions.display_exceptions()
    }

    #[must_use]
    pub fn exception_policy(&self) -> &ExceptionPolicy {
        &self.exceptions
    }

    pub fn exception_policy_mut(&mut self) -> &mut ExceptionPolicy {
        &mut self.exceptions
    }

    #[must_use]
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.controllers
    }

    #[must_use]
    pub fn bootstraps(&self) -> &BootstrapRegistry {
        &self.bootstraps
    }

    pub fn bootstraps_mut(&mut self) -> &mut BootstrapRegistry {
        &mut self.bootstraps
    }

    /// Recorded process settings, dotted keys.
    #[must_use]
    pub fn process_settings(&self) -> &BTreeMap<String, String> {
        &self.process_settings
    }

    #[must_use]
    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    /// Override the directory controllers are resolved in.
    pub fn set_controller_directory<P: Into<PathBuf>>(&mut self, directory: P) {
        let directory = directory.into();
        debug!(directory = %directory.display(), "Controller directory set");
        self.controller_directory = Some(directory);
    }

    /// Directory controllers are resolved in.
    ///
    /// Without an override it is computed from the resolver's module directory
    /// for the request's controller key, once, and kept.
    pub fn controller_directory(&mut self) -> PathBuf {
        if let Some(directory) = &self.controller_directory {
            return directory.clone();
        }
        let directory = self
            .resolver
            .default_module_directory(self.request.controller_key());
        debug!(
            directory = %directory.display(),
            controller_key = %self.request.controller_key(),
            "Controller directory resolved"
        );
        self.controller_directory = Some(directory.clone());
        directory
    }

    /// One-line wiring summary, as printed by `starfront check`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "environment={} application_path={} controller_directory={} encoding={} display_exceptions={} page_cache={} process_settings={} include_paths={}",
            self.environment,
            self.application_path.display(),
            self.controller_directory
                .as_deref()
                .map_or_else(|| "<default>".to_string(), |d| d.display().to_string()),
            self.view.encoding(),
            self.exceptions.display_exceptions(),
            self.cache_lifetime
                .map_or_else(|| "off".to_string(), |l| format!("{}s", l.as_secs())),
            self.process_settings.len(),
            self.include_paths.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ConfigTree {
        value.as_object().cloned().unwrap()
    }

    fn kernel_with(options: serde_json::Value) -> Kernel {
        Kernel::builder("testing", "/app", "/app/config.yaml")
            .config_loader(Box::new(StaticConfig(tree(options))))
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_configuration_keeps_defaults() {
        let kernel = kernel_with(json!({}));
        assert_eq!(kernel.environment(), "testing");
        assert_eq!(kernel.view().encoding(), "UTF-8");
        assert!(!kernel.display_exceptions());
        assert!(kernel.cache_lifetime().is_none());
        assert!(kernel.star_path().is_none());
    }

    #[test]
    fn test_controller_directory_defaults_from_resolver_once() {
        let mut kernel = kernel_with(json!({}));
        assert_eq!(
            kernel.controller_directory(),
            PathBuf::from("/app/controllers")
        );
        kernel.request_mut().set_controller_key("model");
        assert_eq!(
            kernel.controller_directory(),
            PathBuf::from("/app/controllers")
        );
    }

    #[test]
    fn test_replaced_request_keeps_resolved_directory() {
        let mut kernel = kernel_with(json!({}));
        let before = kernel.controller_directory();
        kernel.set_request(Request::from_query("controller=news"));
        assert_eq!(kernel.request().controller(), "News");
        assert_eq!(kernel.controller_directory(), before);
    }

    #[test]
    fn test_missing_config_file_is_config_load_error() {
        let err = Kernel::new("testing", "/nonexistent", "/nonexistent/config.yaml").unwrap_err();
        assert_eq!(err.kind(), "config_load");
    }

    #[test]
    fn test_summary_mentions_wiring() {
        let kernel = kernel_with(json!({"controllerDirectory": "/srv/ctl"}));
        let summary = kernel.summary();
        assert!(summary.contains("controller_directory=/srv/ctl"));
        assert!(summary.contains("page_cache=off"));
    }
}
