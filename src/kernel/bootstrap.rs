use super::core::Kernel;
use crate::config::ConfigTree;
use crate::error::{KernelError, Result};
use crate::loader::ClassRegistry;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info};

/// Class instantiated when no bootstrap was configured.
pub const DEFAULT_BOOTSTRAP_CLASS: &str = "Bootstrap";

/// Application initialisation entry point.
pub trait Bootstrap {
    /// Run all initialisation (`None`) or only the named resource.
    fn bootstrap(&mut self, kernel: &mut Kernel, resource: Option<&str>) -> Result<()>;
}

/// Instantiates a bootstrap class for a kernel.
pub type BootstrapFactory = Box<dyn Fn(&Kernel) -> Result<Box<dyn Bootstrap>>>;

/// Registry of bootstrap classes by code unit.
pub type BootstrapRegistry = ClassRegistry<BootstrapFactory>;

/// Box a typed constructor into a [`BootstrapFactory`].
pub fn bootstrap_factory<B, F>(constructor: F) -> BootstrapFactory
where
    B: Bootstrap + 'static,
    F: Fn(&Kernel) -> Result<B> + 'static,
{
    Box::new(move |kernel| Ok(Box::new(constructor(kernel)?) as Box<dyn Bootstrap>))
}

/// Named initialisation step.
pub type InitHook = fn(&mut Kernel) -> Result<()>;

/// Bootstrap running a static table of init hooks, each at most once.
#[derive(Debug)]
pub struct HookBootstrap {
    hooks: &'static [(&'static str, InitHook)],
    ran: HashSet<&'static str>,
}

impl HookBootstrap {
    #[must_use]
    pub fn new(hooks: &'static [(&'static str, InitHook)]) -> Self {
        HookBootstrap {
            hooks,
            ran: HashSet::new(),
        }
    }

    #[must_use]
    pub fn has_run(&self, name: &str) -> bool {
        self.ran.contains(name)
    }

    fn run_hook(&mut self, name: &'static str, hook: InitHook, kernel: &mut Kernel) -> Result<()> {
        if !self.ran.insert(name) {
            debug!(resource = %name, "Bootstrap resource already initialised");
            return Ok(());
        }
        debug!(resource = %name, "Initialising bootstrap resource");
        hook(kernel)
    }
}

impl Bootstrap for HookBootstrap {
    fn bootstrap(&mut self, kernel: &mut Kernel, resource: Option<&str>) -> Result<()> {
        let hooks = self.hooks;
        match resource {
            None => {
                for (name, hook) in hooks {
                    self.run_hook(*name, *hook, kernel)?;
                }
                Ok(())
            }
            Some(wanted) => {
                let (name, hook) = hooks
                    .iter()
                    .find(|(name, _)| *name == wanted)
                    .ok_or_else(|| {
                        KernelError::Config(format!("Unknown bootstrap resource: {wanted}"))
                    })?;
                self.run_hook(*name, *hook, kernel)
            }
        }
    }
}

impl Kernel {
    /// Apply a `bootstrap` block: `path` (required) names the unit, `class`
    /// (default `Bootstrap`) the class it defines.
    ///
    /// # Errors
    ///
    /// - [`KernelError::Config`] without a non-empty `path`
    /// - [`KernelError::BootstrapNotFound`] if the class is still undefined after
    ///   loading the unit
    pub fn set_bootstrap(&mut self, options: &ConfigTree) -> Result<()> {
        let path = options
            .get("path")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| KernelError::Config("No bootstrap path provided".to_string()))?;
        let class = options
            .get("class")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BOOTSTRAP_CLASS)
            .to_string();

        let path = PathBuf::from(path);
        let path = if path.is_relative() {
            self.application_path.join(path)
        } else {
            path
        };

        if !self.bootstraps.is_defined(&class) {
            self.bootstraps.load_unit(&path);
        }

        let instance = {
            let factory = self
                .bootstraps
                .factory(&class)
                .ok_or_else(|| KernelError::BootstrapNotFound {
                    class: class.clone(),
                })?;
            factory(self)?
        };
        info!(class = %class, unit = %path.display(), "Bootstrap configured");
        self.bootstrap = Some(instance);
        Ok(())
    }

    /// The bootstrap instance, constructing the default class on first access.
    ///
    /// # Errors
    ///
    /// [`KernelError::BootstrapNotFound`] if no bootstrap was configured and the
    /// default class is unknown.
    pub fn bootstrap_instance(&mut self) -> Result<&mut (dyn Bootstrap + 'static)> {
        let instance = match self.bootstrap.take() {
            Some(instance) => instance,
            None => self.default_bootstrap()?,
        };
        Ok(self.bootstrap.insert(instance).as_mut())
    }

    /// Run the bootstrap: every resource for `None`, one for `Some(name)`.
    ///
    /// The instance is detached from the kernel while it runs.
    ///
    /// # Errors
    ///
    /// Whatever the bootstrap or its construction fails with.
    pub fn bootstrap(&mut self, resource: Option<&str>) -> Result<&mut Self> {
        let mut instance = match self.bootstrap.take() {
            Some(instance) => instance,
            None => self.default_bootstrap()?,
        };
        debug!(resource = ?resource, "Running bootstrap");
        let outcome = instance.bootstrap(self, resource);
        if self.bootstrap.is_none() {
            self.bootstrap = Some(instance);
        }
        outcome?;
        Ok(self)
    }

    fn default_bootstrap(&mut self) -> Result<Box<dyn Bootstrap>> {
        if !self.bootstraps.is_defined(DEFAULT_BOOTSTRAP_CLASS) {
            if let Some(unit) = self
                .bootstraps
                .unit_of(DEFAULT_BOOTSTRAP_CLASS)
                .map(|p| p.to_path_buf())
            {
                self.bootstraps.load_unit(&unit);
            }
        }
        let factory = self
            .bootstraps
            .factory(DEFAULT_BOOTSTRAP_CLASS)
            .ok_or_else(|| KernelError::BootstrapNotFound {
                class: DEFAULT_BOOTSTRAP_CLASS.to_string(),
            })?;
        let instance = factory(self)?;
        debug!(class = DEFAULT_BOOTSTRAP_CLASS, "Default bootstrap constructed");
        Ok(instance)
    }
}
