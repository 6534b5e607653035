//! Data-adapter seam.
//!
//! The persistence layer lives outside the kernel. The kernel only forwards the
//! `resources` block when it names an adapter and calls [`DataAdapter::close`]
//! after every successful action so adapter-held resources (connections) are
//! released before any layout work.

use crate::config::ConfigTree;
use tracing::debug;

/// Configuration key under `resources` that activates the data adapter.
pub const ADAPTER_KEY: &str = "adapter";

/// Entry points of the data-adapter layer the kernel drives.
pub trait DataAdapter {
    /// Receives the whole `resources` block; extracts what it needs.
    fn settings(&mut self, resources: &ConfigTree);
    /// Release adapter-held resources.
    fn close(&mut self);
}

/// Default adapter: keeps the last settings block and counts closes.
#[derive(Debug, Default, Clone)]
pub struct AdapterSettings {
    settings: Option<ConfigTree>,
    closes: usize,
}

impl AdapterSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn settings(&self) -> Option<&ConfigTree> {
        self.settings.as_ref()
    }

    #[must_use]
    pub fn close_count(&self) -> usize {
        self.closes
    }
}

impl DataAdapter for AdapterSettings {
    fn settings(&mut self, resources: &ConfigTree) {
        debug!(
            adapter = ?resources.get(ADAPTER_KEY),
            "Data adapter configured"
        );
        self.settings = Some(resources.clone());
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}
