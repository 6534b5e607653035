//! Error taxonomy for the kernel.
//!
//! Every failure carries an HTTP status code through [`KernelError::status`]. The
//! dispatch pipeline never lets a [`KernelError`] escape; it hands it to the
//! exception policy instead. Construction-time failures (configuration loading,
//! bootstrap configuration) propagate from [`crate::KernelBuilder::build`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the kernel
#[derive(Error, Debug)]
pub enum KernelError {
    /// Invalid or incomplete configuration (e.g. missing bootstrap path)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configuration tree could not be loaded
    #[error("Configuration could not be loaded: {0}")]
    ConfigLoad(#[source] anyhow::Error),

    /// The controller unit resolved for the request does not exist
    #[error("{} not found!", path.display())]
    NotFound { path: PathBuf },

    /// The controller unit exists but cannot be read
    #[error("Cannot load controller class {class} from file {}", path.display())]
    Load { class: String, path: PathBuf },

    /// The unit was loaded but did not define the expected controller
    #[error("Invalid controller class ({class}) from file {}", path.display())]
    InvalidController { class: String, path: PathBuf },

    /// The bootstrap class is unknown even after loading its unit
    #[error("Bootstrap class not found: {class}")]
    BootstrapNotFound { class: String },

    /// Failure raised by controller code with an explicit status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Any other failure raised by controller code
    #[error("Controller failure: {0}")]
    Controller(#[from] anyhow::Error),
}

impl KernelError {
    /// Build a failure carrying an explicit HTTP status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        KernelError::Http {
            status,
            message: message.into(),
        }
    }

    /// Numeric status code the exception policy classifies on.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            KernelError::NotFound { .. } | KernelError::InvalidController { .. } => 404,
            KernelError::Http { status, .. } => *status,
            KernelError::Config(_)
            | KernelError::ConfigLoad(_)
            | KernelError::Load { .. }
            | KernelError::BootstrapNotFound { .. }
            | KernelError::Controller(_) => 500,
        }
    }

    /// Short stable name of the variant, used as a structured log field.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            KernelError::Config(_) => "config",
            KernelError::ConfigLoad(_) => "config_load",
            KernelError::NotFound { .. } => "not_found",
            KernelError::Load { .. } => "load",
            KernelError::InvalidController { .. } => "invalid_controller",
            KernelError::BootstrapNotFound { .. } => "bootstrap_not_found",
            KernelError::Http { .. } => "http",
            KernelError::Controller(_) => "controller",
        }
    }

    /// Full string representation: kind, status, message and the source chain.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let mut out = format!("KernelError[{}] ({}): {}", self.status(), self.kind(), self);
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            out.push_str("\n  caused by: ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
        out
    }
}

/// Result type alias for the kernel
pub type Result<T> = std::result::Result<T, KernelError>;
