//! # Configuration Module
//!
//! Configuration is a nested key/value tree ([`ConfigTree`]) produced once at
//! kernel construction by a [`ConfigLoader`] and read-only afterwards.
//!
//! ## Formats
//!
//! [`FileConfigLoader`] picks the parser from the file extension:
//!
//! - `.yaml` / `.yml` via `serde_yaml`
//! - `.json` via `serde_json`
//! - `.toml` via `toml`
//!
//! ## Environments
//!
//! When the root of the file contains a section named after the application
//! environment, only that section is used. A section may inherit from another one
//! with `extends`:
//!
//! ```yaml
//! production:
//!   resources:
//!     frontController:
//!       controllerDirectory: /srv/app/controllers
//! development:
//!   extends: production
//!   resources:
//!     frontController:
//!       params:
//!         display_exceptions: true
//! ```
//!
//! Files without a matching section are used as a whole.

mod load;
mod tree;

pub use load::{ConfigLoader, FileConfigLoader, StaticConfig};
pub use tree::{as_flag, get_path, is_truthy, scalar_to_string, ConfigTree};
