//! # Loader Module
//!
//! Resolves controller and bootstrap identifiers to code units and the classes
//! they define.
//!
//! ## Model
//!
//! Code is compiled in, so "loading a file" does not evaluate anything. Instead a
//! [`ClassRegistry`] records, for every code unit path, which classes it defines
//! and the factory for each. A discovery step outside the kernel (typically a
//! generated `register_all` function) fills the registry at startup. Loading a
//! unit marks its classes as defined, and loading it again is a no-op.
//!
//! The file itself must still exist and be readable on disk. That keeps
//! deployment errors (missing or unreadable controller files) visible as 404/500
//! outcomes.
//!
//! ## Controller resolution
//!
//! 1. identifier from the request (must look like a class name)
//! 2. path = `resolver.join_path(controller_directory, identifier)`
//! 3. missing file: `NotFound` (404)
//! 4. unreadable file: `Load` (500)
//! 5. load the unit (idempotent)
//! 6. class not defined afterwards: `InvalidController` (404)

mod controller;
mod registry;
mod resolver;

pub use controller::{is_valid_identifier, load_controller};
pub use registry::ClassRegistry;
pub use resolver::{FsResolver, PathResolver};
