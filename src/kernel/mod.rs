//! # Kernel Module
//!
//! The application kernel owns everything one request needs: the [`Request`],
//! the shared [`View`], the controller and bootstrap registries, the data
//! adapter and the exception policy.
//!
//! ## Construction
//!
//! [`Kernel::builder`] collects the collaborators, then [`KernelBuilder::build`]
//! loads the configuration tree and binds it through the kernel's setter table:
//!
//! | Key | Effect |
//! |-----|--------|
//! | `includePaths` | existing directories recorded as include paths |
//! | `processSettings` / `phpSettings` | scalar leaves recorded as process settings |
//! | `controllerKey`, `actionKey` | request lookup keys |
//! | `defaultControllerName`, `defaultActionName` | request defaults |
//! | `frontController` | controller directory, `display_exceptions`, 404 location |
//! | `controllerDirectory` | controller directory override |
//! | `view` | view options |
//! | `resources` | front controller, view and data adapter, in that order |
//! | `cache` | page cache activation |
//! | `bootstrap` | bootstrap unit and class |
//!
//! A default view exists before binding starts, so the kernel always has one.
//!
//! [`Request`]: crate::server::Request
//! [`View`]: crate::view::View

mod bootstrap;
mod core;
mod resources;

pub use bootstrap::{
    bootstrap_factory, Bootstrap, BootstrapFactory, BootstrapRegistry, HookBootstrap, InitHook,
    DEFAULT_BOOTSTRAP_CLASS,
};
pub use core::{Kernel, KernelBuilder, DEFAULT_CACHE_LIFETIME};
