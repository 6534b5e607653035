//! # starfront
//!
//! **starfront** is a front-controller kernel: it turns a configuration tree into
//! a wired application, resolves the request's controller from its code unit,
//! runs the action into an output buffer, wraps the result in a layout and
//! caches it, and maps every failure to an HTTP outcome.
//!
//! ## Architecture
//!
//! - **[`config`]** - Configuration tree loading (YAML, JSON, TOML) with environment sections
//! - **[`binder`]** - Static setter tables applying configuration onto typed targets
//! - **[`kernel`]** - The application kernel: resource wiring and the bootstrap runner
//! - **[`loader`]** - Controller resolution through a path resolver and a class registry
//! - **[`controller`]** - Controller trait, action tables and the built-in echo controller
//! - **[`dispatcher`]** - Dispatch pipeline and exception policy
//! - **[`view`]** - View, layout and page cache
//! - **[`server`]** - Request, output buffer and response helpers (CGI output)
//! - **[`adapter`]** - Data-adapter seam
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant Kernel
//!     participant Loader as loader::load_controller
//!     participant Controller
//!     participant Layout
//!     participant View
//!     participant Policy as ExceptionPolicy
//!
//!     Host->>Kernel: builder(env, app, config).build()
//!     Kernel->>Kernel: bind_options (setter table)
//!     Host->>Kernel: run()
//!     Kernel->>Loader: resolve controller
//!     Loader-->>Kernel: class name
//!     Kernel->>Controller: dispatch(action, buffer)
//!     alt layout enabled
//!         Kernel->>Layout: assign(content_key, body) + render
//!     end
//!     Kernel->>View: save_cache(final body)
//!     Kernel-->>Host: Response
//!     Note over Kernel,Policy: any failure: buffer dropped,<br/>policy answers (302 / diagnostic / log)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use starfront::config::StaticConfig;
//! use starfront::controller::{controller_factory, EchoController};
//! use starfront::server::Request;
//! use starfront::Kernel;
//! use serde_json::json;
//!
//! let options = json!({"frontController": {"controllerDirectory": "/app/controllers"}});
//! let mut kernel = Kernel::builder("production", "/app", "/app/config.yaml")
//!     .config_loader(Box::new(StaticConfig(options.as_object().cloned().unwrap_or_default())))
//!     .request(Request::from_query("controller=missing"))
//!     .build()?;
//! kernel
//!     .controllers_mut()
//!     .register_unit("/app/controllers/Echo.rs", EchoController::CLASS, controller_factory(EchoController::new));
//!
//! // `/app/controllers/Missing.rs` does not exist: redirected to the not-found page.
//! let response = kernel.run();
//! assert_eq!(response.status(), 302);
//! # Ok::<(), starfront::KernelError>(())
//! ```
//!
//! ## Configuration
//!
//! ```yaml
//! production:
//!   frontController:
//!     controllerDirectory: /srv/app/controllers
//!     params:
//!       display_exceptions: 0
//!   resources:
//!     view:
//!       encoding: UTF-8
//!     adapter: pdo_mysql
//!   cache:
//!     is_cache: 1
//!     lifetime: 600
//!   bootstrap:
//!     path: Bootstrap.rs
//! staging:
//!   extends: production
//!   frontController:
//!     params:
//!       display_exceptions: 1
//! ```
//!
//! ## Logging
//!
//! Install the subscriber with [`logging::init_logging`]; output goes to stderr.

pub mod adapter;
pub mod binder;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dispatcher;
mod error;
pub mod ids;
pub mod kernel;
pub mod loader;
pub mod logging;
pub mod server;
pub mod view;

pub use dispatcher::{DispatchOutcome, DispatchReport, DispatchState, ExceptionAction};
pub use error::{KernelError, Result};
pub use kernel::{Bootstrap, Kernel, KernelBuilder};
