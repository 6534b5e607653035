//! # Binder Module
//!
//! Applies a configuration tree onto an object through a statically declared
//! table of `key -> setter`.
//!
//! ## Rules
//!
//! - Setters run in **table declaration order**, not in the order keys appear in
//!   the configuration. Two keys that interact (for example `frontController` and
//!   `view`) are therefore always applied in the same order.
//! - A key with no setter is ignored. Unrecognized configuration is not an error.
//! - A key with no value in the configuration is a no-op.
//! - The first failing setter aborts binding and its error propagates.
//!
//! ## Example
//!
//! ```rust
//! use starfront::binder::{bind_options, Configurable, Setter};
//! use starfront::config::ConfigTree;
//! use serde_json::{json, Value};
//!
//! #[derive(Default)]
//! struct Pool { size: u64 }
//!
//! impl Pool {
//!     fn set_size(&mut self, value: &Value) -> starfront::Result<()> {
//!         self.size = value.as_u64().unwrap_or(1);
//!         Ok(())
//!     }
//! }
//!
//! impl Configurable for Pool {
//!     const SETTERS: &'static [(&'static str, Setter<Self>)] = &[("size", Pool::set_size)];
//! }
//!
//! let mut pool = Pool::default();
//! let options: ConfigTree = json!({"size": 8, "colour": "red"})
//!     .as_object()
//!     .cloned()
//!     .unwrap_or_default();
//! let applied = bind_options(&mut pool, &options).unwrap();
//! assert_eq!((pool.size, applied), (8, 1));
//! ```

mod core;

pub use core::{bind_options, Configurable, Setter};
