//! # Controller Module
//!
//! Controllers are instantiated once per dispatch with the request and the shared
//! view, then asked to run one action. Everything an action writes goes into the
//! [`OutputBuffer`](crate::server::OutputBuffer) it is handed, never straight to
//! the client.
//!
//! ## Writing a controller
//!
//! ```rust
//! use starfront::controller::{dispatch_action, Action, Controller, ControllerContext};
//! use starfront::server::OutputBuffer;
//! use starfront::view::Layout;
//!
//! struct Home {
//!     layout: Layout,
//! }
//!
//! impl Home {
//!     const ACTIONS: &'static [Action<Self>] = &[("index", Home::index)];
//!
//!     fn new(_ctx: ControllerContext) -> starfront::Result<Self> {
//!         Ok(Home { layout: Layout::from_source("<body>{{ content }}</body>") })
//!     }
//!
//!     fn index(&mut self, out: &mut OutputBuffer) -> starfront::Result<()> {
//!         out.write_str("hello");
//!         Ok(())
//!     }
//! }
//!
//! impl Controller for Home {
//!     fn dispatch(&mut self, action: &str, out: &mut OutputBuffer) -> starfront::Result<()> {
//!         dispatch_action(self, Self::ACTIONS, action, out)
//!     }
//!
//!     fn layout_mut(&mut self) -> Option<&mut Layout> {
//!         Some(&mut self.layout)
//!     }
//! }
//! ```
//!
//! Register it with [`controller_factory`] under the unit file that defines it.

mod core;
mod echo;

pub use core::{
    controller_factory, dispatch_action, Action, Controller, ControllerContext,
    ControllerFactory, ControllerRegistry,
};
pub use echo::EchoController;
