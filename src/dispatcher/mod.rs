//! # Dispatcher Module
//!
//! Runs one request through the kernel and turns the outcome into a response.
//!
//! ## Pipeline
//!
//! ```text
//! Init -> Loading -> Executing -> Success -> Done
//!                            \-> Failed  -> Done
//! ```
//!
//! 1. **Init**: content type `text/html; charset=<encoding>`, fresh output buffer
//! 2. **Loading**: resolve and instantiate the controller
//! 3. **Executing**: run the action into the buffer, close the data adapter,
//!    wrap the body in the controller's layout when enabled
//! 4. **Success**: hand the final body to the view's cache-save hook
//! 5. **Failed**: drop the buffer and let the [`ExceptionPolicy`] answer
//!
//! Every transition is logged at `debug` inside a `dispatch` span that carries
//! a ULID request id.

mod core;
mod exception;

pub use core::{DispatchOutcome, DispatchReport, DispatchState};
pub use exception::{
    ExceptionAction, ExceptionPolicy, LogSink, TracingLogSink, DEFAULT_NOT_FOUND_LOCATION,
};
