//! # Server Module
//!
//! Request input, buffered output and response emission for one request cycle.
//!
//! - [`Request`] holds the raw request parameters and the keys/defaults used to
//!   read the controller and action identifiers from them.
//! - [`OutputBuffer`] is the in-memory byte sink controller code writes into. It
//!   is owned by the dispatch pipeline and consumed exactly once: flushed into
//!   the response body on success, dropped on failure.
//! - [`write_cgi_response`] emits a finished response in CGI format
//!   (`Status:` line, headers, blank line, body).

mod output;
mod request;
mod response;

pub use output::OutputBuffer;
pub use request::Request;
pub use response::{redirect, status_reason, text_response, write_cgi_response};
