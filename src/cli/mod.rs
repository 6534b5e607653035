//! # CLI Module
//!
//! Command-line front end of the `starfront` binary.
//!
//! ## Commands
//!
//! ### `run`
//!
//! Dispatch one CGI-style request and write the status line, headers and body
//! to stdout:
//!
//! ```bash
//! QUERY_STRING='controller=home&action=index' \
//!     starfront run --app ./app --config ./app/config.yaml --env production
//! ```
//!
//! Every unit file found in the controller directory is served by the built-in
//! echo controller, which prints the controller, action and parameters it saw.
//!
//! ### `check`
//!
//! Build the kernel and print its wiring summary:
//!
//! ```bash
//! starfront check --app ./app --config ./app/config.yaml --env staging
//! ```
//!
//! ## Environment
//!
//! | Flag | Variable |
//! |------|----------|
//! | `--app` | `STAR_APP_PATH` |
//! | `--config` | `STAR_CONFIG` |
//! | `--env` | `STAR_ENV` |
//! | `--query` | `QUERY_STRING` |

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
