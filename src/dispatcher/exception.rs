use crate::error::KernelError;
use crate::server::{redirect, text_response};
use http::Response;
use tracing::{error, warn};

/// Where 404 failures are redirected unless configured otherwise.
pub const DEFAULT_NOT_FOUND_LOCATION: &str = "/404.html";

/// External sink receiving failures in production mode.
pub trait LogSink {
    fn log(&self, message: &str);
}

/// [`LogSink`] emitting a `tracing` error event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, message: &str) {
        error!(target: "starfront::exception", diagnostic = %message, "Dispatch failed");
    }
}

/// How a failure was turned into a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExceptionAction {
    /// 404: redirect to the not-found page.
    Redirect { location: String },
    /// Diagnostic written to the client (`display_exceptions` on).
    Display,
    /// Diagnostic sent to the log sink; client sees no detail.
    Log,
}

type ServerErrorHook = Box<dyn Fn(&KernelError)>;

/// Maps dispatch failures to HTTP outcomes.
pub struct ExceptionPolicy {
    display_exceptions: bool,
    not_found_location: String,
    log_sink: Box<dyn LogSink>,
    on_server_error: Option<ServerErrorHook>,
}

impl Default for ExceptionPolicy {
    fn default() -> Self {
        Self::new(Box::new(TracingLogSink))
    }
}

impl ExceptionPolicy {
    #[must_use]
    pub fn new(log_sink: Box<dyn LogSink>) -> Self {
        ExceptionPolicy {
            display_exceptions: false,
            not_found_location: DEFAULT_NOT_FOUND_LOCATION.to_string(),
            log_sink,
            on_server_error: None,
        }
    }

    #[must_use]
    pub fn display_exceptions(&self) -> bool {
        self.display_exceptions
    }

    pub fn set_display_exceptions(&mut self, display: bool) {
        self.display_exceptions = display;
    }

    #[must_use]
    pub fn not_found_location(&self) -> &str {
        &self.not_found_location
    }

    pub fn set_not_found_location(&mut self, location: &str) {
        self.not_found_location = location.to_string();
    }

    pub fn set_log_sink(&mut self, log_sink: Box<dyn LogSink>) {
        self.log_sink = log_sink;
    }

    /// Extension point for status-500 failures (load/readability errors and
    /// unclassified controller failures). Runs after the regular handling.
    pub fn on_server_error<F>(&mut self, hook: F)
    where
        F: Fn(&KernelError) + 'static,
    {
        self.on_server_error = Some(Box::new(hook));
    }

    /// Decide how `err` is handled, without side effects.
    #[must_use]
    pub fn classify(&self, err: &KernelError) -> ExceptionAction {
        if err.status() == 404 {
            ExceptionAction::Redirect {
                location: self.not_found_location.clone(),
            }
        } else if self.display_exceptions {
            ExceptionAction::Display
        } else {
            ExceptionAction::Log
        }
    }

    /// Handle `err` and build the response sent in place of the page.
    pub fn handle(&self, err: &KernelError, encoding: &str) -> (ExceptionAction, Response<Vec<u8>>) {
        let action = self.classify(err);
        let status = match err.status() {
            s @ 400..=599 => s,
            _ => 500,
        };

        let response = match &action {
            ExceptionAction::Redirect { location } => {
                warn!(
                    error_kind = err.kind(),
                    location = %location,
                    error = %err,
                    "Not found - redirecting"
                );
                return (action.clone(), redirect(location));
            }
            ExceptionAction::Display => {
                error!(error_kind = err.kind(), status = status, error = %err, "Displaying failure");
                text_response(
                    status,
                    &format!("text/plain; charset={encoding}"),
                    err.diagnostic().into_bytes(),
                )
            }
            ExceptionAction::Log => {
                self.log_sink.log(&err.diagnostic());
                text_response(status, &format!("text/html; charset={encoding}"), Vec::new())
            }
        };

        if err.status() == 500 {
            if let Some(hook) = &self.on_server_error {
                hook(err);
            }
        }

        (action, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingSink(Rc<RefCell<Vec<String>>>);

    impl LogSink for RecordingSink {
        fn log(&self, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    fn load_error() -> KernelError {
        KernelError::Load {
            class: "Home".into(),
            path: PathBuf::from("/app/controllers/Home.rs"),
        }
    }

    #[test]
    fn test_not_found_redirects_even_in_display_mode() {
        let mut policy = ExceptionPolicy::default();
        policy.set_display_exceptions(true);
        let err = KernelError::NotFound {
            path: PathBuf::from("/x.rs"),
        };
        let (action, res) = policy.handle(&err, "UTF-8");
        assert_eq!(
            action,
            ExceptionAction::Redirect {
                location: "/404.html".into()
            }
        );
        assert_eq!(res.status(), 302);
        assert!(res.body().is_empty());
    }

    #[test]
    fn test_silent_mode_logs_once_without_client_detail() {
        let sink = RecordingSink::default();
        let policy = ExceptionPolicy::new(Box::new(sink.clone()));
        let (action, res) = policy.handle(&load_error(), "UTF-8");
        assert_eq!(action, ExceptionAction::Log);
        assert_eq!(res.status(), 500);
        assert!(res.body().is_empty());
        let logged = sink.0.borrow();
        assert_eq!(logged.len(), 1);
        assert!(logged[0].contains("Cannot load controller class Home"));
    }

    #[test]
    fn test_display_mode_shows_diagnostic() {
        let sink = RecordingSink::default();
        let mut policy = ExceptionPolicy::new(Box::new(sink.clone()));
        policy.set_display_exceptions(true);
        let (action, res) = policy.handle(&KernelError::http(403, "forbidden area"), "UTF-8");
        assert_eq!(action, ExceptionAction::Display);
        assert_eq!(res.status(), 403);
        assert!(String::from_utf8_lossy(res.body()).contains("forbidden area"));
        assert!(sink.0.borrow().is_empty());
    }

    #[test]
    fn test_server_error_hook_only_for_500() {
        let hits = Rc::new(RefCell::new(0));
        let mut policy = ExceptionPolicy::default();
        let counter = Rc::clone(&hits);
        policy.on_server_error(move |_| *counter.borrow_mut() += 1);
        policy.handle(&load_error(), "UTF-8");
        policy.handle(&KernelError::http(403, "x"), "UTF-8");
        policy.handle(
            &KernelError::NotFound {
                path: PathBuf::from("/x"),
            },
            "UTF-8",
        );
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_out_of_range_status_becomes_500() {
        let policy = ExceptionPolicy::default();
        let (_, res) = policy.handle(&KernelError::http(200, "weird"), "UTF-8");
        assert_eq!(res.status(), 500);
    }
}
