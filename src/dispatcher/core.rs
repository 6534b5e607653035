use super::exception::ExceptionAction;
use crate::controller::ControllerContext;
use crate::error::{KernelError, Result};
use crate::ids::RequestId;
use crate::kernel::Kernel;
use crate::loader::load_controller;
use crate::server::{text_response, OutputBuffer};
use http::Response;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span};

/// Dispatch lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Init,
    Loading,
    Executing,
    Success,
    Failed,
    Done,
}

/// How the request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The page was rendered; `cached` tells whether the cache-save hook stored it.
    Rendered { cached: bool },
    /// A failure was handled by the exception policy.
    Failed(ExceptionAction),
}

/// Everything one dispatch produced.
#[derive(Debug)]
pub struct DispatchReport {
    pub request_id: RequestId,
    pub state: DispatchState,
    pub response: Response<Vec<u8>>,
    pub outcome: DispatchOutcome,
    pub failure: Option<KernelError>,
}

impl DispatchReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

fn advance(state: &mut DispatchState, next: DispatchState) {
    debug!(from = ?*state, to = ?next, "Dispatch state transition");
    *state = next;
}

impl Kernel {
    /// Dispatch the current request.
    ///
    /// Never fails: errors raised while loading or running the controller, or
    /// while rendering its layout, are answered by the exception policy.
    pub fn dispatch(&mut self) -> DispatchReport {
        let request_id = self.request.request_id().unwrap_or_default();
        let span = info_span!(
            "dispatch",
            request_id = %request_id,
            controller = %self.request.controller(),
            action = %self.request.action()
        );
        let _guard = span.enter();
        let start = Instant::now();

        let mut state = DispatchState::Init;
        let encoding = self.view.encoding().to_string();
        let content_type = format!("text/html; charset={encoding}");
        let mut out = OutputBuffer::new();
        self.view.begin_page(&self.request.cache_key());
        info!(page_key = %self.view.page_key(), "Dispatch started");

        match self.execute(&mut state, &mut out) {
            Ok(()) => {
                advance(&mut state, DispatchState::Success);
                let cached = self.view.save_cache(out.contents());
                let response = text_response(200, &content_type, out.into_bytes());
                advance(&mut state, DispatchState::Done);
                info!(
                    status = 200,
                    bytes = response.body().len(),
                    cached = cached,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Dispatch complete"
                );
                DispatchReport {
                    request_id,
                    state,
                    response,
                    outcome: DispatchOutcome::Rendered { cached },
                    failure: None,
                }
            }
            Err(err) => {
                advance(&mut state, DispatchState::Failed);
                drop(out);
                error!(
                    error_kind = err.kind(),
                    status = err.status(),
                    error = %err,
                    "Dispatch failed"
                );
                let (action, response) = self.exceptions.handle(&err, &encoding);
                advance(&mut state, DispatchState::Done);
                info!(
                    status = response.status().as_u16(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Dispatch complete"
                );
                DispatchReport {
                    request_id,
                    state,
                    response,
                    outcome: DispatchOutcome::Failed(action),
                    failure: Some(err),
                }
            }
        }
    }

    /// Dispatch and return the emitted response.
    pub fn run(&mut self) -> Response<Vec<u8>> {
        self.dispatch().response
    }

    fn execute(&mut self, state: &mut DispatchState, out: &mut OutputBuffer) -> Result<()> {
        advance(state, DispatchState::Loading);
        let directory = self.controller_directory();
        let class = load_controller(
            &self.request,
            &directory,
            self.resolver.as_ref(),
            &mut self.controllers,
        )?;

        let context = ControllerContext {
            request: self.request.clone(),
            view: Arc::clone(&self.view),
        };
        let factory = self
            .controllers
            .factory(&class)
            .ok_or_else(|| KernelError::InvalidController {
                class: class.clone(),
                path: directory.clone(),
            })?;
        let mut controller = factory(context)?;

        advance(state, DispatchState::Executing);
        let action = self.request.action();
        controller.dispatch(&action, out)?;
        self.adapter.close();

        if let Some(layout) = controller.layout_mut().filter(|l| l.is_enabled()) {
            let body = out.take();
            let content_key = layout.content_key().to_string();
            layout.set_view(Arc::clone(&self.view));
            layout.render_content(&body, out)?;
            debug!(content_key = %content_key, body_bytes = body.len(), "Layout rendered");
        }
        Ok(())
    }
}
