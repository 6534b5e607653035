use super::core::{Controller, ControllerContext};
use crate::error::Result;
use crate::server::{OutputBuffer, Request};

/// Built-in controller answering every action with a plain listing of the
/// request it received. Used by the `starfront run` command.
#[derive(Debug)]
pub struct EchoController {
    request: Request,
}

impl EchoController {
    /// Class name the echo controller is registered under.
    pub const CLASS: &'static str = "Echo";

    pub fn new(ctx: ControllerContext) -> Result<Self> {
        Ok(EchoController {
            request: ctx.request,
        })
    }
}

impl Controller for EchoController {
    fn dispatch(&mut self, action: &str, out: &mut OutputBuffer) -> Result<()> {
        out.write_str(&format!("controller: {}\n", self.request.controller()));
        out.write_str(&format!("action: {action}\n"));
        for (k, v) in self.request.params() {
            out.write_str(&format!("param {k}: {v}\n"));
        }
        Ok(())
    }
}
