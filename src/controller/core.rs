use crate::error::{KernelError, Result};
use crate::loader::ClassRegistry;
use crate::server::{OutputBuffer, Request};
use crate::view::{Layout, View};
use std::sync::Arc;

/// What a controller is instantiated with.
#[derive(Debug, Clone)]
pub struct ControllerContext {
    pub request: Request,
    pub view: Arc<View>,
}

/// A request handler selected by the controller identifier.
pub trait Controller {
    /// Run `action`, writing the page body into `out`.
    fn dispatch(&mut self, action: &str, out: &mut OutputBuffer) -> Result<()>;

    /// Layout wrapping this controller's output, if it set one.
    fn layout_mut(&mut self) -> Option<&mut Layout> {
        None
    }
}

/// Action name and the method implementing it.
pub type Action<C> = (&'static str, fn(&mut C, &mut OutputBuffer) -> Result<()>);

/// Instantiates a controller class.
pub type ControllerFactory = Box<dyn Fn(ControllerContext) -> Result<Box<dyn Controller>>>;

/// Registry of controller classes by code unit.
pub type ControllerRegistry = ClassRegistry<ControllerFactory>;

/// Box a typed constructor into a [`ControllerFactory`].
pub fn controller_factory<C, F>(constructor: F) -> ControllerFactory
where
    C: Controller + 'static,
    F: Fn(ControllerContext) -> Result<C> + 'static,
{
    Box::new(move |ctx| Ok(Box::new(constructor(ctx)?) as Box<dyn Controller>))
}

/// Run the action named `action` from a static action table.
///
/// # Errors
///
/// Unknown actions fail with status 404; otherwise the action's own result.
pub fn dispatch_action<C>(
    controller: &mut C,
    actions: &[Action<C>],
    action: &str,
    out: &mut OutputBuffer,
) -> Result<()> {
    let (_, run) = actions
        .iter()
        .find(|(name, _)| *name == action)
        .ok_or_else(|| KernelError::http(404, format!("Action '{action}' not found")))?;
    run(controller, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigTree;
    use std::path::Path;

    struct Counter {
        hits: usize,
    }

    impl Counter {
        const ACTIONS: &'static [Action<Self>] = &[("hit", Counter::hit), ("fail", Counter::fail)];

        fn hit(&mut self, out: &mut OutputBuffer) -> Result<()> {
            self.hits += 1;
            out.write_str("hit");
            Ok(())
        }

        fn fail(&mut self, _: &mut OutputBuffer) -> Result<()> {
            Err(KernelError::http(403, "nope"))
        }
    }

    impl Controller for Counter {
        fn dispatch(&mut self, action: &str, out: &mut OutputBuffer) -> Result<()> {
            dispatch_action(self, Self::ACTIONS, action, out)
        }
    }

    #[test]
    fn test_dispatch_action_table() {
        let mut c = Counter { hits: 0 };
        let mut out = OutputBuffer::new();
        c.dispatch("hit", &mut out).unwrap();
        assert_eq!(c.hits, 1);
        assert_eq!(out.contents(), b"hit");
        assert_eq!(c.dispatch("fail", &mut out).unwrap_err().status(), 403);
        assert_eq!(c.dispatch("missing", &mut out).unwrap_err().status(), 404);
    }

    #[test]
    fn test_factory_boxes_controller() {
        let factory = controller_factory(|_ctx| Ok(Counter { hits: 0 }));
        let ctx = ControllerContext {
            request: Request::new(),
            view: Arc::new(View::new(Path::new("/app"), &ConfigTree::new())),
        };
        let mut controller = factory(ctx).unwrap();
        let mut out = OutputBuffer::new();
        controller.dispatch("hit", &mut out).unwrap();
        assert!(controller.layout_mut().is_none());
    }
}
