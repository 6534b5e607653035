mod common;

use common::app_tree::AppTree;
use common::controllers::Home;
use serde_json::json;
use starfront::config::StaticConfig;
use starfront::controller::controller_factory;
use starfront::kernel::{
    bootstrap_factory, BootstrapRegistry, HookBootstrap, InitHook, DEFAULT_BOOTSTRAP_CLASS,
};
use starfront::server::Request;
use starfront::{Bootstrap, Kernel, KernelError, Result};

fn register_home(kernel: &mut Kernel) -> Result<()> {
    let unit = kernel.controller_directory().join("Home.rs");
    kernel
        .controllers_mut()
        .register_unit(unit, "Home", controller_factory(Home::new));
    Ok(())
}

fn display_errors(kernel: &mut Kernel) -> Result<()> {
    kernel.exception_policy_mut().set_display_exceptions(true);
    Ok(())
}

const HOOKS: &[(&str, InitHook)] = &[("controllers", register_home), ("errors", display_errors)];

/// Bootstrap counting how often it ran and which resource it was asked for.
struct Counting {
    runs: Vec<Option<String>>,
}

impl Bootstrap for Counting {
    fn bootstrap(&mut self, kernel: &mut Kernel, resource: Option<&str>) -> Result<()> {
        self.runs.push(resource.map(str::to_string));
        kernel.request_mut().set_default_action_name("boot");
        Ok(())
    }
}

fn build(app: &AppTree, options: serde_json::Value, bootstraps: BootstrapRegistry) -> Result<Kernel> {
    Kernel::builder("testing", app.path(), app.path().join("config.yaml"))
        .config_loader(Box::new(StaticConfig(
            options.as_object().cloned().unwrap_or_default(),
        )))
        .bootstraps(bootstraps)
        .request(Request::from_query("controller=home"))
        .build()
}

#[test]
fn test_configured_bootstrap_registers_controllers_before_dispatch() {
    let app = AppTree::new();
    app.add_unit("Home");
    let unit = app.write("Bootstrap.rs", "// bootstrap unit");
    let mut registry = BootstrapRegistry::new();
    registry.register_unit(
        unit.clone(),
        "AppBootstrap",
        bootstrap_factory(|_| Ok(HookBootstrap::new(HOOKS))),
    );

    let mut kernel = build(
        &app,
        json!({"bootstrap": {"path": "Bootstrap.rs", "class": "AppBootstrap"}}),
        registry,
    )
    .unwrap();
    assert!(kernel.bootstraps().is_loaded(&unit));

    let response = kernel.bootstrap(None).unwrap().run();
    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), b"hello");
    assert!(kernel.display_exceptions());
}

#[test]
fn test_single_resource_runs_only_that_hook() {
    let app = AppTree::new();
    let mut registry = BootstrapRegistry::new();
    registry.define(
        DEFAULT_BOOTSTRAP_CLASS,
        bootstrap_factory(|_| Ok(HookBootstrap::new(HOOKS))),
    );
    let mut kernel = build(&app, json!({}), registry).unwrap();

    kernel.bootstrap(Some("errors")).unwrap();
    assert!(kernel.display_exceptions());
    assert!(!kernel.controllers().is_defined("Home"));
}

#[test]
fn test_default_bootstrap_constructed_lazily_once() {
    let app = AppTree::new();
    let mut registry = BootstrapRegistry::new();
    registry.register_unit(
        app.path().join("Bootstrap.rs"),
        DEFAULT_BOOTSTRAP_CLASS,
        bootstrap_factory(|kernel: &Kernel| {
            assert_eq!(kernel.environment(), "testing");
            Ok(Counting { runs: Vec::new() })
        }),
    );
    let mut kernel = build(&app, json!({}), registry).unwrap();
    assert!(!kernel.bootstraps().is_defined(DEFAULT_BOOTSTRAP_CLASS));

    kernel.bootstrap(None).unwrap().bootstrap(Some("db")).unwrap();
    assert!(kernel.bootstraps().is_defined(DEFAULT_BOOTSTRAP_CLASS));
    assert_eq!(kernel.request().action(), "boot");
    assert!(kernel.bootstrap_instance().is_ok());
}

#[test]
fn test_bootstrap_block_errors_abort_construction() {
    let app = AppTree::new();
    let err = build(&app, json!({"bootstrap": {"path": ""}}), BootstrapRegistry::new()).unwrap_err();
    assert!(matches!(err, KernelError::Config(_)));

    let err = build(
        &app,
        json!({"bootstrap": {"path": "Missing.rs"}}),
        BootstrapRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(err, KernelError::BootstrapNotFound { ref class } if class == "Bootstrap"));
}

#[test]
fn test_bootstrap_without_any_class_fails_at_first_access() {
    let app = AppTree::new();
    let mut kernel = build(&app, json!({}), BootstrapRegistry::new()).unwrap();
    let err = kernel.bootstrap(None).unwrap_err();
    assert_eq!(err.kind(), "bootstrap_not_found");
}
