use super::core::{Kernel, DEFAULT_CACHE_LIFETIME};
use crate::adapter::ADAPTER_KEY;
use crate::binder::{Configurable, Setter};
use crate::config::{as_flag, get_path, is_truthy, scalar_to_string, ConfigTree};
use crate::error::Result;
use crate::view::View;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

impl Configurable for Kernel {
    const SETTERS: &'static [(&'static str, Setter<Self>)] = &[
        ("includePaths", Kernel::apply_include_paths),
        ("processSettings", Kernel::apply_process_settings),
        ("phpSettings", Kernel::apply_process_settings),
        ("controllerKey", Kernel::apply_controller_key),
        ("actionKey", Kernel::apply_action_key),
        ("defaultControllerName", Kernel::apply_default_controller_name),
        ("defaultActionName", Kernel::apply_default_action_name),
        ("frontController", Kernel::apply_front_controller),
        ("controllerDirectory", Kernel::apply_controller_directory),
        ("view", Kernel::apply_view),
        ("resources", Kernel::apply_resources),
        ("cache", Kernel::apply_cache),
        ("bootstrap", Kernel::apply_bootstrap),
    ];
}

/// Nested map at `value`; anything else reads as an empty block.
fn block(value: &Value) -> ConfigTree {
    value.as_object().cloned().unwrap_or_default()
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

fn flatten_settings(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_settings(&name, child, out);
            }
        }
        other => match scalar_to_string(other) {
            Some(text) if !prefix.is_empty() => {
                out.insert(prefix.to_string(), text);
            }
            _ => debug!(setting = %prefix, "Skipping non-scalar process setting"),
        },
    }
}

impl Kernel {
    fn apply_include_paths(&mut self, value: &Value) -> Result<()> {
        self.set_include_paths(value);
        Ok(())
    }

    fn apply_process_settings(&mut self, value: &Value) -> Result<()> {
        self.set_process_settings(&block(value));
        Ok(())
    }

    fn apply_controller_key(&mut self, value: &Value) -> Result<()> {
        if let Some(key) = non_empty_str(value) {
            self.request.set_controller_key(key);
        }
        Ok(())
    }

    fn apply_action_key(&mut self, value: &Value) -> Result<()> {
        if let Some(key) = non_empty_str(value) {
            self.request.set_action_key(key);
        }
        Ok(())
    }

    fn apply_default_controller_name(&mut self, value: &Value) -> Result<()> {
        if let Some(name) = non_empty_str(value) {
            self.request.set_default_controller_name(name);
        }
        Ok(())
    }

    fn apply_default_action_name(&mut self, value: &Value) -> Result<()> {
        if let Some(name) = non_empty_str(value) {
            self.request.set_default_action_name(name);
        }
        Ok(())
    }

    fn apply_front_controller(&mut self, value: &Value) -> Result<()> {
        self.set_front_controller(&block(value));
        Ok(())
    }

    fn apply_controller_directory(&mut self, value: &Value) -> Result<()> {
        if let Some(directory) = non_empty_str(value) {
            self.set_controller_directory(directory);
        }
        Ok(())
    }

    fn apply_view(&mut self, value: &Value) -> Result<()> {
        self.set_view(&block(value));
        Ok(())
    }

    fn apply_resources(&mut self, value: &Value) -> Result<()> {
        self.set_resources(&block(value));
        Ok(())
    }

    fn apply_cache(&mut self, value: &Value) -> Result<()> {
        self.set_cache(&block(value));
        Ok(())
    }

    fn apply_bootstrap(&mut self, value: &Value) -> Result<()> {
        self.set_bootstrap(&block(value))
    }

    /// Apply a `frontController` block: controller directory, display flag and
    /// the not-found redirect target.
    pub fn set_front_controller(&mut self, options: &ConfigTree) {
        if let Some(directory) = options.get("controllerDirectory").and_then(non_empty_str) {
            self.set_controller_directory(directory);
        }
        if let Some(display) = get_path(options, &["params", "display_exceptions"]) {
            self.exceptions.set_display_exceptions(as_flag(display));
        }
        if let Some(location) =
            get_path(options, &["params", "not_found_location"]).and_then(non_empty_str)
        {
            self.exceptions.set_not_found_location(location);
        }
        debug!(
            display_exceptions = self.exceptions.display_exceptions(),
            not_found_location = %self.exceptions.not_found_location(),
            "Front controller configured"
        );
    }

    /// Wire a fresh view from `options`. An active page cache stays attached.
    pub fn set_view(&mut self, options: &ConfigTree) {
        self.view_options = options.clone();
        self.rebuild_view();
    }

    /// Wire the `resources` block: front controller, then view, then data adapter.
    pub fn set_resources(&mut self, resources: &ConfigTree) {
        if let Some(front) = resources
            .get("frontController")
            .and_then(Value::as_object)
            .filter(|m| !m.is_empty())
        {
            self.set_front_controller(front);
        }

        let view_options = resources.get("view").map(block).unwrap_or_default();
        self.set_view(&view_options);

        if resources.get(ADAPTER_KEY).is_some_and(is_truthy) {
            self.adapter.settings(resources);
            info!("Data adapter wired from resources");
        }
    }

    /// Activate the page cache when `is_cache` is truthy; `lifetime` is in seconds.
    pub fn set_cache(&mut self, options: &ConfigTree) {
        if !options.get("is_cache").is_some_and(is_truthy) {
            debug!("Page cache not activated");
            return;
        }
        let lifetime = options
            .get("lifetime")
            .and_then(|v| match v {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .map_or(DEFAULT_CACHE_LIFETIME, Duration::from_secs);
        self.cache_lifetime = Some(lifetime);
        self.rebuild_view();
        info!(lifetime_secs = lifetime.as_secs(), "Page cache activated");
    }

    /// Record the scalar leaves of `settings`, nested keys joined with `.`.
    pub fn set_process_settings(&mut self, settings: &ConfigTree) {
        let mut flat = BTreeMap::new();
        for (key, value) in settings {
            flatten_settings(key, value, &mut flat);
        }
        for (key, value) in &flat {
            debug!(setting = %key, value = %value, "Process setting recorded");
        }
        self.process_settings.extend(flat);
    }

    /// Record include paths. Relative entries are taken from the application
    /// path; entries that are not existing directories are ignored.
    pub fn set_include_paths(&mut self, value: &Value) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.set_include_paths(item);
                }
            }
            Value::String(path) if !path.is_empty() => {
                let path = PathBuf::from(path);
                let path = if path.is_relative() {
                    self.application_path.join(path)
                } else {
                    path
                };
                if path.is_dir() {
                    debug!(path = %path.display(), "Include path added");
                    self.include_paths.push(path);
                } else {
                    warn!(path = %path.display(), "Ignoring include path that is not a directory");
                }
            }
            _ => debug!("Ignoring malformed include path entry"),
        }
    }

    fn rebuild_view(&mut self) {
        let mut view = View::new(&self.application_path, &self.view_options);
        if let Some(lifetime) = self.cache_lifetime {
            view = view.with_cache(Arc::clone(&self.page_cache), lifetime);
        }
        debug!(
            encoding = %view.encoding(),
            script_path = %view.script_path().display(),
            cache_enabled = view.cache_enabled(),
            "View wired"
        );
        self.view = Arc::new(view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;
    use serde_json::json;

    fn kernel_with(options: Value) -> Kernel {
        Kernel::builder("testing", "/app", "unused.yaml")
            .config_loader(Box::new(StaticConfig(options.as_object().cloned().unwrap())))
            .build()
            .unwrap()
    }

    #[test]
    fn test_setter_table_order_is_fixed() {
        let keys: Vec<&str> = Kernel::SETTERS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.first(), Some(&"includePaths"));
        assert_eq!(keys.last(), Some(&"bootstrap"));
        let resources = keys.iter().position(|k| *k == "resources").unwrap();
        let cache = keys.iter().position(|k| *k == "cache").unwrap();
        assert!(resources < cache);
    }

    #[test]
    fn test_front_controller_flags() {
        for flag in [json!(true), json!("1"), json!("on"), json!(1), json!("true")] {
            let kernel = kernel_with(json!({
                "frontController": {"params": {"display_exceptions": flag}}
            }));
            assert!(kernel.display_exceptions());
        }
        let kernel = kernel_with(json!({
            "frontController": {"params": {"display_exceptions": "off"}}
        }));
        assert!(!kernel.display_exceptions());
    }

    #[test]
    fn test_malformed_front_controller_is_ignored() {
        let mut kernel = kernel_with(json!({"frontController": "nonsense"}));
        assert!(!kernel.display_exceptions());
        assert_eq!(
            kernel.controller_directory(),
            PathBuf::from("/app/controllers")
        );
    }

    #[test]
    fn test_request_keys_forwarded() {
        let kernel = kernel_with(json!({
            "controllerKey": "c",
            "actionKey": "a",
            "defaultControllerName": "home",
            "defaultActionName": "list"
        }));
        assert_eq!(kernel.request().controller_key(), "c");
        assert_eq!(kernel.request().action_key(), "a");
        assert_eq!(kernel.request().controller(), "Home");
        assert_eq!(kernel.request().action(), "list");
    }

    #[test]
    fn test_cache_lifetime_default_and_string() {
        let kernel = kernel_with(json!({"cache": {"is_cache": true}}));
        assert_eq!(kernel.cache_lifetime(), Some(DEFAULT_CACHE_LIFETIME));
        assert!(kernel.view().cache_enabled());

        let kernel = kernel_with(json!({"cache": {"is_cache": "1", "lifetime": "60"}}));
        assert_eq!(kernel.cache_lifetime(), Some(Duration::from_secs(60)));

        let kernel = kernel_with(json!({"cache": {"is_cache": 0}}));
        assert!(kernel.cache_lifetime().is_none());
        assert!(!kernel.view().cache_enabled());
    }

    #[test]
    fn test_view_rewired_after_cache_keeps_cache() {
        let mut kernel = kernel_with(json!({"cache": {"is_cache": true}}));
        kernel.set_view(&ConfigTree::new());
        assert!(kernel.view().cache_enabled());
    }

    #[test]
    fn test_process_settings_flattened() {
        let kernel = kernel_with(json!({
            "phpSettings": {
                "display_errors": 0,
                "date": {"timezone": "UTC"},
                "list": [1, 2]
            }
        }));
        let settings = kernel.process_settings();
        assert_eq!(settings.get("display_errors").map(String::as_str), Some("0"));
        assert_eq!(settings.get("date.timezone").map(String::as_str), Some("UTC"));
        assert!(!settings.contains_key("list"));
    }
}
