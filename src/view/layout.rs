use super::View;
use crate::error::{KernelError, Result};
use crate::server::OutputBuffer;
use serde_json::{Map, Value};
use std::sync::Arc;

const DEFAULT_CONTENT_KEY: &str = "content";

#[derive(Debug, Clone)]
enum LayoutTemplate {
    File(String),
    Source(String),
}

/// Outer template wrapping a controller's rendered body.
///
/// The dispatch pipeline assigns the buffered controller output under
/// [`Layout::content_key`] and renders the layout in its place.
#[derive(Debug, Clone)]
pub struct Layout {
    enabled: bool,
    content_key: String,
    template: LayoutTemplate,
    vars: Map<String, Value>,
    view: Option<Arc<View>>,
}

impl Layout {
    /// Enabled layout read from a template file under the view's script path.
    #[must_use]
    pub fn new(template: &str) -> Self {
        Self::with_template(LayoutTemplate::File(template.to_string()))
    }

    /// Enabled layout from inline template source.
    #[must_use]
    pub fn from_source(source: &str) -> Self {
        Self::with_template(LayoutTemplate::Source(source.to_string()))
    }

    fn with_template(template: LayoutTemplate) -> Self {
        Layout {
            enabled: true,
            content_key: DEFAULT_CONTENT_KEY.to_string(),
            template,
            vars: Map::new(),
            view: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[must_use]
    pub fn content_key(&self) -> &str {
        &self.content_key
    }

    pub fn set_content_key(&mut self, key: &str) {
        self.content_key = key.to_string();
    }

    pub fn set_view(&mut self, view: Arc<View>) {
        self.view = Some(view);
    }

    pub fn assign(&mut self, key: &str, value: impl Into<Value>) {
        self.vars.insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Render into `out` with the assigned variables.
    ///
    /// # Errors
    ///
    /// Fails when no view is bound or the template does not render.
    pub fn render(&self, out: &mut OutputBuffer) -> Result<()> {
        out.write_str(&self.render_html()?);
        Ok(())
    }

    fn render_html(&self) -> Result<String> {
        let view = self.view.as_ref().ok_or_else(|| {
            KernelError::Controller(anyhow::anyhow!("layout rendered without a bound view"))
        })?;
        match &self.template {
            LayoutTemplate::File(name) => view.render(name, &self.vars),
            LayoutTemplate::Source(source) => view.render_source(source, &self.vars),
        }
    }

    /// Render with `body` in the content slot, byte for byte.
    ///
    /// The template sees a placeholder that is swapped for `body` after
    /// rendering, so bodies in non-UTF-8 encodings pass through unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`Layout::render`].
    pub fn render_content(&mut self, body: &[u8], out: &mut OutputBuffer) -> Result<()> {
        let marker = format!("starfront-content-{}", ulid::Ulid::new());
        let key = self.content_key.clone();
        self.assign(&key, marker.as_str());
        let rendered = self.render_html();
        self.vars.remove(&key);
        let html = rendered?;

        let mut pieces = html.split(marker.as_str());
        if let Some(first) = pieces.next() {
            out.write_str(first);
        }
        for piece in pieces {
            out.write_bytes(body);
            out.write_str(piece);
        }
        Ok(())
    }
}
