//! Template system for script rendering

// Internal imports (std, crate)
use std::sync::Arc;

use crate::error::Result;

use super::ScriptContext;

// External imports (alphabetized)
use tera::{Context, Tera};

/// Name the built-in script layout is registered under
pub const SCRIPT_TEMPLATE: &str = "script.tera";

const SCRIPT_TEMPLATE_SOURCE: &str = include_str!("../../templates/script.tera");

/// Manages loading and rendering of script templates
#[derive(Debug, Clone)]
pub struct TemplateManager {
    /// Cached Tera template engine instance
    tera: Arc<Tera>,
}

impl TemplateManager {
    /// Create a manager holding the built-in script layout
    pub fn new() -> Result<Self> {
        Self::with_script_template(SCRIPT_TEMPLATE_SOURCE)
    }

    /// Create a manager rendering scripts with a custom layout
    ///
    /// The layout sees every field of [`ScriptContext`].
    pub fn with_script_template(source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(SCRIPT_TEMPLATE, source)?;
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render one script, ending with exactly one newline
    pub fn render_script(&self, context: &ScriptContext) -> Result<String> {
        let context = Context::from_serialize(context)?;
        let rendered = self.tera.render(SCRIPT_TEMPLATE, &context)?;
        let mut script = rendered.trim_end().to_string();
        script.push('\n');
        Ok(script)
    }
}
