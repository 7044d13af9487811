//! Variable substitution via MiniJinja.

use std::path::Path;

use stencil_core::{
    application::{ApplicationError, ports::ContentRenderer},
    domain::RenderContext,
    error::StencilResult,
};

/// Renders selected template files with `{{ variable }}` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct JinjaRenderer;

impl JinjaRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ContentRenderer for JinjaRenderer {
    fn render(
        &self,
        source: &str,
        context: &RenderContext,
        origin: &Path,
    ) -> StencilResult<String> {
        let mut env = minijinja::Environment::new();
        // Templates produce source files, not HTML; escaping would corrupt them.
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
        env.render_str(source, context.variables())
            .map_err(|e| {
                ApplicationError::RenderingFailed {
                    file: origin.to_path_buf(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
