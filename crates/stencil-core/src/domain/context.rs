//! Render context: the variables available to the substitution pass.

use std::collections::BTreeMap;

use serde::Serialize;

/// Variable bindings handed to the content renderer.
///
/// Always contains `project_name`; the generation pipeline adds
/// `project_directory` once the target path is known. Serializes as a flat
/// map so it can be fed directly to a template engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    /// Create a context seeded with `project_name`.
    pub fn new(project_name: impl Into<String>) -> Self {
        let mut variables = BTreeMap::new();
        variables.insert("project_name".to_string(), project_name.into());
        Self { variables }
    }

    /// Builder-style variable insertion.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or overwrite a variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Look up a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// All bindings, in name order.
    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_seeds_project_name() {
        let ctx = RenderContext::new("blog");
        assert_eq!(ctx.get("project_name"), Some("blog"));
    }

    #[test]
    fn with_variable_adds_binding() {
        let ctx = RenderContext::new("blog").with_variable("author", "Alice");
        assert_eq!(ctx.get("author"), Some("Alice"));
        assert_eq!(ctx.variables().len(), 2);
    }

    #[test]
    fn set_overwrites() {
        let mut ctx = RenderContext::new("blog");
        ctx.set("project_name", "wiki");
        assert_eq!(ctx.get("project_name"), Some("wiki"));
    }

    #[test]
    fn serializes_as_flat_map() {
        let ctx = RenderContext::new("blog").with_variable("author", "Alice");
        // BTreeMap ordering makes this deterministic.
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, r#"{"author":"Alice","project_name":"blog"}"#);
    }
}
