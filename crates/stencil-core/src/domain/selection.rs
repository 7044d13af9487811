//! Render selection: which files get the substitution pass.
//!
//! Everything not selected is copied byte-for-byte, so binary assets in a
//! template survive untouched.

/// Selects files for rendering by extension or exact filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSelection {
    /// Normalized extensions, stored with a leading dot (".rs").
    extensions: Vec<String>,
    /// Exact filenames rendered regardless of extension.
    filenames: Vec<String>,
}

impl RenderSelection {
    /// Build a selection from repeatable CLI arguments.
    ///
    /// Each argument may carry a comma-separated list; entries are trimmed
    /// and a missing leading dot is added, so `-e py -e rs,toml` and
    /// `-e .py,.rs -e toml` mean the same thing.
    pub fn from_args(extensions: &[String], filenames: &[String]) -> Self {
        let mut selection = Self::default();
        for arg in extensions {
            for ext in arg.split(',') {
                let ext = ext.trim().trim_start_matches('.');
                if ext.is_empty() {
                    continue;
                }
                let normalized = format!(".{ext}");
                if !selection.extensions.contains(&normalized) {
                    selection.extensions.push(normalized);
                }
            }
        }
        for arg in filenames {
            for name in arg.split(',') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                if !selection.filenames.iter().any(|n| n == name) {
                    selection.filenames.push(name.to_string());
                }
            }
        }
        selection
    }

    /// Whether the file with this name receives variable substitution.
    pub fn should_render(&self, filename: &str) -> bool {
        self.filenames.iter().any(|n| n == filename)
            || self.extensions.iter().any(|ext| filename.ends_with(ext.as_str()))
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extension_match_selects_file() {
        let sel = RenderSelection::from_args(&args(&["py"]), &[]);
        assert!(sel.should_render("models.py"));
        assert!(!sel.should_render("notes.txt"));
    }

    #[test]
    fn comma_separated_and_dotted_forms_normalize() {
        let a = RenderSelection::from_args(&args(&["rs,toml"]), &[]);
        let b = RenderSelection::from_args(&args(&[".rs", "toml"]), &[]);
        assert_eq!(a, b);
        assert_eq!(a.extensions(), &[".rs".to_string(), ".toml".to_string()]);
    }

    #[test]
    fn explicit_filename_wins_without_extension_match() {
        let sel = RenderSelection::from_args(&[], &args(&["Makefile"]));
        assert!(sel.should_render("Makefile"));
        assert!(!sel.should_render("makefile"));
    }

    #[test]
    fn duplicates_collapse() {
        let sel = RenderSelection::from_args(&args(&["py", ".py", "py,py"]), &[]);
        assert_eq!(sel.extensions().len(), 1);
    }

    #[test]
    fn empty_selection_renders_nothing() {
        let sel = RenderSelection::default();
        assert!(!sel.should_render("main.rs"));
    }

    #[test]
    fn compound_extension_is_a_suffix_match() {
        // ".py" also matches "x.tmpl.py" — suffix semantics, by construction.
        let sel = RenderSelection::from_args(&args(&["py"]), &[]);
        assert!(sel.should_render("x.tmpl.py"));
    }
}
