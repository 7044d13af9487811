//! The default template shipped with Stencil.
//!
//! A minimal Rust binary skeleton, embedded in the binary and materialized
//! into a directory on demand. Placeholders use the same `{{ variable }}`
//! syntax as any user-supplied template; the CLI's default render selection
//! (`rs`, `toml`, `md`) covers every file here that carries one.

use std::path::Path;

use tracing::debug;

use crate::filesystem::local::map_io_error;
use stencil_core::error::StencilResult;

const SKELETON: &[(&str, &str)] = &[
    (
        "Cargo.toml",
        r#"[package]
name = "{{ project_name }}"
version = "0.1.0"
edition = "2021"

[dependencies]
"#,
    ),
    (
        "src/main.rs",
        r#"fn main() {
    println!("Hello from {{ project_name }}!");
}
"#,
    ),
    (
        "README.md",
        r#"# {{ project_name }}

Generated with stencil.

## Build

```sh
cargo build
```
"#,
    ),
    (".gitignore", "/target\n"),
];

/// Write the embedded skeleton into `dir`, creating parents as needed.
///
/// The directory itself is owned by the caller; this only populates it.
pub fn materialize(dir: &Path) -> StencilResult<()> {
    debug!(dir = %dir.display(), "materializing built-in template");
    for (relative, contents) in SKELETON {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        std::fs::write(&path, contents).map_err(|e| map_io_error(&path, e, "write file"))?;
    }
    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materialize_writes_the_whole_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        materialize(dir.path()).unwrap();

        assert!(dir.path().join("Cargo.toml").exists());
        assert!(dir.path().join("src/main.rs").exists());
        assert!(dir.path().join("README.md").exists());
        assert!(dir.path().join(".gitignore").exists());
    }

    #[test]
    fn skeleton_files_carry_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        materialize(dir.path()).unwrap();

        let manifest = std::fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
        assert!(manifest.contains("{{ project_name }}"));
    }
}
