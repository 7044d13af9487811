//! Implementation of the `stencil new` command.
//!
//! Responsibility: translate CLI arguments into a `GenerateRequest`, call
//! the core generate service, and display results. No resolution or
//! rendering logic lives here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::ProgressBar;
use tracing::{debug, info, instrument, warn};

use stencil_adapters::{
    ArchiveUnpacker, JinjaRenderer, LocalFilesystem, UreqDownloader, builtin,
};
use stencil_core::{
    application::{
        GenerateReport, GenerateRequest, GenerateService, ResolverConfig, ports::Filesystem,
    },
    domain::{RenderContext, RenderSelection, validate_project_name, validate_variable_name},
};

use crate::{
    cli::{NewArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `stencil new` command.
///
/// Dispatch sequence:
/// 1. Parse and validate the project name / target path
/// 2. Parse `--var` bindings and build the render context
/// 3. Confirm with user unless `--yes` or `--quiet`
/// 4. Materialize the built-in template as the default source
/// 5. Execute generation via `GenerateService`
/// 6. Print next-steps guidance
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve project path and name
    let (project_name, target_dir) = resolve_project_path(&args.name)?;
    validate_project_name(&project_name).map_err(|e| CliError::Core(e.into()))?;

    let reference = args.template.clone().or(config.defaults.template.clone());

    // 2. Render selection + context
    let extensions = if args.extensions.is_empty() {
        config.defaults.extensions.clone()
    } else {
        args.extensions.clone()
    };
    let selection = RenderSelection::from_args(&extensions, &args.render_files);

    let mut context = RenderContext::new(&project_name);
    for spec in &args.variables {
        let (key, value) = parse_variable(spec)?;
        context.set(key, value);
    }
    let absolute_target =
        std::path::absolute(&target_dir).map_err(|e| CliError::IoError {
            message: format!("cannot resolve target path '{}'", target_dir.display()),
            source: e,
        })?;
    context.set("project_directory", absolute_target.display().to_string());

    debug!(
        template = reference.as_deref().unwrap_or("<builtin>"),
        extensions = ?selection.extensions(),
        render_files = ?selection.filenames(),
        "request prepared"
    );

    // 3. Show configuration and confirm
    if !global.quiet && !args.yes {
        show_configuration(&reference, &selection, &project_name, &target_dir, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    // 4. Materialize the built-in skeleton as the default template source.
    //    It lives in a temp dir owned by this command, not by the resolver.
    let filesystem = LocalFilesystem::new();
    let builtin_dir = filesystem
        .create_temp_dir("stencil_template_", "_builtin")
        .map_err(CliError::Core)?;
    let result = generate(
        &config,
        &builtin_dir,
        reference.as_deref(),
        &target_dir,
        selection,
        context,
        &output,
    );

    // The built-in dir is ours to remove, success or failure.
    if let Err(e) = std::fs::remove_dir_all(&builtin_dir) {
        warn!(dir = %builtin_dir.display(), error = %e, "failed to remove built-in template dir");
        output.warning("Could not remove the temporary built-in template directory")?;
    }

    let report = result?;

    // 6. Success + next steps
    output.success(&format!("Project '{project_name}' created!"))?;
    if !global.quiet {
        output.info(&format!(
            "{} files written ({} rendered), {} directories",
            report.files_written, report.files_rendered, report.directories_created
        ))?;
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", target_dir.display()))?;
        output.print("  # Start building!")?;
    }

    Ok(())
}

/// Materialize the default template and run the generation service.
fn generate(
    config: &AppConfig,
    builtin_dir: &Path,
    reference: Option<&str>,
    target_dir: &Path,
    selection: RenderSelection,
    context: RenderContext,
    output: &OutputManager,
) -> CliResult<GenerateReport> {
    builtin::materialize(builtin_dir).map_err(CliError::Core)?;

    let service = GenerateService::new(
        Box::new(UreqDownloader::new(Duration::from_secs(
            config.network.timeout_secs,
        ))),
        Box::new(ArchiveUnpacker::new()),
        Box::new(JinjaRenderer::new()),
        Box::new(LocalFilesystem::new()),
    )
    .with_resolver_config(ResolverConfig {
        home_dir: dirs::home_dir(),
        temp_prefix: "stencil_template_".into(),
    });

    let request = GenerateRequest {
        target_dir: target_dir.to_path_buf(),
        reference: reference.map(str::to_string),
        default_template_dir: builtin_dir.to_path_buf(),
        selection,
        context,
    };

    info!(target = %target_dir.display(), "generation started");

    // A spinner for interactive runs; downloads can take a while.
    let interactive =
        output.format() == OutputFormat::Human && !output.is_quiet() && output.supports_color();
    let spinner = interactive.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_message(format!("Rendering into {}...", target_dir.display()));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });

    let result = service.generate(&request);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let report = result.map_err(CliError::Core)?;
    info!(
        files = report.files_written,
        rendered = report.files_rendered,
        "generation completed"
    );
    Ok(report)
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// Split the NAME argument into a project name and the target directory.
///
/// The whole argument is the target path; its last component is the name
/// templates see as `project_name`.
pub fn resolve_project_path(name: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("cannot extract a project name from '{name}'"),
            source: None,
        })?
        .to_string();

    Ok((project_name, path.to_path_buf()))
}

// ── Variable parsing ──────────────────────────────────────────────────────────

fn parse_variable(spec: &str) -> CliResult<(String, String)> {
    let Some((key, value)) = spec.split_once('=') else {
        return Err(CliError::InvalidVariable {
            spec: spec.to_string(),
            reason: "expected KEY=VALUE".into(),
        });
    };
    let key = key.trim();
    validate_variable_name(key).map_err(|e| CliError::InvalidVariable {
        spec: spec.to_string(),
        reason: e.to_string(),
    })?;
    Ok((key.to_string(), value.to_string()))
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    reference: &Option<String>,
    selection: &RenderSelection,
    name: &str,
    target_dir: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:   {name}"))?;
    out.print(&format!(
        "  Template:  {}",
        reference.as_deref().unwrap_or("<built-in skeleton>")
    ))?;
    out.print(&format!("  Render:    {}", selection.extensions().join(", ")))?;
    if !selection.filenames().is_empty() {
        out.print(&format!("  Files:     {}", selection.filenames().join(", ")))?;
    }
    out.print(&format!("  Location:  {}", target_dir.display()))?;
    out.print("")?;
    Ok(())
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── resolve_project_path ──────────────────────────────────────────────

    #[test]
    fn simple_name_resolves_to_relative_dir() {
        let (name, dir) = resolve_project_path("my-app").unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("my-app"));
    }

    #[test]
    fn relative_path_keeps_full_target() {
        let (name, dir) = resolve_project_path("../my-app").unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("../my-app"));
    }

    #[test]
    fn nested_path_keeps_leaf_as_name() {
        let (name, dir) = resolve_project_path("tmp/out/my-app").unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("tmp/out/my-app"));
    }

    // ── parse_variable ────────────────────────────────────────────────────

    #[test]
    fn key_value_pair_parses() {
        let (k, v) = parse_variable("author=Alice").unwrap();
        assert_eq!(k, "author");
        assert_eq!(v, "Alice");
    }

    #[test]
    fn value_may_contain_equals() {
        let (k, v) = parse_variable("motto=a=b").unwrap();
        assert_eq!(k, "motto");
        assert_eq!(v, "a=b");
    }

    #[test]
    fn empty_value_is_allowed() {
        let (k, v) = parse_variable("suffix=").unwrap();
        assert_eq!(k, "suffix");
        assert_eq!(v, "");
    }

    #[test]
    fn missing_equals_is_rejected() {
        assert!(matches!(
            parse_variable("author"),
            Err(CliError::InvalidVariable { .. })
        ));
    }

    #[test]
    fn invalid_key_is_rejected() {
        assert!(matches!(
            parse_variable("2fast=yes"),
            Err(CliError::InvalidVariable { .. })
        ));
        assert!(matches!(
            parse_variable("has space=yes"),
            Err(CliError::InvalidVariable { .. })
        ));
    }
}
