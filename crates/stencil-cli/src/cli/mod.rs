//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f5c2} Render project templates into new directories",
    long_about = "Stencil copies a template directory tree into a new project \
                  directory, substituting variables into selected files. \
                  Templates can be local directories, local archives, or \
                  archives fetched over http/https.",
    after_help = "EXAMPLES:\n\
        \x20 stencil new myapp\n\
        \x20 stencil new myapp --template ~/templates/service\n\
        \x20 stencil new blog  --template https://example.com/tpl.tar.gz --var author=Alice\n\
        \x20 stencil completions bash > /usr/share/bash-completion/completions/stencil",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render a template into a new project directory.
    #[command(
        visible_alias = "n",
        about = "Create a new project from a template",
        after_help = "EXAMPLES:\n\
            \x20 stencil new myapp\n\
            \x20 stencil new ../sites/blog --template ~/templates/web-site\n\
            \x20 stencil new svc --template https://example.com/svc.tar.gz -e rs,toml\n\
            \x20 stencil new app --template ./tpl.zip --var name=app --var author=Alice"
    )]
    New(NewArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stencil completions bash > ~/.local/share/bash-completion/completions/stencil\n\
            \x20 stencil completions zsh  > ~/.zfunc/_stencil\n\
            \x20 stencil completions fish > ~/.config/fish/completions/stencil.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the Stencil configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stencil config get defaults.extensions\n\
            \x20 stencil config set defaults.template ~/templates/default\n\
            \x20 stencil config list"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `stencil new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name or path.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.  The last component is the
    /// project name available to templates as `{{ project_name }}`.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Where the template comes from.
    ///
    /// A directory, a `file://` path, a local archive (`.zip`, `.tar`,
    /// `.tar.gz`, `.tar.bz2`), or an http/https URL to such an archive.
    /// Omitted: the built-in Rust skeleton.
    #[arg(
        short = 't',
        long = "template",
        value_name = "REF",
        help = "Template directory, archive, or URL"
    )]
    pub template: Option<String>,

    /// File extensions to render (repeatable, comma-separable).
    #[arg(
        short = 'e',
        long = "extension",
        value_name = "EXT",
        action = clap::ArgAction::Append,
        help = "Render files with these extensions (default: rs,toml,md)"
    )]
    pub extensions: Vec<String>,

    /// Exact filenames to render regardless of extension (repeatable).
    #[arg(
        short = 'n',
        long = "render-file",
        value_name = "FILE",
        action = clap::ArgAction::Append,
        help = "Render files with these exact names"
    )]
    pub render_files: Vec<String>,

    /// Extra template variables as KEY=VALUE (repeatable).
    #[arg(
        long = "var",
        value_name = "KEY=VALUE",
        action = clap::ArgAction::Append,
        help = "Define a template variable"
    )]
    pub variables: Vec<String>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stencil completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stencil config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.extensions`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
