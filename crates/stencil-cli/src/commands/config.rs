//! `stencil config` — read and write configuration values.

use std::path::PathBuf;

use crate::{
    cli::{ConfigCommands, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::Set { key, value } => {
            let path = global
                .config
                .clone()
                .unwrap_or_else(AppConfig::config_path);
            set_config_value(&path, &config, &key, &value)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            if output.format() == OutputFormat::Json {
                let serialised =
                    serde_json::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.print(&serialised)?;
            } else {
                output.header("Current Configuration:")?;
                let serialised =
                    toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.print(&serialised)?;
            }
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "defaults.template" => Ok(config
            .defaults
            .template
            .clone()
            .unwrap_or_else(|| "<built-in>".into())),
        "defaults.extensions" => Ok(config.defaults.extensions.join(",")),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        "network.timeout_secs" => Ok(config.network.timeout_secs.to_string()),
        _ => Err(unknown_key(key)),
    }
}

/// Apply one `set` to the config and persist it as TOML.
fn set_config_value(path: &PathBuf, config: &AppConfig, key: &str, value: &str) -> CliResult<()> {
    let mut updated = config.clone();
    match key {
        "defaults.template" => {
            updated.defaults.template = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
        "defaults.extensions" => {
            updated.defaults.extensions = value
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        "output.no_color" => {
            updated.output.no_color = parse_bool(key, value)?;
        }
        "output.format" => {
            updated.output.format = value.to_string();
        }
        "network.timeout_secs" => {
            updated.network.timeout_secs =
                value.parse().map_err(|_| CliError::ConfigError {
                    message: format!("'{value}' is not a number of seconds"),
                    source: None,
                })?;
        }
        _ => return Err(unknown_key(key)),
    }

    let serialised = toml::to_string_pretty(&updated).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serialised)?;
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> CliResult<bool> {
    match value {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(CliError::ConfigError {
            message: format!("'{value}' is not a boolean for '{key}'"),
            source: None,
        }),
    }
}

fn unknown_key(key: &str) -> CliError {
    CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
