//! Input validation shared by every driving adapter.

use crate::domain::error::DomainError;

/// Validate a project name.
///
/// The name becomes both a directory name and the `project_name` template
/// variable, so it must be a single path component and must not be hidden.
pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(invalid_name(name, "name cannot be empty"));
    }
    if name.starts_with('.') {
        return Err(invalid_name(name, "name cannot start with '.'"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid_name(name, "name cannot contain path separators"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid_name(
            name,
            "use alphanumeric characters, hyphens, and underscores",
        ));
    }
    Ok(())
}

/// Validate a user-supplied template variable name.
///
/// Variables must be usable as identifiers inside the template engine.
pub fn validate_variable_name(name: &str) -> Result<(), DomainError> {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if starts_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(DomainError::InvalidVariableName {
            name: name.to_string(),
            reason: "must start with a letter or '_' and contain only letters, digits, and '_'"
                .to_string(),
        })
    }
}

fn invalid_name(name: &str, reason: &str) -> DomainError {
    DomainError::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
