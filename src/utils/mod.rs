pub mod setting;

use anyhow::Context;
use std::path::PathBuf;
use which::which;

use crate::errors::{AppError, Result};

/// Finds an executable in the system PATH.
pub fn find_executable(name: &str) -> anyhow::Result<PathBuf> {
    which(name).with_context(|| {
        format!(
            "{} executable not found in PATH. Please ensure the MySQL client tools are installed and in your PATH.",
            name
        )
    })
}

/// Checks that a table or column name is safe to splice into SQL.
pub fn validate_identifier(name: &str) -> Result<&str> {
    if name.is_empty() || name.contains(|c: char| !c.is_ascii_alphanumeric() && c != '_') {
        return Err(AppError::InvalidIdentifier(name.to_string()));
    }
    Ok(name)
}

/// Backtick-quotes a validated identifier.
pub fn quote_identifier(name: &str) -> Result<String> {
    Ok(format!("`{}`", validate_identifier(name)?))
}
