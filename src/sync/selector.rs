// tabletranslator/src/sync/selector.rs
use std::io::{BufRead, Write};
use tracing::{info, warn};

use super::schema::is_translation_table;
use crate::errors::{AppError, Result};
use crate::store::SchemaIntrospector;

/// Acknowledgement step before processing every translation table of the database.
pub trait Confirm {
    fn confirm(&self, tables: &[String]) -> Result<bool>;
}

/// Asks on stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, tables: &[String]) -> Result<bool> {
        println!("The following {} tables will be translated:", tables.len());
        for table in tables {
            println!("  - {}", table);
        }
        print!("Proceed with {} tables? [y/N]: ", tables.len());
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().lock().read_line(&mut input)?;
        Ok(is_yes(&input))
    }
}

/// Non-interactive runs (`--yes`).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _tables: &[String]) -> Result<bool> {
        Ok(true)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Returns the translation tables to process.
///
/// An explicit list is filtered down to existing `*_translation` tables, dropped names
/// are reported. Without a list every translation table is selected, subject to `confirm`.
pub async fn select_tables(
    introspector: &dyn SchemaIntrospector,
    requested: &[String],
    confirm: &dyn Confirm,
) -> Result<Vec<String>> {
    let available = introspector.list_tables().await?;

    if !requested.is_empty() {
        let mut selected = Vec::new();
        for name in requested.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            if !is_translation_table(name) {
                warn!("⚠️ Skipping {}: not a translation table", name);
            } else if !available.iter().any(|t| t == name) {
                warn!("⚠️ Skipping {}: no such table in database", name);
            } else if !selected.iter().any(|t: &String| t == name) {
                selected.push(name.to_string());
            }
        }
        if selected.is_empty() {
            return Err(AppError::InvalidSelection(format!(
                "none of the requested tables is a translation table: {}",
                requested.join(", ")
            )));
        }
        info!("Selected {} of {} requested tables", selected.len(), requested.len());
        return Ok(selected);
    }

    let all: Vec<String> = available
        .into_iter()
        .filter(|t| is_translation_table(t))
        .collect();
    if all.is_empty() {
        return Err(AppError::InvalidSelection(
            "database contains no translation tables".to_string(),
        ));
    }

    if !confirm.confirm(&all)? {
        return Err(AppError::Cancelled(format!(
            "translation of {} tables not confirmed",
            all.len()
        )));
    }
    info!("Selected all {} translation tables", all.len());
    Ok(all)
}
