// tabletranslator/src/sync/schema.rs
//! Naming rules for translation tables and the per-table schema descriptor.
//!
//! A translation table is named `<entity>_translation` and points back to its
//! owning entity through `<entity>_id`. Versioned entities additionally carry
//! `<entity>_version_id`, which is part of the row identity.

use tracing::debug;

use crate::errors::{AppError, Result};
use crate::store::{ColumnInfo, SchemaIntrospector};

pub const TRANSLATION_SUFFIX: &str = "_translation";
pub const LANGUAGE_COLUMN: &str = "language_id";
pub const CREATED_AT_COLUMN: &str = "created_at";
pub const UPDATED_AT_COLUMN: &str = "updated_at";

const TEXTUAL_TYPES: &[&str] = &["char", "varchar", "tinytext", "text", "mediumtext", "longtext"];

pub fn is_translation_table(table: &str) -> bool {
    table.len() > TRANSLATION_SUFFIX.len() && table.ends_with(TRANSLATION_SUFFIX)
}

/// `<entity>_translation` -> `<entity>`
pub fn entity_name(table: &str) -> Result<&str> {
    if !is_translation_table(table) {
        return Err(AppError::InvalidTableName(table.to_string()));
    }
    Ok(&table[..table.len() - TRANSLATION_SUFFIX.len()])
}

/// `<entity>_translation` -> `<entity>_id`
pub fn parent_reference_column(table: &str) -> Result<String> {
    Ok(format!("{}_id", entity_name(table)?))
}

/// `<entity>_translation` -> `<entity>_version_id`
pub fn version_reference_column(table: &str) -> Result<String> {
    Ok(format!("{}_version_id", entity_name(table)?))
}

pub fn is_textual_type(data_type: &str) -> bool {
    let data_type = data_type.to_ascii_lowercase();
    TEXTUAL_TYPES.contains(&data_type.as_str())
}

/// A column is translatable iff it is textual and not an identifier, reference or config column.
pub fn is_translatable_column(column: &ColumnInfo) -> bool {
    is_textual_type(&column.data_type)
        && column.name != "id"
        && !column.name.ends_with("_id")
        && !column.name.ends_with("_config")
}

/// Column layout of one translation table, read once per run.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
    parent_reference: String,
    version_reference: Option<String>,
}

impl TableSchema {
    pub fn new(table: &str, columns: Vec<ColumnInfo>) -> Result<Self> {
        let parent_reference = parent_reference_column(table)?;
        if !columns.iter().any(|c| c.name == parent_reference) {
            return Err(AppError::InvalidSelection(format!(
                "table {} has no parent reference column {}",
                table, parent_reference
            )));
        }
        if !columns.iter().any(|c| c.name == LANGUAGE_COLUMN) {
            return Err(AppError::InvalidSelection(format!(
                "table {} has no {} column",
                table, LANGUAGE_COLUMN
            )));
        }

        let version_column = version_reference_column(table)?;
        let version_reference = columns
            .iter()
            .any(|c| c.name == version_column)
            .then_some(version_column);

        Ok(Self {
            table: table.to_string(),
            columns,
            parent_reference,
            version_reference,
        })
    }

    pub async fn load(introspector: &dyn SchemaIntrospector, table: &str) -> Result<Self> {
        // fail on the name before touching the database
        entity_name(table)?;
        let columns = introspector.list_columns(table).await?;
        let schema = Self::new(table, columns)?;
        debug!(
            "Table {} has {} columns, parent reference {}, version reference {}",
            table,
            schema.columns.len(),
            schema.parent_reference(),
            schema.version_reference().unwrap_or("-")
        );
        Ok(schema)
    }

    pub fn parent_reference(&self) -> &str {
        &self.parent_reference
    }

    pub fn version_reference(&self) -> Option<&str> {
        self.version_reference.as_deref()
    }

    /// Columns identifying the owning entity: parent reference, then version reference if any.
    pub fn key_columns(&self) -> Vec<&str> {
        std::iter::once(self.parent_reference.as_str())
            .chain(self.version_reference.as_deref())
            .collect()
    }

    /// Translatable columns in declared order.
    pub fn text_columns(&self) -> Vec<&ColumnInfo> {
        self.columns
            .iter()
            .filter(|c| is_translatable_column(c))
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Key columns followed by text columns; what the row differ needs to read.
    pub fn projection(&self) -> Vec<ColumnInfo> {
        let keys = self.key_columns();
        self.columns
            .iter()
            .filter(|c| keys.contains(&c.name.as_str()))
            .chain(self.text_columns())
            .cloned()
            .collect()
    }
}
