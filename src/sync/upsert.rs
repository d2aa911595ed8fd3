// tabletranslator/src/sync/upsert.rs
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use super::differ::RowKey;
use super::locale::Language;
use super::schema::{CREATED_AT_COLUMN, LANGUAGE_COLUMN, TableSchema, UPDATED_AT_COLUMN};
use crate::errors::{AppError, Result};
use crate::store::{RowStore, Value};

/// Translated column values collected for one source row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    values: Vec<(String, Value)>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str, text: String) {
        match self.values.iter_mut().find(|(c, _)| c == column) {
            Some((_, value)) => *value = Value::Text(text),
            None => self.values.push((column.to_string(), Value::Text(text))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn columns(&self) -> Vec<&str> {
        self.values.iter().map(|(c, _)| c.as_str()).collect()
    }

    /// Values to write, with `updated_at` stamped when the table has that column.
    fn stamped(&self, schema: &TableSchema, now: NaiveDateTime) -> Vec<(String, Value)> {
        let mut values = self.values.clone();
        if schema.has_column(UPDATED_AT_COLUMN) {
            values.push((UPDATED_AT_COLUMN.to_string(), Value::Timestamp(now)));
        }
        values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Updated,
    Inserted,
}

/// `{language_id = target, <parent reference> = key[, <version reference> = key]}`
pub fn match_criteria(schema: &TableSchema, key: &RowKey, target: &Language) -> Vec<(String, Value)> {
    let mut criteria = vec![(LANGUAGE_COLUMN.to_string(), target.id.clone())];
    criteria.extend(key.criteria(schema));
    criteria
}

/// Writes `updates` to the target row of `key`, inserting that row when it does not exist yet.
///
/// Any failure is returned as [`AppError::Persistence`] so the caller can report it and move on.
pub async fn upsert_row(
    store: &dyn RowStore,
    schema: &TableSchema,
    key: &RowKey,
    target: &Language,
    updates: &UpdateSet,
    now: NaiveDateTime,
) -> Result<UpsertOutcome> {
    let persistence_error = |reason: String| AppError::Persistence {
        table: schema.table.clone(),
        parent: key.to_string(),
        reason,
    };

    let criteria = match_criteria(schema, key, target);
    let values = updates.stamped(schema, now);
    debug!(
        table = %schema.table,
        parent = %key,
        "Updates: {}",
        values
            .iter()
            .map(|(c, v)| format!("{}={}", c, v))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let updated = store
        .update(&schema.table, &values, &criteria)
        .await
        .map_err(|e| persistence_error(format!("update failed: {}", e)))?;
    if updated > 0 {
        info!(table = %schema.table, parent = %key, "✓ Updated {} column(s)", updates.len());
        return Ok(UpsertOutcome::Updated);
    }

    warn!(
        table = %schema.table,
        parent = %key,
        "No {} row to update ... inserting instead",
        target.locale_code
    );
    let mut row = criteria;
    row.extend(values);
    if schema.has_column(CREATED_AT_COLUMN) {
        row.push((CREATED_AT_COLUMN.to_string(), Value::Timestamp(now)));
    }

    let inserted = store
        .insert(&schema.table, &row)
        .await
        .map_err(|e| persistence_error(format!("insert failed: {}", e)))?;
    if inserted == 0 {
        return Err(persistence_error("insert affected 0 rows".to_string()));
    }

    info!(table = %schema.table, parent = %key, "✓ Inserted {} row", target.locale_code);
    Ok(UpsertOutcome::Inserted)
}
