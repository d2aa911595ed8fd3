// tabletranslator/src/sync/differ.rs
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use super::locale::LanguagePair;
use super::schema::TableSchema;
use crate::errors::Result;
use crate::store::{Row, RowStore, Value};

/// Identity of the owning entity of a translation row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey(Vec<Value>);

impl RowKey {
    /// `None` when any key column is missing or null.
    pub fn from_row(schema: &TableSchema, row: &Row) -> Option<Self> {
        schema
            .key_columns()
            .into_iter()
            .map(|column| row.get(column).filter(|v| **v != Value::Null).cloned())
            .collect::<Option<Vec<_>>>()
            .map(RowKey)
    }

    /// Key columns paired with their values, in key order.
    pub fn criteria(&self, schema: &TableSchema) -> Vec<(String, Value)> {
        schema
            .key_columns()
            .into_iter()
            .map(str::to_string)
            .zip(self.0.iter().cloned())
            .collect()
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// Source rows of one table plus the already existing target rows, keyed by owner.
#[derive(Debug, Default)]
pub struct RowSnapshot {
    pub source_rows: Vec<(RowKey, Row)>,
    pub dest_rows: HashMap<RowKey, Row>,
}

impl RowSnapshot {
    pub fn existing(&self, key: &RowKey) -> Option<&Row> {
        self.dest_rows.get(key)
    }

    /// Existing non-blank target text for `column`, if any.
    pub fn existing_text(&self, key: &RowKey, column: &str) -> Option<&Value> {
        self.existing(key)
            .and_then(|row| row.get(column))
            .filter(|value| !value.is_blank())
    }
}

/// Reads the source and target rows of a table once, for one pass.
pub async fn load_rows(
    store: &dyn RowStore,
    schema: &TableSchema,
    languages: &LanguagePair,
) -> Result<RowSnapshot> {
    let projection = schema.projection();

    let mut source_rows = Vec::new();
    for row in store
        .select(&schema.table, &projection, &languages.source.id)
        .await?
    {
        match RowKey::from_row(schema, &row) {
            Some(key) => source_rows.push((key, row)),
            None => warn!(
                table = %schema.table,
                "Source row without {} value --> SKIP",
                schema.parent_reference()
            ),
        }
    }

    let mut dest_rows = HashMap::new();
    for row in store
        .select(&schema.table, &projection, &languages.target.id)
        .await?
    {
        if let Some(key) = RowKey::from_row(schema, &row) {
            dest_rows.insert(key, row);
        }
    }

    debug!(
        table = %schema.table,
        "Loaded {} source rows and {} existing {} rows",
        source_rows.len(),
        dest_rows.len(),
        languages.target.locale_code
    );
    Ok(RowSnapshot {
        source_rows,
        dest_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryStore, english, german};
    use crate::store::SchemaIntrospector;

    fn pair() -> LanguagePair {
        LanguagePair {
            source: german(),
            target: english(),
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_table(
            "state_machine_state_translation",
            &[
                ("state_machine_state_id", "int"),
                ("language_id", "binary"),
                ("name", "varchar"),
                ("custom_fields", "json"),
            ],
        )
    }

    #[tokio::test]
    async fn test_load_rows_keys_by_parent_reference() -> anyhow::Result<()> {
        let store = store();
        let table = "state_machine_state_translation";
        store.push_row(
            table,
            vec![
                ("state_machine_state_id", Value::Int(42)),
                ("language_id", german().id),
                ("name", "Offen".into()),
            ],
        );
        store.push_row(
            table,
            vec![
                ("state_machine_state_id", Value::Int(43)),
                ("language_id", german().id),
                ("name", "Storniert".into()),
            ],
        );
        store.push_row(
            table,
            vec![
                ("state_machine_state_id", Value::Int(43)),
                ("language_id", english().id),
                ("name", "Cancelled".into()),
            ],
        );

        let columns = store.list_columns(table).await?;
        let schema = TableSchema::new(table, columns)?;
        let snapshot = load_rows(&store, &schema, &pair()).await?;

        assert_eq!(snapshot.source_rows.len(), 2);
        assert_eq!(snapshot.dest_rows.len(), 1);

        let open = RowKey(vec![Value::Int(42)]);
        let cancelled = RowKey(vec![Value::Int(43)]);
        assert!(snapshot.existing(&open).is_none());
        assert_eq!(
            snapshot.existing_text(&cancelled, "name"),
            Some(&Value::from("Cancelled"))
        );
        // json columns are not read
        assert!(!snapshot.source_rows[0].1.contains_key("custom_fields"));
        Ok(())
    }

    #[tokio::test]
    async fn test_rows_without_parent_reference_are_skipped() -> anyhow::Result<()> {
        let store = store();
        let table = "state_machine_state_translation";
        store.push_row(
            table,
            vec![
                ("state_machine_state_id", Value::Null),
                ("language_id", german().id),
                ("name", "Offen".into()),
            ],
        );

        let schema = TableSchema::new(table, store.list_columns(table).await?)?;
        let snapshot = load_rows(&store, &schema, &pair()).await?;
        assert!(snapshot.source_rows.is_empty());
        Ok(())
    }

    #[test]
    fn test_blank_existing_text_is_not_a_translation() -> anyhow::Result<()> {
        let mut snapshot = RowSnapshot::default();
        let key = RowKey(vec![Value::Int(1)]);
        let row: Row = [("name".to_string(), Value::from("  "))].into_iter().collect();
        snapshot.dest_rows.insert(key.clone(), row);

        assert!(snapshot.existing(&key).is_some());
        assert_eq!(snapshot.existing_text(&key, "name"), None);
        assert_eq!(snapshot.existing_text(&key, "description"), None);
        Ok(())
    }

    #[test]
    fn test_row_key_criteria_and_display() -> anyhow::Result<()> {
        let schema = TableSchema::new(
            "product_translation",
            vec![
                crate::store::ColumnInfo::new("product_id", "binary"),
                crate::store::ColumnInfo::new("product_version_id", "binary"),
                crate::store::ColumnInfo::new("language_id", "binary"),
            ],
        )?;
        let row: Row = [
            ("product_id".to_string(), Value::Bytes(vec![0x01, 0x02])),
            ("product_version_id".to_string(), Value::Bytes(vec![0x0f])),
        ]
        .into_iter()
        .collect();

        let key = RowKey::from_row(&schema, &row).expect("key");
        assert_eq!(key.to_string(), "0102/0f");
        assert_eq!(
            key.criteria(&schema),
            vec![
                ("product_id".to_string(), Value::Bytes(vec![0x01, 0x02])),
                ("product_version_id".to_string(), Value::Bytes(vec![0x0f])),
            ]
        );
        Ok(())
    }
}
