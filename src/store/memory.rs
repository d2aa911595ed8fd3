// In-memory store used by the synchronization tests.
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ColumnInfo, LanguageDirectory, Row, RowStore, SchemaIntrospector, Value};
use crate::errors::{AppError, Result};
use crate::sync::locale::Language;

pub fn german() -> Language {
    Language {
        id: Value::Bytes(vec![0xde; 16]),
        locale_code: "de-DE".to_string(),
        name: "Deutsch".to_string(),
    }
}

pub fn english() -> Language {
    Language {
        id: Value::Bytes(vec![0xe0; 16]),
        locale_code: "en-GB".to_string(),
        name: "English".to_string(),
    }
}

#[derive(Default)]
struct MemoryTable {
    columns: Vec<ColumnInfo>,
    rows: Vec<Row>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<String, MemoryTable>>,
    languages: Vec<Language>,
    rejected_inserts: HashSet<String>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.languages.push(language);
        self
    }

    pub fn with_table(self, table: &str, columns: &[(&str, &str)]) -> Self {
        self.tables.lock().unwrap().insert(
            table.to_string(),
            MemoryTable {
                columns: columns
                    .iter()
                    .map(|(name, data_type)| ColumnInfo::new(*name, *data_type))
                    .collect(),
                rows: Vec::new(),
            },
        );
        self
    }

    /// Inserts of `table` report zero affected rows.
    pub fn rejecting_inserts(mut self, table: &str) -> Self {
        self.rejected_inserts.insert(table.to_string());
        self
    }

    pub fn push_row(&self, table: &str, row: Vec<(&str, Value)>) {
        let mut tables = self.tables.lock().unwrap();
        let entry = tables.get_mut(table).expect("unknown table");
        entry
            .rows
            .push(row.into_iter().map(|(k, v)| (k.to_string(), v)).collect());
    }

    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables.lock().unwrap()[table].rows.clone()
    }

    /// Rows of `table` whose `language_id` is `language`.
    pub fn rows_for(&self, table: &str, language: &Language) -> Vec<Row> {
        self.rows(table)
            .into_iter()
            .filter(|row| row.get("language_id") == Some(&language.id))
            .collect()
    }

    /// Number of successful updates and inserts so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

fn matches(row: &Row, criteria: &[(String, Value)]) -> bool {
    criteria
        .iter()
        .all(|(column, value)| row.get(column) == Some(value))
}

#[async_trait]
impl SchemaIntrospector for MemoryStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.lock().unwrap().keys().cloned().collect())
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|t| t.columns.clone())
            .ok_or_else(|| AppError::InvalidSelection(format!("no such table {}", table)))
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(
        &self,
        table: &str,
        columns: &[ColumnInfo],
        language_id: &Value,
    ) -> Result<Vec<Row>> {
        let tables = self.tables.lock().unwrap();
        let Some(entry) = tables.get(table) else {
            return Ok(Vec::new());
        };
        Ok(entry
            .rows
            .iter()
            .filter(|row| row.get("language_id") == Some(language_id))
            .map(|row| {
                columns
                    .iter()
                    .map(|c| {
                        let value = row.get(&c.name).cloned().unwrap_or(Value::Null);
                        (c.name.clone(), value)
                    })
                    .collect()
            })
            .collect())
    }

    async fn update(
        &self,
        table: &str,
        values: &[(String, Value)],
        criteria: &[(String, Value)],
    ) -> Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let Some(entry) = tables.get_mut(table) else {
            return Ok(0);
        };
        let mut affected = 0;
        for row in entry.rows.iter_mut().filter(|row| matches(row, criteria)) {
            for (column, value) in values {
                row.insert(column.clone(), value.clone());
            }
            affected += 1;
        }
        if affected > 0 {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(affected)
    }

    async fn insert(&self, table: &str, values: &[(String, Value)]) -> Result<u64> {
        if self.rejected_inserts.contains(table) {
            return Ok(0);
        }
        let mut tables = self.tables.lock().unwrap();
        let Some(entry) = tables.get_mut(table) else {
            return Ok(0);
        };
        entry.rows.push(values.iter().cloned().collect());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(1)
    }
}

#[async_trait]
impl LanguageDirectory for MemoryStore {
    async fn find_language(&self, locale_code: &str) -> Result<Option<Language>> {
        Ok(self
            .languages
            .iter()
            .find(|l| l.locale_code.eq_ignore_ascii_case(locale_code))
            .cloned())
    }
}
