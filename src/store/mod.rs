// tabletranslator/src/store/mod.rs
pub(crate) mod mysql;
#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::fmt;

use crate::errors::Result;
use crate::sync::locale::Language;

/// A single cell value read from, or written to, a translation table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Null and whitespace-only text both count as "nothing there".
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Int(_) | Value::Timestamp(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Text(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "{}", hex::encode(b)),
            Value::Int(i) => write!(f, "{}", i),
            Value::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Column name to value, as returned by [`RowStore::select`].
pub type Row = HashMap<String, Value>;

/// Column name and declared SQL type, as reported by the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Columns in declared order.
    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;
}

#[async_trait]
pub trait RowStore: Send + Sync {
    /// Rows of `table` whose `language_id` equals `language_id`, projected onto `columns`.
    async fn select(
        &self,
        table: &str,
        columns: &[ColumnInfo],
        language_id: &Value,
    ) -> Result<Vec<Row>>;

    /// Returns the number of affected rows.
    async fn update(
        &self,
        table: &str,
        values: &[(String, Value)],
        criteria: &[(String, Value)],
    ) -> Result<u64>;

    /// Returns the number of affected rows.
    async fn insert(&self, table: &str, values: &[(String, Value)]) -> Result<u64>;
}

#[async_trait]
pub trait LanguageDirectory: Send + Sync {
    async fn find_language(&self, locale_code: &str) -> Result<Option<Language>>;
}

/// Everything the translation run needs from the database.
pub trait TranslationStore: SchemaIntrospector + RowStore + LanguageDirectory {}

impl<T> TranslationStore for T where T: SchemaIntrospector + RowStore + LanguageDirectory {}
