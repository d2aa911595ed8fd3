// tabletranslator/src/store/mysql.rs
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::Row as _;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::debug;

use super::{ColumnInfo, LanguageDirectory, Row, RowStore, SchemaIntrospector, Value};
use crate::errors::{AppError, Result};
use crate::sync::locale::Language;
use crate::sync::schema::is_textual_type;
use crate::utils::quote_identifier;
use crate::utils::setting::check_db_connection;

/// sqlx-backed store for a MySQL/MariaDB shop database.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Opens a single-connection pool; the whole run shares that one connection.
    pub async fn connect(db_url: &str, db_label: &str) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect(db_url)
            .await?;

        if !check_db_connection(&pool, db_label).await {
            return Err(AppError::Config(format!(
                "Database {} is not reachable",
                db_label
            )));
        }
        Ok(Self { pool })
    }
}

#[async_trait]
impl SchemaIntrospector for MySqlStore {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT CAST(TABLE_NAME AS CHAR) AS table_name
             FROM information_schema.TABLES
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE'
             ORDER BY TABLE_NAME",
        )
        .fetch_all(&self.pool)
        .await?;

        let tables = rows
            .iter()
            .map(|row| row.try_get::<String, _>("table_name"))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!("Found {} tables in current database", tables.len());
        Ok(tables)
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let rows = sqlx::query(
            "SELECT CAST(COLUMN_NAME AS CHAR) AS column_name, CAST(DATA_TYPE AS CHAR) AS data_type
             FROM information_schema.COLUMNS
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
             ORDER BY ORDINAL_POSITION",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<ColumnInfo> {
                Ok(ColumnInfo::new(
                    row.try_get::<String, _>("column_name")?,
                    row.try_get::<String, _>("data_type")?,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl RowStore for MySqlStore {
    async fn select(
        &self,
        table: &str,
        columns: &[ColumnInfo],
        language_id: &Value,
    ) -> Result<Vec<Row>> {
        let mut builder = select_query(table, columns, language_id)?;
        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| -> Result<(String, Value)> {
                        Ok((column.name.clone(), decode_column(row, column)?))
                    })
                    .collect::<Result<Row>>()
            })
            .collect()
    }

    async fn update(
        &self,
        table: &str,
        values: &[(String, Value)],
        criteria: &[(String, Value)],
    ) -> Result<u64> {
        let mut builder = update_query(table, values, criteria)?;
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn insert(&self, table: &str, values: &[(String, Value)]) -> Result<u64> {
        let mut builder = insert_query(table, values)?;
        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl LanguageDirectory for MySqlStore {
    async fn find_language(&self, locale_code: &str) -> Result<Option<Language>> {
        let row = sqlx::query(
            "SELECT language.id AS id,
                    CAST(locale.code AS CHAR) AS code,
                    CAST(language.name AS CHAR) AS name
             FROM language
             INNER JOIN locale ON locale.id = language.translation_code_id
             WHERE LOWER(locale.code) = LOWER(?)
             LIMIT 1",
        )
        .bind(locale_code)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id = if let Ok(bytes) = row.try_get::<Vec<u8>, _>("id") {
            Value::Bytes(bytes)
        } else {
            Value::Int(row.try_get::<i64, _>("id")?)
        };

        Ok(Some(Language {
            id,
            locale_code: row.try_get("code")?,
            name: row.try_get("name")?,
        }))
    }
}

fn select_query(
    table: &str,
    columns: &[ColumnInfo],
    language_id: &Value,
) -> Result<QueryBuilder<'static, MySql>> {
    let projection = columns
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect::<Result<Vec<_>>>()?
        .join(", ");

    let mut builder = QueryBuilder::new("SELECT ");
    builder
        .push(projection)
        .push(" FROM ")
        .push(quote_identifier(table)?)
        .push(" WHERE `language_id` = ");
    push_value(&mut builder, language_id);
    Ok(builder)
}

fn update_query(
    table: &str,
    values: &[(String, Value)],
    criteria: &[(String, Value)],
) -> Result<QueryBuilder<'static, MySql>> {
    if values.is_empty() || criteria.is_empty() {
        return Err(AppError::InvalidSelection(format!(
            "update of {} needs at least one value and one criterion",
            table
        )));
    }

    let mut builder = QueryBuilder::new("UPDATE ");
    builder.push(quote_identifier(table)?).push(" SET ");
    push_assignments(&mut builder, values, ", ")?;
    builder.push(" WHERE ");
    push_assignments(&mut builder, criteria, " AND ")?;
    Ok(builder)
}

fn insert_query(table: &str, values: &[(String, Value)]) -> Result<QueryBuilder<'static, MySql>> {
    let columns = values
        .iter()
        .map(|(column, _)| quote_identifier(column))
        .collect::<Result<Vec<_>>>()?
        .join(", ");

    let mut builder = QueryBuilder::new("INSERT INTO ");
    builder
        .push(quote_identifier(table)?)
        .push(" (")
        .push(columns)
        .push(") VALUES (");
    for (i, (_, value)) in values.iter().enumerate() {
        if i > 0 {
            builder.push(", ");
        }
        push_value(&mut builder, value);
    }
    builder.push(")");
    Ok(builder)
}

/// `a = ?<sep>b = ?...`
fn push_assignments(
    builder: &mut QueryBuilder<'static, MySql>,
    pairs: &[(String, Value)],
    separator: &str,
) -> Result<()> {
    for (i, (column, value)) in pairs.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        builder.push(quote_identifier(column)?).push(" = ");
        push_value(builder, value);
    }
    Ok(())
}

fn push_value(builder: &mut QueryBuilder<'static, MySql>, value: &Value) {
    match value {
        Value::Null => {
            builder.push_bind(None::<String>);
        }
        Value::Text(s) => {
            builder.push_bind(s.clone());
        }
        Value::Bytes(b) => {
            builder.push_bind(b.clone());
        }
        Value::Int(i) => {
            builder.push_bind(*i);
        }
        Value::Timestamp(ts) => {
            builder.push_bind(*ts);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Bytes,
    Integer,
    Timestamp,
    Other,
}

fn column_kind(data_type: &str) -> ColumnKind {
    let data_type = data_type.to_ascii_lowercase();
    match data_type.as_str() {
        t if is_textual_type(t) || t == "enum" || t == "set" => ColumnKind::Text,
        "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => ColumnKind::Bytes,
        "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint" => ColumnKind::Integer,
        "datetime" | "timestamp" => ColumnKind::Timestamp,
        _ => ColumnKind::Other,
    }
}

fn unsigned_value(column: &str, value: u64) -> Result<Value> {
    i64::try_from(value).map(Value::Int).map_err(|_| {
        AppError::InvalidSelection(format!(
            "value {} of unsigned column {} does not fit a signed 64-bit integer",
            value, column
        ))
    })
}

/// Decodes one projected column, driven by its declared type.
fn decode_column(row: &MySqlRow, column: &ColumnInfo) -> Result<Value> {
    let name = column.name.as_str();

    let value = match column_kind(&column.data_type) {
        ColumnKind::Text => row.try_get::<Option<String>, _>(name)?.map(Value::Text),
        ColumnKind::Bytes => row.try_get::<Option<Vec<u8>>, _>(name)?.map(Value::Bytes),
        ColumnKind::Integer => match row.try_get::<Option<i64>, _>(name) {
            Ok(v) => v.map(Value::Int),
            // unsigned columns
            Err(_) => row
                .try_get::<Option<u64>, _>(name)?
                .map(|v| unsigned_value(name, v))
                .transpose()?,
        },
        ColumnKind::Timestamp => row
            .try_get::<Option<NaiveDateTime>, _>(name)?
            .map(Value::Timestamp),
        ColumnKind::Other => {
            debug!(
                "Column {} has unhandled type {}, reading as text",
                name, column.data_type
            );
            row.try_get::<Option<String>, _>(name)?.map(Value::Text)
        }
    };

    Ok(value.unwrap_or(Value::Null))
}
