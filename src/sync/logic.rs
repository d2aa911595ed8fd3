// tabletranslator/src/sync/logic.rs
use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::differ::{RowKey, RowSnapshot, load_rows};
use super::locale::{LanguagePair, resolve_pair};
use super::report::{RunReport, TableReport};
use super::schema::TableSchema;
use super::selector::{Confirm, select_tables};
use super::upsert::{UpdateSet, UpsertOutcome, upsert_row};
use crate::backup::TableBackup;
use crate::config::TranslateConfig;
use crate::errors::Result;
use crate::store::{ColumnInfo, Row, TranslationStore, Value};
use crate::translate::Translator;

/// Translates the rows of one table at a time, sequentially.
pub struct TableTranslator<'a, S: TranslationStore> {
    store: &'a S,
    translator: &'a dyn Translator,
    languages: &'a LanguagePair,
    source_code: String,
    target_code: String,
}

impl<'a, S: TranslationStore> TableTranslator<'a, S> {
    pub fn new(store: &'a S, translator: &'a dyn Translator, languages: &'a LanguagePair) -> Self {
        Self {
            store,
            translator,
            languages,
            source_code: languages.source.iso_code(),
            target_code: languages.target.iso_code(),
        }
    }

    /// Fills missing target-language text of `schema.table` from the source-language rows.
    ///
    /// Column and row failures are logged and counted; only store read errors are returned.
    pub async fn translate_table(&self, schema: &TableSchema) -> Result<TableReport> {
        info!("🔄 Processing table: {}", schema.table);
        let mut report = TableReport::new(&schema.table);

        let text_columns = schema.text_columns();
        if text_columns.is_empty() {
            warn!(table = %schema.table, "No translatable columns --> SKIP");
            return Ok(report);
        }
        debug!(
            table = %schema.table,
            "Translatable columns: {}",
            text_columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
        );

        let snapshot = load_rows(self.store, schema, self.languages).await?;

        for (key, row) in &snapshot.source_rows {
            report.rows += 1;
            let updates = self
                .translate_row(schema, &text_columns, key, row, &snapshot, &mut report)
                .await;

            if updates.is_empty() {
                debug!(table = %schema.table, parent = %key, "No updates for row --> SKIP");
                report.skipped += 1;
                continue;
            }

            let now = Utc::now().naive_utc();
            match upsert_row(self.store, schema, key, &self.languages.target, &updates, now).await {
                Ok(UpsertOutcome::Updated) => report.updated += 1,
                Ok(UpsertOutcome::Inserted) => report.inserted += 1,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!(
                        table = %schema.table,
                        parent = %key,
                        columns = %updates.columns().join(","),
                        "❌ {}",
                        e
                    );
                    report.row_failures += 1;
                }
            }
        }

        info!("✅ {}", report);
        Ok(report)
    }

    /// Builds the update set of one source row; never fails, failed columns are left out.
    async fn translate_row(
        &self,
        schema: &TableSchema,
        text_columns: &[&ColumnInfo],
        key: &RowKey,
        row: &Row,
        snapshot: &RowSnapshot,
        report: &mut TableReport,
    ) -> UpdateSet {
        let mut updates = UpdateSet::new();

        for column in text_columns {
            let name = column.name.as_str();
            let original = row.get(name).unwrap_or(&Value::Null);

            if let Some(existing) = snapshot.existing_text(key, name) {
                info!(
                    table = %schema.table,
                    column = name,
                    parent = %key,
                    "Translation already exists [{} --> {}] >>> SKIP",
                    original,
                    existing
                );
                report.columns_already_translated += 1;
                continue;
            }

            let Some(text) = original.as_text().filter(|t| !t.trim().is_empty()) else {
                debug!(table = %schema.table, column = name, parent = %key, "Empty source text");
                continue;
            };

            match self
                .translator
                .translate(text, &self.source_code, &self.target_code)
                .await
            {
                Ok(translated) => {
                    info!(
                        table = %schema.table,
                        column = name,
                        parent = %key,
                        "> {} [{}] --> {} [{}]",
                        text,
                        self.source_code,
                        translated,
                        self.target_code
                    );
                    report.columns_translated += 1;
                    updates.insert(name, translated);
                }
                Err(e) => {
                    error!(
                        table = %schema.table,
                        column = name,
                        parent = %key,
                        "Translation error for {}: {}",
                        name,
                        e
                    );
                    report.column_failures += 1;
                }
            }
        }

        updates
    }
}

/// Orchestrates one translation run.
///
/// 1. Resolves the source and target languages.
/// 2. Selects the tables (explicit list, or all after confirmation).
/// 3. Reads every table's schema before anything is written.
/// 4. Per table: backs it up (unless disabled), then translates it.
///
/// Setup and backup errors abort the run; row and column errors only show up in the report.
pub async fn perform_translation_orchestration<S: TranslationStore>(
    store: &S,
    translator: &dyn Translator,
    backup: Option<&dyn TableBackup>,
    confirm: &dyn Confirm,
    translate_config: &TranslateConfig,
) -> Result<RunReport> {
    let languages = resolve_pair(
        store,
        &translate_config.source_locale,
        &translate_config.target_locale,
    )
    .await?;

    let tables = select_tables(store, &translate_config.tables, confirm).await?;

    let mut schemas = Vec::with_capacity(tables.len());
    for table in &tables {
        schemas.push(TableSchema::load(store, table).await?);
    }

    info!(
        "Translating {} tables from {} to {}",
        schemas.len(),
        languages.source.locale_code,
        languages.target.locale_code
    );

    let table_translator = TableTranslator::new(store, translator, &languages);
    let mut run_report = RunReport::default();

    for schema in &schemas {
        if schema.text_columns().is_empty() {
            warn!(table = %schema.table, "No translatable columns --> SKIP");
            run_report.tables.push(TableReport::new(&schema.table));
            continue;
        }

        match backup {
            Some(backup) => {
                backup.backup(&schema.table).await?;
            }
            None => info!("Skipping backup of {}", schema.table),
        }

        run_report
            .tables
            .push(table_translator.translate_table(schema).await?);
    }

    Ok(run_report)
}
