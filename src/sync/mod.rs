// tabletranslator/src/sync/mod.rs
pub(crate) mod differ;
pub(crate) mod locale;
pub(crate) mod logic;
pub(crate) mod report;
pub(crate) mod schema;
pub(crate) mod selector;
pub(crate) mod upsert;

use tracing::info;

use crate::backup::TableBackup;
use crate::backup::db_dump::MysqlDumpBackup;
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::store::mysql::MySqlStore;
use crate::translate::deepl::DeeplTranslator;
use crate::utils::setting::redact_db_url;
use report::RunReport;
use selector::{AssumeYes, Confirm, StdinConfirm};

/// Public entry point for a translation run.
/// Wires the database, DeepL client and backup tool from the configuration and runs the flow.
pub async fn run_translation_flow(app_config: &AppConfig) -> Result<RunReport> {
    let translate_config = &app_config.translate;

    let store = MySqlStore::connect(
        &translate_config.db_url,
        &redact_db_url(&translate_config.db_url),
    )
    .await?;

    let translator = DeeplTranslator::new(&app_config.deepl)
        .map_err(|e| AppError::Config(format!("Failed to build DeepL client: {}", e)))?;
    info!("Using DeepL endpoint {}", translator.api_url());

    let backup = if translate_config.skip_backup {
        info!("⚠️ Backups disabled (--no-backup)");
        None
    } else {
        Some(MysqlDumpBackup::new(&app_config.backup, &translate_config.db_url)?)
    };

    let confirm: &dyn Confirm = if translate_config.assume_yes {
        &AssumeYes
    } else {
        &StdinConfirm
    };

    logic::perform_translation_orchestration(
        &store,
        &translator,
        backup.as_ref().map(|b| b as &dyn TableBackup),
        confirm,
        translate_config,
    )
    .await
}
