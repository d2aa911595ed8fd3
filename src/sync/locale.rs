// tabletranslator/src/sync/locale.rs
use tracing::info;

use crate::errors::{AppError, Result};
use crate::store::{LanguageDirectory, Value};

/// A row of the shop's language reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: Value,
    pub locale_code: String,
    pub name: String,
}

impl Language {
    /// Upper-cased two-letter language code, e.g. `de-DE` -> `DE`.
    pub fn iso_code(&self) -> String {
        self.locale_code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase()
    }
}

/// The source/target pair of one run.
#[derive(Debug, Clone)]
pub struct LanguagePair {
    pub source: Language,
    pub target: Language,
}

/// Looks up the language whose locale matches `locale_code` (case-insensitive).
pub async fn resolve_language(
    directory: &dyn LanguageDirectory,
    locale_code: &str,
) -> Result<Language> {
    let language = directory
        .find_language(locale_code.trim())
        .await?
        .ok_or_else(|| AppError::UnknownLocale(locale_code.to_string()))?;

    info!(
        "🌐 Resolved locale {} to language '{}' ({})",
        locale_code, language.name, language.id
    );
    Ok(language)
}

pub async fn resolve_pair(
    directory: &dyn LanguageDirectory,
    source_locale: &str,
    target_locale: &str,
) -> Result<LanguagePair> {
    let source = resolve_language(directory, source_locale).await?;
    let target = resolve_language(directory, target_locale).await?;
    if source.id == target.id {
        return Err(AppError::SameLanguage(source.locale_code));
    }
    Ok(LanguagePair { source, target })
}
