// tabletranslator/src/translate/mod.rs
pub(crate) mod deepl;

use async_trait::async_trait;
use thiserror::Error;

/// Errors of a single translation request.
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API responded with {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contains no translations[0].text")]
    MissingText,
}

/// Machine translation of a single text.
#[async_trait]
pub trait Translator: Send + Sync {
    /// `source_lang` and `target_lang` are two-letter codes such as `DE` or `EN`.
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError>;
}
