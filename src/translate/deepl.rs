// tabletranslator/src/translate/deepl.rs
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{TranslationError, Translator};
use crate::config::DeeplConfig;

pub const DEEPL_FREE_API_URL: &str = "https://api-free.deepl.com/v2/translate";
pub const DEEPL_PRO_API_URL: &str = "https://api.deepl.com/v2/translate";

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<TranslationEntry>,
}

#[derive(Debug, Deserialize)]
struct TranslationEntry {
    text: Option<String>,
}

/// Free-tier keys end in `:fx` and must use the free endpoint.
pub fn default_api_url(api_key: &str) -> &'static str {
    if api_key.ends_with(":fx") {
        DEEPL_FREE_API_URL
    } else {
        DEEPL_PRO_API_URL
    }
}

pub struct DeeplTranslator {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl DeeplTranslator {
    pub fn new(config: &DeeplConfig) -> Result<Self, TranslationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let api_url = config
            .api_url
            .clone()
            .unwrap_or_else(|| default_api_url(&config.api_key).to_string());

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslationError> {
        let params = [
            ("text", text),
            ("source_lang", source_lang),
            ("target_lang", target_lang),
        ];

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TranslationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranslateResponse = serde_json::from_str(&body)
            .map_err(|e| TranslationError::Malformed(format!("{}: {}", e, body)))?;

        let translated = parsed
            .translations
            .into_iter()
            .next()
            .and_then(|t| t.text)
            .ok_or(TranslationError::MissingText)?;

        debug!("DeepL {} -> {}: {} chars", source_lang, target_lang, translated.len());
        Ok(translated)
    }
}
