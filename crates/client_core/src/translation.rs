use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use shared::{
    domain::{TranslationRequest, TranslationResult},
    error::ErrorCode,
    protocol::{parse_translation_body, ParsedTranslation, TranslateRequestBody},
};
use tracing::{error, warn};
use url::Url;

use crate::{config::Settings, error::TranslationError};

const API_KEY_HEADER: &str = "x-rapidapi-key";
const API_HOST_HEADER: &str = "x-rapidapi-host";

#[async_trait]
pub trait Translator: Send + Sync {
    /// Performs no validation of `request.source_text`.
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslationError>;
}

pub struct HttpTranslator {
    http: Client,
    endpoint: Url,
    api_host: String,
    api_key: String,
}

impl HttpTranslator {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            endpoint: settings.endpoint_url()?,
            api_host: settings.api_host.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    async fn post(&self, request: &TranslationRequest) -> Result<String, TranslationError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_HOST_HEADER, &self.api_host)
            .header(CONTENT_TYPE, "application/json")
            .json(&TranslateRequestBody::from(request))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(TranslationError::Status { status, body });
        }

        Ok(res.text().await?)
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslationError> {
        let body = match self.post(request).await {
            Ok(body) => body,
            Err(err) => {
                error!(
                    code = err.code().as_str(),
                    source_lang = %request.source_lang,
                    target_lang = %request.target_lang,
                    "translation request failed: {err}"
                );
                return Err(err);
            }
        };

        match parse_translation_body(&body) {
            ParsedTranslation::Found(result) => Ok(result),
            ParsedTranslation::Missing => {
                warn!(
                    code = ErrorCode::MalformedResponse.as_str(),
                    body_len = body.len(),
                    "provider response has no translation; using empty text"
                );
                Ok(TranslationResult::default())
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/translation_tests.rs"]
mod tests;
