//! Wire format of the RapidAPI `google-translator9` v2 endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::{Language, TranslationRequest, TranslationResult};

pub const TEXT_FORMAT: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequestBody {
    pub q: String,
    pub source: Language,
    pub target: Language,
    pub format: String,
}

impl From<&TranslationRequest> for TranslateRequestBody {
    fn from(request: &TranslationRequest) -> Self {
        Self {
            q: request.source_text.clone(),
            source: request.source_lang,
            target: request.target_lang,
            format: TEXT_FORMAT.to_string(),
        }
    }
}

/// Every level is optional: any shape other than
/// `data.translations[0].translatedText` reads as an empty translation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateResponseBody {
    #[serde(default)]
    pub data: Option<TranslationsData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationsData {
    #[serde(default)]
    pub translations: Option<Vec<TranslationCandidate>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationCandidate {
    #[serde(rename = "translatedText", default)]
    pub translated_text: Option<String>,
}

impl TranslateResponseBody {
    pub fn first_translated_text(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .translations
            .as_ref()?
            .first()?
            .translated_text
            .as_deref()
    }
}

/// Outcome of reading a successful provider body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTranslation {
    Found(TranslationResult),
    /// The body was not JSON or lacked the translation path.
    Missing,
}

pub fn parse_translation_body(raw: &str) -> ParsedTranslation {
    let Ok(body) = serde_json::from_str::<TranslateResponseBody>(raw) else {
        return ParsedTranslation::Missing;
    };

    match body.first_translated_text() {
        Some(text) => ParsedTranslation::Found(TranslationResult::new(text)),
        None => ParsedTranslation::Missing,
    }
}
