use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownLanguage;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RequestId);
id_newtype!(RevealGeneration);

/// Languages offered by the translator. The provider is only ever asked for
/// these two codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    En,
    Hi,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Hi];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        Language::ALL
            .into_iter()
            .find(|lang| {
                trimmed.eq_ignore_ascii_case(lang.code())
                    || trimmed.eq_ignore_ascii_case(lang.display_name())
            })
            .ok_or_else(|| UnknownLanguage(trimmed.to_string()))
    }
}

/// One submission to the translation provider. `source_lang` and
/// `target_lang` may be equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub source_text: String,
    pub source_lang: Language,
    pub target_lang: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationResult {
    pub translated_text: String,
}

impl TranslationResult {
    pub fn new(translated_text: impl Into<String>) -> Self {
        Self {
            translated_text: translated_text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names_case_insensitively() {
        assert_eq!("en".parse::<Language>().expect("en"), Language::En);
        assert_eq!(" HI ".parse::<Language>().expect("hi"), Language::Hi);
        assert_eq!("hindi".parse::<Language>().expect("hindi"), Language::Hi);
        assert_eq!("English".parse::<Language>().expect("english"), Language::En);
    }

    #[test]
    fn rejects_languages_outside_the_fixed_pair() {
        let err = "fr".parse::<Language>().expect_err("fr is not offered");
        assert_eq!(err.to_string(), "unknown language 'fr' (expected en or hi)");
    }

    #[test]
    fn displays_wire_code() {
        assert_eq!(Language::Hi.to_string(), "hi");
        assert_eq!(RequestId(4).to_string(), "4");
    }
}
