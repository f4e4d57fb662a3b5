//! The fixed trilingual language set.
//!
//! The application speaks Kazakh, Russian, and English. Application code and
//! the local store use ISO codes (`kk`, `ru`, `en`); the dictionary and
//! search services expect `kz` for Kazakh on the wire, so the two codes are
//! kept distinct here instead of being special-cased at call sites.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Kazakh (`kk`, wire code `kz`). The dictionary and search services
    /// emit `kz`, so decoding accepts both spellings.
    #[serde(alias = "kz")]
    Kk,
    /// Russian.
    Ru,
    /// English.
    En,
}

/// All languages in display order.
pub const ALL_LANGUAGES: [Language; 3] = [Language::Kk, Language::Ru, Language::En];

/// Error raised when parsing an unknown language code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language code: {code}")]
pub struct UnknownLanguage {
    /// The rejected code.
    pub code: String,
}

impl Language {
    /// ISO application code used in the local store and the CLI.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Kk => "kk",
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// Code expected by the dictionary and search services.
    #[must_use]
    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Kk => "kz",
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// English display name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Kk => "Kazakh",
            Self::Ru => "Russian",
            Self::En => "English",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::Ru
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Accepts both application and wire codes, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kk" | "kz" => Ok(Self::Kk),
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            _ => Err(UnknownLanguage {
                code: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Code mapping coverage, including the `kk`/`kz` wire split.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::app_code("kk", Language::Kk)]
    #[case::wire_code("kz", Language::Kk)]
    #[case::uppercase("RU", Language::Ru)]
    #[case::padded(" en ", Language::En)]
    fn parses_known_codes(#[case] raw: &str, #[case] expected: Language) {
        assert_eq!(raw.parse::<Language>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn kazakh_wire_code_differs_from_app_code() {
        assert_eq!(Language::Kk.code(), "kk");
        assert_eq!(Language::Kk.wire_code(), "kz");
    }

    #[rstest]
    #[case::app_code("\"kk\"")]
    #[case::wire_code("\"kz\"")]
    fn decodes_both_kazakh_spellings(#[case] body: &str) {
        let language: Language = serde_json::from_str(body).expect("kazakh decodes");
        assert_eq!(language, Language::Kk);
    }

    #[test]
    fn encodes_kazakh_with_the_app_code() {
        assert_eq!(
            serde_json::to_string(&Language::Kk).expect("kazakh encodes"),
            "\"kk\""
        );
    }
}
