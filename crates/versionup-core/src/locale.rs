//! Learner locale selection.
//!
//! The language only affects which narration strings are resolved and
//! spoken; it never influences scenario control flow.

use serde::{Deserialize, Serialize};

/// Locales the training experience ships narration for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// French.
    Fr,
    /// Arabic.
    Ar,
}

impl Language {
    /// Short locale code, as used in message catalogs and API payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::Ar => "ar",
        }
    }

    /// BCP-47 tag handed to the speech output device.
    #[must_use]
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Fr => "fr-FR",
            Language::Ar => "ar-SA",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
