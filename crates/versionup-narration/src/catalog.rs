//! Localized narration message catalog.

use std::collections::HashMap;

use thiserror::Error;
use versionup_core::locale::Language;

/// Errors raised while loading catalog tables.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A catalog table failed to parse.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Per-language narration string tables.
///
/// Resolution never fails a transition: a key missing from the selected
/// language falls back to the English table, and a key missing everywhere
/// resolves to an empty string with a warning log.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    tables: HashMap<Language, HashMap<String, String>>,
}

impl MessageCatalog {
    /// The catalog shipped with the product, one embedded YAML table per
    /// supported language.
    ///
    /// # Panics
    ///
    /// Panics if an embedded table is malformed, which is a build defect.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self {
            tables: HashMap::new(),
        };
        for (language, yaml) in [
            (Language::En, include_str!("../locales/en.yaml")),
            (Language::Fr, include_str!("../locales/fr.yaml")),
            (Language::Ar, include_str!("../locales/ar.yaml")),
        ] {
            catalog
                .load_table(language, yaml)
                .expect("embedded catalog table is valid YAML");
        }
        catalog
    }

    /// Creates an empty catalog; useful for deployments that ship their own
    /// tables.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Loads or replaces the table for one language from a YAML mapping of
    /// `key: string`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the YAML is not a string mapping.
    pub fn load_table(&mut self, language: Language, yaml: &str) -> Result<(), CatalogError> {
        let table: HashMap<String, String> = serde_yaml::from_str(yaml)?;
        self.tables.insert(language, table);
        Ok(())
    }

    /// Resolves a message key for the given language.
    ///
    /// Falls back to English when the key is missing from the selected
    /// language, and to an empty string (with a warning) when it is missing
    /// everywhere.
    #[must_use]
    pub fn resolve(&self, key: &str, language: Language) -> String {
        if let Some(text) = self.lookup(key, language) {
            return text.to_owned();
        }

        if language != Language::En {
            if let Some(text) = self.lookup(key, Language::En) {
                tracing::warn!(key, language = %language, "message key missing, falling back to en");
                return text.to_owned();
            }
        }

        tracing::warn!(key, language = %language, "message key missing from catalog");
        String::new()
    }

    fn lookup(&self, key: &str, language: Language) -> Option<&str> {
        self.tables
            .get(&language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}
