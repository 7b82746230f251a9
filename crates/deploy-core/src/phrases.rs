//! Localized phrases.
//!
//! The server publishes one phrase table per locale. Lookups never fail:
//! a key missing from the table (or a table that failed to load) is shown
//! as-is.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::gateway::DeployApi;

/// Phrase table for one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseBook {
    locale: String,
    phrases: HashMap<String, String>,
}

impl PhraseBook {
    /// Book with no translations; every lookup returns its key.
    pub fn empty(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            phrases: HashMap::new(),
        }
    }

    pub fn from_map(locale: impl Into<String>, phrases: HashMap<String, String>) -> Self {
        Self {
            locale: locale.into(),
            phrases,
        }
    }

    /// Fetch the table for `locale`; failures leave the book empty.
    pub async fn load(api: &dyn DeployApi, locale: &str) -> Self {
        match api.phrases(locale).await {
            Ok(phrases) => {
                debug!(locale, count = phrases.len(), "phrases loaded");
                Self::from_map(locale, phrases)
            }
            Err(e) => {
                warn!(locale, error = %e, "cannot load locale");
                Self::empty(locale)
            }
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Translation of `key`, or `key` itself.
    pub fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        match self.phrases.get(key) {
            Some(phrase) if !phrase.is_empty() => phrase.as_str(),
            _ => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> PhraseBook {
        let phrases = HashMap::from([
            ("Save".to_string(), "保存".to_string()),
            ("Blank".to_string(), String::new()),
        ]);
        PhraseBook::from_map("zh-CN", phrases)
    }

    #[test]
    fn test_lookup_hit() {
        assert_eq!(book().lookup("Save"), "保存");
    }

    #[test]
    fn test_lookup_missing_returns_key() {
        let book = book();
        assert_eq!(book.lookup("Cancel"), "Cancel");
        assert_eq!(book.lookup(""), "");
        assert_eq!(book.lookup("Blank"), "Blank");
    }

    #[test]
    fn test_empty_book() {
        let book = PhraseBook::empty("en");
        assert!(book.is_empty());
        assert_eq!(book.locale(), "en");
        assert_eq!(book.lookup("Upload JNLP"), "Upload JNLP");
    }
}
