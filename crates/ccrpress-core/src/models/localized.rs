use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A value that may be present in several languages, keyed by language tag
/// (`en_US`, `nl_NL`, `en`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized<T>(BTreeMap<String, T>);

/// The common case: one string per language.
pub type LocalizedText = Localized<String>;

impl<T> Default for Localized<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> Localized<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy when constructing fixtures.
    pub fn with(mut self, language: impl Into<String>, value: T) -> Self {
        self.0.insert(language.into(), value);
        self
    }

    pub fn insert(&mut self, language: impl Into<String>, value: T) -> Option<T> {
        self.0.insert(language.into(), value)
    }

    pub fn get(&self, language: &str) -> Option<&T> {
        self.0.get(language)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Localized<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let text = LocalizedText::new()
            .with("nl_NL", "Titel".to_string())
            .with("en_US", "Title".to_string());
        assert_eq!(text.get("en_US").map(String::as_str), Some("Title"));
        assert_eq!(text.get("de_DE"), None);
        assert_eq!(text.languages().collect::<Vec<_>>(), vec!["en_US", "nl_NL"]);
    }

    #[test]
    fn test_serde_is_a_plain_map() {
        let text: LocalizedText =
            serde_json::from_str(r#"{"en_US": "Hello", "fr_CA": "Bonjour"}"#).unwrap();
        assert_eq!(text.get("fr_CA").map(String::as_str), Some("Bonjour"));
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"en_US":"Hello","fr_CA":"Bonjour"}"#);
    }
}
