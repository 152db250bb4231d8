//! Localized text resolution and the small presentation steps applied to
//! resolved text (abstract paragraphs, keyword lists).

use ccrpress_core::models::{Keywords, Localized};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PublishError, Result};

/// Display width of reflowed abstract paragraphs.
pub const ABSTRACT_WIDTH: usize = 120;

static PARAGRAPH_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?p>").unwrap());
static KEYWORD_DELIMITER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;]").unwrap());

/// Returns the value of the first tag in `preference` that `text` carries.
///
/// `preference` is scanned in order; the order of keys inside `text` never
/// matters. `field` only labels the error.
pub fn resolve<'a, T>(field: &str, text: &'a Localized<T>, preference: &[String]) -> Result<&'a T> {
    preference
        .iter()
        .find_map(|language| text.get(language))
        .ok_or_else(|| PublishError::MissingLocalization {
            field: field.to_string(),
            tried: preference.to_vec(),
        })
}

/// An ordered list of accepted language tags, bound once per request.
#[derive(Debug, Clone)]
pub struct LocalePreference {
    languages: Vec<String>,
}

impl LocalePreference {
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn resolve<'a, T>(&self, field: &str, text: &'a Localized<T>) -> Result<&'a T> {
        resolve(field, text, &self.languages)
    }
}

/// Splits HTML-ish abstract text on `<p>`/`</p>` and reflows every
/// non-blank fragment to `width` columns.
pub fn abstract_paragraphs(text: &str, width: usize) -> Vec<String> {
    PARAGRAPH_MARKER
        .split(text)
        .filter(|fragment| !fragment.trim().is_empty())
        .map(|fragment| reflow(fragment, width))
        .collect()
}

/// Greedy word wrap. Whitespace runs collapse to one space; a word longer
/// than `width` gets a line of its own.
pub fn reflow(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut line_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len > 0 {
            if line_len + 1 + word_len > width {
                out.push('\n');
                line_len = 0;
            } else {
                out.push(' ');
                line_len += 1;
            }
        }
        out.push_str(word);
        line_len += word_len;
    }

    out
}

/// Flattens a keyword field into trimmed, non-empty keywords.
pub fn keyword_list(keywords: &Keywords) -> Vec<String> {
    let split = |s: &str| -> Vec<String> {
        KEYWORD_DELIMITER
            .split(s)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    };

    match keywords {
        Keywords::Delimited(s) => split(s),
        Keywords::Listed(items) => items.iter().flat_map(|item| split(item.as_str())).collect(),
    }
}
