use serde::{Deserialize, Serialize};

use super::localized::{Localized, LocalizedText};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub given_name: LocalizedText,
    pub family_name: LocalizedText,
    #[serde(default)]
    pub affiliation: LocalizedText,
}

/// Keywords of one language: either already split, or a single string
/// separated by `,` or `;`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
    Listed(Vec<String>),
    Delimited(String),
}

impl Default for Keywords {
    fn default() -> Self {
        Self::Listed(Vec::new())
    }
}

/// Raw metadata of one article's current publication, normalized from whatever
/// shape the editorial backend returned. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    pub submission_id: u64,
    pub publication_id: u64,
    pub title: LocalizedText,
    #[serde(rename = "abstract")]
    pub abstract_text: LocalizedText,
    #[serde(default)]
    pub keywords: Localized<Keywords>,
    pub authors: Vec<Author>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_doi: Option<String>,
}

impl SubmissionMetadata {
    pub fn first_author(&self) -> Option<&Author> {
        self.authors.first()
    }
}
