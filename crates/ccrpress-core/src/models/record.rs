use serde::{Deserialize, Serialize};

/// The canonical, fully derived record of one article, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub submission_id: u64,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Abstract split on paragraph markers and reflowed for display.
    pub abstract_paragraphs: Vec<String>,
    pub keywords: Vec<String>,
    pub authors: Vec<RecordAuthor>,
    /// `None` while the article has not been assigned to an issue.
    pub placement: Option<IssuePlacement>,
    pub sequence_number: u32,
    pub first_page: FirstPage,
    pub doi: String,
    pub doi_was_preexisting: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAuthor {
    pub given_name: String,
    pub family_name: String,
    pub affiliation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePlacement {
    pub issue_id: u64,
    pub year: i32,
    pub volume: u32,
    pub number: u32,
}

/// Outcome of the first-page computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FirstPage {
    Known {
        page: u32,
        /// Article whose last page this one continues from.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after_article: Option<u64>,
    },
    /// A sibling page range could not be read; manual placement required.
    Unknown { reason: String },
    /// The article is not in an issue yet.
    Unassigned,
}

impl FirstPage {
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Known { page, .. } => Some(*page),
            _ => None,
        }
    }
}

impl std::fmt::Display for FirstPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known { page, after_article: Some(id) } => write!(f, "{page} (after article {id})"),
            Self::Known { page, after_article: None } => write!(f, "{page}"),
            Self::Unknown { reason } => write!(f, "unknown: {reason}"),
            Self::Unassigned => write!(f, "please assign the article to an issue first"),
        }
    }
}

impl RecordAuthor {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
            .trim()
            .to_string()
    }
}

impl PublicationRecord {
    /// DOI local part, used as the base name of exported files.
    pub fn local_id(&self) -> &str {
        doi_local_part(&self.doi)
    }
}

/// Everything after the first `/` of a DOI; the whole input if there is none.
pub fn doi_local_part(doi: &str) -> &str {
    doi.split_once('/').map_or(doi, |(_, local)| local)
}
