//! Raw editorial-backend payloads and their normalization into the models in
//! `ccrpress_core`.
//!
//! Backend releases disagree on where a publication keeps its DOI and on a
//! few field encodings. Everything shape-specific stays in this module; the
//! derivation code only ever sees normalized [`SubmissionMetadata`] and
//! [`Issue`] values.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use ccrpress_core::models::{
    ArticleSummary, Author, Issue, Keywords, Localized, LocalizedText, PublicationSummary,
    SubmissionMetadata,
};
use serde::de::{self, DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{PublishError, Result};

/// Backend status code of a published submission.
pub const STATUS_PUBLISHED: u8 = 3;

const DOI_OBJECT_KEY: &str = "doiObject";
const PUB_ID_KEY: &str = "pub-id::doi";

/// Where a publication payload keeps its DOI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoiLocation {
    /// `doiObject: { "doi": ... }`, `null` while none is registered.
    DoiObject(Option<String>),
    /// Flat `pub-id::doi` string of older releases.
    PubIdField(Option<String>),
}

impl DoiLocation {
    /// Detects the shape from the keys present; `context` labels the error
    /// when neither is.
    pub fn detect(publication: &Map<String, Value>, context: &str) -> Result<Self> {
        if let Some(object) = publication.get(DOI_OBJECT_KEY) {
            let doi = match object {
                Value::Null => None,
                Value::Object(fields) => fields.get("doi").and_then(Value::as_str).map(str::to_string),
                other => {
                    return Err(PublishError::Payload(format!(
                        "{context}: {DOI_OBJECT_KEY} is {other}"
                    )));
                }
            };
            return Ok(Self::DoiObject(doi));
        }
        if let Some(field) = publication.get(PUB_ID_KEY) {
            return match field {
                Value::Null => Ok(Self::PubIdField(None)),
                Value::String(s) => Ok(Self::PubIdField(Some(s.clone()))),
                other => Err(PublishError::Payload(format!("{context}: {PUB_ID_KEY} is {other}"))),
            };
        }
        Err(PublishError::MissingDoiInfo(context.to_string()))
    }

    /// The DOI, with blank values treated as absent.
    pub fn into_doi(self) -> Option<String> {
        let (Self::DoiObject(doi) | Self::PubIdField(doi)) = self;
        doi.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
    }
}

// ─── Raw shapes ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub id: u64,
    #[serde(default)]
    pub current_publication_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPublication {
    id: u64,
    #[serde(default, deserialize_with = "localized")]
    full_title: LocalizedText,
    #[serde(default, deserialize_with = "localized")]
    title: LocalizedText,
    #[serde(rename = "abstract", default, deserialize_with = "localized")]
    abstract_text: LocalizedText,
    #[serde(default, deserialize_with = "localized")]
    keywords: Localized<Keywords>,
    #[serde(default)]
    authors: Vec<RawAuthor>,
    #[serde(default)]
    issue_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthor {
    #[serde(default, deserialize_with = "localized")]
    given_name: LocalizedText,
    #[serde(default, deserialize_with = "localized")]
    family_name: LocalizedText,
    #[serde(default, deserialize_with = "affiliation")]
    affiliation: LocalizedText,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    id: u64,
    #[serde(default, deserialize_with = "localized")]
    title: LocalizedText,
    #[serde(deserialize_with = "number")]
    year: i32,
    #[serde(deserialize_with = "number")]
    volume: u32,
    #[serde(deserialize_with = "number")]
    number: u32,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    id: u64,
    #[serde(deserialize_with = "number")]
    status: u8,
    #[serde(default)]
    publications: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawPages {
    #[serde(default)]
    pages: Option<String>,
}

// ─── Normalization ──────────────────────────────────────────────────────────

/// Normalizes one publication of a submission.
pub fn normalize_submission(submission_id: u64, publication: Value) -> Result<SubmissionMetadata> {
    let context = format!("submission {submission_id}");
    let object = into_object(publication, &context)?;
    let doi = DoiLocation::detect(&object, &context)?;
    let raw: RawPublication = from_object(object, &context)?;

    let title = if raw.full_title.is_empty() { raw.title } else { raw.full_title };

    Ok(SubmissionMetadata {
        submission_id,
        publication_id: raw.id,
        title,
        abstract_text: raw.abstract_text,
        keywords: raw.keywords,
        authors: raw
            .authors
            .into_iter()
            .map(|a| Author {
                given_name: a.given_name,
                family_name: a.family_name,
                affiliation: a.affiliation,
            })
            .collect(),
        // Some releases send 0 for "no issue".
        issue_id: raw.issue_id.filter(|id| *id != 0),
        existing_doi: doi.into_doi(),
    })
}

pub fn normalize_issue(issue: Value) -> Result<Issue> {
    let raw: RawIssue = serde_json::from_value(issue)
        .map_err(|e| PublishError::Payload(format!("issue: {e}")))?;

    let mut articles = Vec::with_capacity(raw.articles.len());
    for article in raw.articles {
        let context = format!("issue {} article {}", raw.id, article.id);
        let publications = article
            .publications
            .into_iter()
            .map(|publication| {
                let doi = DoiLocation::detect(&publication, &context)?.into_doi();
                let RawPages { pages } = from_object(publication, &context)?;
                Ok(PublicationSummary {
                    doi,
                    pages: pages.filter(|p| !p.trim().is_empty()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        articles.push(ArticleSummary {
            id: article.id,
            published: article.status == STATUS_PUBLISHED,
            publications,
        });
    }

    Ok(Issue {
        id: raw.id,
        title: raw.title,
        year: raw.year,
        volume: raw.volume,
        number: raw.number,
        articles,
    })
}

fn into_object(value: Value, context: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(PublishError::Payload(format!("{context}: expected an object, got {other}"))),
    }
}

fn from_object<T: DeserializeOwned>(object: Map<String, Value>, context: &str) -> Result<T> {
    serde_json::from_value(Value::Object(object))
        .map_err(|e| PublishError::Payload(format!("{context}: {e}")))
}

// ─── Lenient field decoders ─────────────────────────────────────────────────

/// Language maps arrive as objects with nullable values, as `[]` when empty
/// (a PHP serialization quirk), or as `null`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LocalizedPayload<T> {
    Map(BTreeMap<String, Option<T>>),
    List(Vec<IgnoredAny>),
    Null,
}

fn localized<'de, D, T>(deserializer: D) -> std::result::Result<Localized<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match LocalizedPayload::<T>::deserialize(deserializer)? {
        LocalizedPayload::Map(map) => Ok(map
            .into_iter()
            .filter_map(|(language, value)| value.map(|v| (language, v)))
            .collect()),
        LocalizedPayload::List(items) if items.is_empty() => Ok(Localized::new()),
        LocalizedPayload::List(_) => Err(de::Error::custom("expected a language map")),
        LocalizedPayload::Null => Ok(Localized::new()),
    }
}

#[derive(Deserialize)]
struct RawAffiliation {
    #[serde(default, deserialize_with = "localized")]
    name: LocalizedText,
}

/// Newer releases model affiliations as a list of institutions, each with a
/// localized name; their names are joined per language.
#[derive(Deserialize)]
#[serde(untagged)]
enum AffiliationPayload {
    Institutions(Vec<RawAffiliation>),
    Text(#[serde(deserialize_with = "localized")] LocalizedText),
}

fn affiliation<'de, D>(deserializer: D) -> std::result::Result<LocalizedText, D::Error>
where
    D: Deserializer<'de>,
{
    match AffiliationPayload::deserialize(deserializer)? {
        AffiliationPayload::Text(text) => Ok(text),
        AffiliationPayload::Institutions(institutions) => {
            let mut joined: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for institution in &institutions {
                for language in institution.name.languages() {
                    if let Some(name) = institution.name.get(language) {
                        joined.entry(language.to_string()).or_default().push(name.clone());
                    }
                }
            }
            Ok(joined
                .into_iter()
                .map(|(language, names)| (language, names.join("; ")))
                .collect())
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberPayload {
    Number(i64),
    Text(String),
}

/// Accepts `2024` as well as `"2024"`.
fn number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let text = match NumberPayload::deserialize(deserializer)? {
        NumberPayload::Number(n) => n.to_string(),
        NumberPayload::Text(s) => s,
    };
    text.trim().parse().map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn modern_publication() -> Value {
        json!({
            "id": 201,
            "submissionId": 188,
            "fullTitle": {"en": "Counting Tweets", "nl": "Tweets tellen"},
            "title": {"en": "Counting Tweets"},
            "abstract": {"en": "<p>One.</p>", "nl": null},
            "keywords": {"en": ["twitter", "methods"]},
            "authors": [
                {
                    "givenName": {"en": "Jane"},
                    "familyName": {"en": "Smith"},
                    "affiliations": [],
                    "affiliation": [
                        {"name": {"en": "University of Amsterdam"}},
                        {"name": {"en": "ASCoR", "nl": "ASCoR"}}
                    ]
                }
            ],
            "issueId": 40,
            "doiObject": {"doi": "10.5117/CCR2024.1.3.SMIT", "status": 1}
        })
    }

    fn legacy_publication() -> Value {
        json!({
            "id": 77,
            "title": {"en_US": "Older Article"},
            "abstract": {"en_US": "Text"},
            "keywords": [],
            "authors": [
                {
                    "givenName": {"en_US": "Kim"},
                    "familyName": {"en_US": "Lee"},
                    "affiliation": {"en_US": "VU Amsterdam", "nl_NL": ""}
                }
            ],
            "issueId": null,
            "pub-id::doi": ""
        })
    }

    #[test]
    fn modern_shape_reads_doi_object() {
        let sub = normalize_submission(188, modern_publication()).unwrap();
        assert_eq!(sub.publication_id, 201);
        assert_eq!(sub.existing_doi.as_deref(), Some("10.5117/CCR2024.1.3.SMIT"));
        assert_eq!(sub.issue_id, Some(40));
        assert_eq!(sub.title.get("nl").map(String::as_str), Some("Tweets tellen"));
        assert_eq!(sub.abstract_text.get("nl"), None);
        assert_eq!(
            sub.keywords.get("en"),
            Some(&Keywords::Listed(vec!["twitter".into(), "methods".into()]))
        );
        assert_eq!(
            sub.authors[0].affiliation.get("en").map(String::as_str),
            Some("University of Amsterdam; ASCoR")
        );
    }

    #[test]
    fn legacy_shape_reads_pub_id_field() {
        let sub = normalize_submission(55, legacy_publication()).unwrap();
        assert_eq!(sub.existing_doi, None);
        assert_eq!(sub.issue_id, None);
        assert_eq!(sub.title.get("en_US").map(String::as_str), Some("Older Article"));
        assert!(sub.keywords.is_empty());
        assert_eq!(
            sub.authors[0].affiliation.get("en_US").map(String::as_str),
            Some("VU Amsterdam")
        );
    }

    #[test]
    fn null_doi_object_means_no_doi() {
        let mut publication = modern_publication();
        publication["doiObject"] = Value::Null;
        let sub = normalize_submission(188, publication).unwrap();
        assert_eq!(sub.existing_doi, None);
    }

    #[test]
    fn missing_doi_fields_are_rejected() {
        let mut publication = legacy_publication();
        publication.as_object_mut().unwrap().remove("pub-id::doi");
        let err = normalize_submission(55, publication).unwrap_err();
        assert!(matches!(err, PublishError::MissingDoiInfo(ctx) if ctx == "submission 55"));
    }

    #[test]
    fn zero_issue_id_means_unassigned() {
        let mut publication = legacy_publication();
        publication["issueId"] = json!(0);
        assert_eq!(normalize_submission(55, publication).unwrap().issue_id, None);
    }

    #[test]
    fn issue_with_string_numbers_and_mixed_shapes() {
        let issue = normalize_issue(json!({
            "id": 40,
            "title": {"en_US": "Issue 1"},
            "year": "2024",
            "volume": 6,
            "number": "1",
            "articles": [
                {
                    "id": 150,
                    "status": 3,
                    "publications": [{"id": 1, "pages": "1-20", "pub-id::doi": "10.5117/CCR2024.1.1.JONE"}]
                },
                {
                    "id": 160,
                    "status": "1",
                    "publications": [{"id": 2, "pages": "", "doiObject": null}]
                }
            ]
        }))
        .unwrap();

        assert_eq!((issue.year, issue.volume, issue.number), (2024, 6, 1));
        assert!(issue.articles[0].published);
        assert!(!issue.articles[1].published);
        assert_eq!(
            issue.articles[0].publications[0],
            PublicationSummary {
                doi: Some("10.5117/CCR2024.1.1.JONE".into()),
                pages: Some("1-20".into())
            }
        );
        assert_eq!(issue.articles[1].publications[0], PublicationSummary::default());
    }

    #[test]
    fn sibling_without_doi_fields_is_rejected() {
        let err = normalize_issue(json!({
            "id": 40, "year": 2024, "volume": 6, "number": 1,
            "articles": [{"id": 9, "status": 3, "publications": [{"id": 1, "pages": "1-2"}]}]
        }))
        .unwrap_err();
        assert!(matches!(err, PublishError::MissingDoiInfo(_)));
    }

    #[test]
    fn non_numeric_issue_number_is_a_payload_error() {
        let err = normalize_issue(json!({"id": 40, "year": 2024, "volume": 6, "number": "Special"}))
            .unwrap_err();
        assert!(matches!(err, PublishError::Payload(_)));
    }
}
