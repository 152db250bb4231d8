use serde::{Deserialize, Serialize};

use super::localized::LocalizedText;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    #[serde(default)]
    pub title: LocalizedText,
    pub year: i32,
    pub volume: u32,
    pub number: u32,
    /// Articles in the order the backend lists them.
    #[serde(default)]
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub id: u64,
    pub published: bool,
    #[serde(default)]
    pub publications: Vec<PublicationSummary>,
}

/// One publication (version) of an article as listed inside its issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Page range as typed by the editor, e.g. `"12-34"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
}

impl Issue {
    /// Every publication of every article, in listing order.
    pub fn publications(&self) -> impl Iterator<Item = (&ArticleSummary, &PublicationSummary)> {
        self.articles
            .iter()
            .flat_map(|article| article.publications.iter().map(move |p| (article, p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publications_flattens_in_order() {
        let issue = Issue {
            id: 7,
            year: 2024,
            volume: 6,
            number: 1,
            articles: vec![
                ArticleSummary {
                    id: 1,
                    published: true,
                    publications: vec![
                        PublicationSummary { doi: Some("a".into()), pages: None },
                        PublicationSummary { doi: Some("b".into()), pages: None },
                    ],
                },
                ArticleSummary {
                    id: 2,
                    published: false,
                    publications: vec![PublicationSummary { doi: Some("c".into()), pages: None }],
                },
            ],
            ..Default::default()
        };

        let seen: Vec<(u64, &str)> = issue
            .publications()
            .map(|(a, p)| (a.id, p.doi.as_deref().unwrap()))
            .collect();
        assert_eq!(seen, vec![(1, "a"), (1, "b"), (2, "c")]);
    }
}
