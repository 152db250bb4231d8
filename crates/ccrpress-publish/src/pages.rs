use ccrpress_core::FirstPagePolicy;
use ccrpress_core::models::{FirstPage, Issue};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

// `12-34`, `12 - 34`, `12--34`, `12–34`; editors are not consistent.
static PAGE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*[-–—]+\s*(\d+)\s*$").unwrap());

/// Parses `<start>-<end>`, returning both bounds.
pub fn parse_page_range(raw: &str) -> Option<(u32, u32)> {
    let caps = PAGE_RANGE.captures(raw)?;
    let start = caps.get(1)?.as_str().parse().ok()?;
    let end = caps.get(2)?.as_str().parse().ok()?;
    Some((start, end))
}

/// First page of a new article in `issue`: one past the highest last page of
/// any published article, or 1 for an issue with no paginated articles.
///
/// An unreadable page range stops the computation with
/// [`FirstPage::Unknown`]; a later readable range does not override it.
pub fn first_page(issue: &Issue) -> FirstPage {
    let mut page = 1;
    let mut after_article = None;

    let published = issue.articles.iter().filter(|article| article.published);
    for article in published {
        for publication in &article.publications {
            let Some(raw) = publication.pages.as_deref().filter(|p| !p.trim().is_empty()) else {
                continue;
            };
            match parse_page_range(raw) {
                Some((_, end)) if end.saturating_add(1) > page => {
                    page = end.saturating_add(1);
                    after_article = Some(article.id);
                }
                Some(_) => {}
                None => {
                    debug!(article = article.id, raw, "unreadable page range");
                    return FirstPage::Unknown {
                        reason: format!("Could not parse pages: {raw}"),
                    };
                }
            }
        }
    }

    FirstPage::Known { page, after_article }
}

/// Applies the configured policy. `None` means the article has no issue yet.
pub fn first_page_for(issue: Option<&Issue>, policy: FirstPagePolicy) -> FirstPage {
    let Some(issue) = issue else {
        return FirstPage::Unassigned;
    };
    match policy {
        FirstPagePolicy::Continue => first_page(issue),
        FirstPagePolicy::Restart => {
            warn!(
                issue = issue.id,
                "first_page_policy = restart ignores pagination of earlier articles"
            );
            FirstPage::Known { page: 1, after_article: None }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccrpress_core::models::{ArticleSummary, PublicationSummary};

    fn article(id: u64, published: bool, pages: &[&str]) -> ArticleSummary {
        ArticleSummary {
            id,
            published,
            publications: pages
                .iter()
                .map(|p| PublicationSummary { doi: None, pages: Some(p.to_string()) })
                .collect(),
        }
    }

    fn issue(articles: Vec<ArticleSummary>) -> Issue {
        Issue { id: 3, year: 2024, volume: 6, number: 1, articles, ..Default::default() }
    }

    #[test]
    fn continues_after_published_article() {
        let got = first_page(&issue(vec![article(1, true, &["1-20"])]));
        assert_eq!(got, FirstPage::Known { page: 21, after_article: Some(1) });
    }

    #[test]
    fn empty_issue_starts_at_one() {
        assert_eq!(first_page(&issue(vec![])), FirstPage::Known { page: 1, after_article: None });
    }

    #[test]
    fn takes_the_maximum_regardless_of_order() {
        let got = first_page(&issue(vec![
            article(1, true, &["1-20"]),
            article(2, true, &["41-60"]),
            article(3, true, &["21-40"]),
        ]));
        assert_eq!(got, FirstPage::Known { page: 61, after_article: Some(2) });
    }

    #[test]
    fn unpublished_articles_do_not_count() {
        let got = first_page(&issue(vec![article(1, true, &["1-20"]), article(2, false, &["21-99"])]));
        assert_eq!(got.page(), Some(21));
    }

    #[test]
    fn unpublished_garbage_is_not_inspected() {
        let got = first_page(&issue(vec![article(1, false, &["abc"])]));
        assert_eq!(got.page(), Some(1));
    }

    #[test]
    fn blank_ranges_are_skipped() {
        let got = first_page(&issue(vec![article(1, true, &["", "  "]), article(2, true, &["5-9"])]));
        assert_eq!(got.page(), Some(10));
    }

    #[test]
    fn irregular_separators_parse() {
        for raw in ["12-34", " 12 - 34 ", "12--34", "12 –– 34", "12—34"] {
            assert_eq!(parse_page_range(raw), Some((12, 34)), "{raw}");
        }
    }

    #[test]
    fn unreadable_range_is_unknown_with_raw_text() {
        let got = first_page(&issue(vec![article(1, true, &["abc"])]));
        assert_eq!(got, FirstPage::Unknown { reason: "Could not parse pages: abc".to_string() });
    }

    #[test]
    fn unknown_is_terminal() {
        let got = first_page(&issue(vec![
            article(1, true, &["1-10"]),
            article(2, true, &["e1-e12"]),
            article(3, true, &["xx"]),
            article(4, true, &["11-90"]),
        ]));
        assert_eq!(got, FirstPage::Unknown { reason: "Could not parse pages: e1-e12".to_string() });
    }

    #[test]
    fn unassigned_article_skips_the_computation() {
        assert_eq!(first_page_for(None, FirstPagePolicy::Continue), FirstPage::Unassigned);
    }

    #[test]
    fn restart_policy_always_yields_one() {
        let i = issue(vec![article(1, true, &["1-20"])]);
        assert_eq!(first_page_for(Some(&i), FirstPagePolicy::Restart).page(), Some(1));
        assert_eq!(first_page_for(Some(&i), FirstPagePolicy::Continue).page(), Some(21));
    }
}
