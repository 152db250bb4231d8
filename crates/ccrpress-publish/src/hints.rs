//! Placement hints read from a typeset manuscript's LaTeX header.
//!
//! The journal class defines `\volume{}`, `\pubyear{}`, `\pubnumber{}`,
//! `\firstpage{}` and `\doi{}`; when the production editor supplies the
//! source, those values pre-fill the record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static VOLUME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\volume\{(\d+)\}").unwrap());
static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\pubyear\{(\d+)\}").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\pubnumber\{(\d+)\}").unwrap());
static FIRST_PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\firstpage\{(\d+)\}").unwrap());
static DOI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\doi\{([\d.]+/[^}]*)\}").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManuscriptHints {
    pub year: Option<i32>,
    pub volume: Option<u32>,
    pub number: Option<u32>,
    pub first_page: Option<u32>,
    pub doi: Option<String>,
}

impl ManuscriptHints {
    pub fn from_latex(source: &str) -> Self {
        Self {
            year: capture(&YEAR, source).and_then(|s| s.parse().ok()),
            volume: capture(&VOLUME, source).and_then(|s| s.parse().ok()),
            number: capture(&NUMBER, source).and_then(|s| s.parse().ok()),
            first_page: capture(&FIRST_PAGE, source).and_then(|s| s.parse().ok()),
            doi: capture(&DOI, source)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn capture<'a>(re: &Regex, source: &'a str) -> Option<&'a str> {
    re.captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r"
\documentclass{ccr}
\volume{6}
\pubyear{2024}
\pubnumber{1}
\firstpage{87}
\doi{10.5117/CCR2024.1.4.JONE}
\title{Measuring things}
";

    #[test]
    fn reads_all_macros() {
        let hints = ManuscriptHints::from_latex(HEADER);
        assert_eq!(hints.volume, Some(6));
        assert_eq!(hints.year, Some(2024));
        assert_eq!(hints.number, Some(1));
        assert_eq!(hints.first_page, Some(87));
        assert_eq!(hints.doi.as_deref(), Some("10.5117/CCR2024.1.4.JONE"));
    }

    #[test]
    fn missing_macros_stay_empty() {
        let hints = ManuscriptHints::from_latex(r"\volume{6} \title{x}");
        assert_eq!(hints.volume, Some(6));
        assert_eq!(hints.doi, None);
        assert!(!hints.is_empty());
        assert!(ManuscriptHints::from_latex("plain text").is_empty());
    }

    #[test]
    fn placeholder_values_are_ignored() {
        let hints = ManuscriptHints::from_latex(r"\firstpage{XX} \doi{TBD}");
        assert!(hints.is_empty());
    }
}
