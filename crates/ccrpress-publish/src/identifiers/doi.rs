use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PublishError, Result};

/// Journal marker opening the local part of every house-style DOI.
pub const JOURNAL_MARKER: &str = "CCR";

// Downstream catalogers parse this exact grammar; keep it byte-for-byte.
static CANONICAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>[\d.]+)/CCR(?P<year>\d+)\.(?P<issue>\d+)\.(?P<seq>\d+)\.(?P<code>\w+)$")
        .unwrap()
});

/// A DOI following the journal's house style:
/// `PREFIX/CCR{year}.{issue}.{sequence}.{code}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalDoi {
    pub prefix: String,
    pub year: i32,
    pub issue_number: u32,
    pub sequence_number: u32,
    pub code: String,
}

impl CanonicalDoi {
    pub fn new(
        prefix: impl Into<String>,
        year: i32,
        issue_number: u32,
        sequence_number: u32,
        code: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            year,
            issue_number,
            sequence_number,
            code: code.into(),
        }
    }

    /// Parses a DOI against the house grammar. Surrounding whitespace is
    /// ignored; anything else that deviates is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let unparseable = || PublishError::UnparseableDoi(input.to_string());
        let caps = CANONICAL.captures(input.trim()).ok_or_else(unparseable)?;

        let number = |name: &str| caps.name(name).map_or("", |m| m.as_str());
        Ok(Self {
            prefix: number("prefix").to_string(),
            year: number("year").parse().map_err(|_| unparseable())?,
            issue_number: number("issue").parse().map_err(|_| unparseable())?,
            sequence_number: number("seq").parse().map_err(|_| unparseable())?,
            code: number("code").to_string(),
        })
    }

    /// Local part in normalized form. A parsed DOI with zero-padded numbers
    /// does not reproduce its input here; use the raw string for file names.
    pub fn local_id(&self) -> String {
        format!(
            "{JOURNAL_MARKER}{}.{}.{}.{}",
            self.year, self.issue_number, self.sequence_number, self.code
        )
    }
}

impl fmt::Display for CanonicalDoi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.local_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_house_style() {
        let doi = CanonicalDoi::parse("10.5117/CCR2024.1.6.SMIT").unwrap();
        assert_eq!(doi.prefix, "10.5117");
        assert_eq!(doi.year, 2024);
        assert_eq!(doi.issue_number, 1);
        assert_eq!(doi.sequence_number, 6);
        assert_eq!(doi.code, "SMIT");
    }

    #[test]
    fn zero_padded_sequence_reads_as_number() {
        let doi = CanonicalDoi::parse("10.5117/CCR2020.2.003.VANA").unwrap();
        assert_eq!(doi.sequence_number, 3);
    }

    #[test]
    fn display_round_trips() {
        for (year, issue, seq, code) in [(2019, 1, 1, "A"), (2024, 2, 17, "MULL"), (2031, 12, 250, "X9")] {
            let doi = CanonicalDoi::new("10.5117", year, issue, seq, code);
            let parsed = CanonicalDoi::parse(&doi.to_string()).unwrap();
            assert_eq!(parsed.sequence_number, seq);
            assert_eq!(parsed, doi);
        }
    }

    #[test]
    fn display_round_trips_across_the_number_ranges() {
        let years = [0, 1, 1999, 2024, 9999, 10_000, i32::MAX];
        let issues = [0, 1, 4, 99, u32::MAX];
        let sequences = [0, 1, 2, 10, 1_000_000, u32::MAX - 1, u32::MAX];
        let codes = ["A", "SMIT", "VANA", "X9", "007", "O_BR"];

        for (i, &year) in years.iter().enumerate() {
            for (j, &issue) in issues.iter().enumerate() {
                for &seq in &sequences {
                    let code = codes[(i + j) % codes.len()];
                    for prefix in ["10.5117", "10.1.2"] {
                        let doi = CanonicalDoi::new(prefix, year, issue, seq, code);
                        let rendered = doi.to_string();
                        assert_eq!(CanonicalDoi::parse(&rendered).unwrap(), doi, "{rendered}");
                    }
                }
            }
        }
    }

    #[test]
    fn local_id_drops_prefix() {
        let doi = CanonicalDoi::new("10.5117", 2024, 1, 6, "SMIT");
        assert_eq!(doi.local_id(), "CCR2024.1.6.SMIT");
        assert_eq!(doi.to_string(), "10.5117/CCR2024.1.6.SMIT");
    }

    #[test]
    fn rejects_other_styles() {
        for raw in [
            "10.1000/xyz123",
            "10.5117/CCR2024.1.SMIT",
            "10.5117/ccr2024.1.6.SMIT",
            "10.5117/CCR2024.1.6.",
            "10.5117/CCR2024.1.6.SM-IT",
            "https://doi.org/10.5117/CCR2024.1.6.SMIT",
            "",
        ] {
            assert!(
                matches!(CanonicalDoi::parse(raw), Err(PublishError::UnparseableDoi(_))),
                "{raw} should not parse"
            );
        }
    }
}
