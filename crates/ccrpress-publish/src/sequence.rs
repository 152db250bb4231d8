//! Sequence number and DOI derivation.
//!
//! The sequence number of a new article is one past the highest number
//! embedded in any DOI already present in its issue. Nothing is stored
//! between calls: the issue as currently listed upstream is the only input,
//! so recomputing on every request is safe even when articles are added,
//! removed or reordered in between.

use ccrpress_core::models::{Issue, LocalizedText};
use serde::Serialize;
use tracing::debug;

use crate::error::{PublishError, Result};
use crate::identifiers::{CanonicalDoi, DOI_CODE_LENGTH, short_code};
use crate::text::LocalePreference;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequenceAssignment {
    pub sequence_number: u32,
    pub doi: String,
    /// The DOI was already registered upstream and is returned untouched.
    pub preexisting: bool,
}

impl SequenceAssignment {
    /// Accepts an already assigned DOI, taking the sequence number from it.
    pub fn from_existing(doi: &str) -> Result<Self> {
        let parsed = CanonicalDoi::parse(doi)?;
        Ok(Self {
            sequence_number: parsed.sequence_number,
            doi: doi.to_string(),
            preexisting: true,
        })
    }
}

pub struct SequenceEngine<'a> {
    prefix: &'a str,
    locale: &'a LocalePreference,
}

impl<'a> SequenceEngine<'a> {
    pub fn new(prefix: &'a str, locale: &'a LocalePreference) -> Self {
        Self { prefix, locale }
    }

    /// Returns the existing DOI with its sequence number, or synthesizes the
    /// next DOI of `issue` from the first author's family name.
    pub fn derive(
        &self,
        issue: &Issue,
        existing_doi: Option<&str>,
        first_author_family_name: &LocalizedText,
    ) -> Result<SequenceAssignment> {
        if let Some(doi) = existing_doi.filter(|d| !d.trim().is_empty()) {
            let assignment = SequenceAssignment::from_existing(doi)?;
            debug!(doi, sequence = assignment.sequence_number, "keeping existing DOI");
            return Ok(assignment);
        }

        let sequence_number = next_sequence_number(issue)?;
        let family_name = self
            .locale
            .resolve("first author family name", first_author_family_name)?;
        let code = short_code(family_name, DOI_CODE_LENGTH);
        if code.is_empty() {
            return Err(PublishError::EmptyAuthorCode(family_name.clone()));
        }

        let doi = CanonicalDoi::new(self.prefix, issue.year, issue.number, sequence_number, code);
        debug!(issue = issue.id, sequence = sequence_number, %doi, "synthesized DOI");

        Ok(SequenceAssignment {
            sequence_number,
            doi: doi.to_string(),
            preexisting: false,
        })
    }
}

/// Highest sequence number embedded in any DOI of `issue`, 0 if none.
///
/// Every non-blank DOI must follow house style; one that does not means the
/// issue is in a state where any number we pick could collide.
pub fn max_sequence_number(issue: &Issue) -> Result<u32> {
    Ok(highest_sibling(issue)?.map_or(0, |(sequence, _)| sequence))
}

/// One past [`max_sequence_number`]. A sibling already at `u32::MAX` leaves
/// no number to hand out and is reported as unparseable.
pub fn next_sequence_number(issue: &Issue) -> Result<u32> {
    match highest_sibling(issue)? {
        None => Ok(1),
        Some((sequence, doi)) => sequence
            .checked_add(1)
            .ok_or_else(|| PublishError::UnparseableDoi(doi.to_string())),
    }
}

fn highest_sibling(issue: &Issue) -> Result<Option<(u32, &str)>> {
    let mut highest: Option<(u32, &str)> = None;
    for (_, publication) in issue.publications() {
        let Some(doi) = publication.doi.as_deref().filter(|d| !d.trim().is_empty()) else {
            continue;
        };
        let sequence = CanonicalDoi::parse(doi)?.sequence_number;
        if highest.is_none_or(|(max, _)| sequence > max) {
            highest = Some((sequence, doi));
        }
    }
    Ok(highest)
}
