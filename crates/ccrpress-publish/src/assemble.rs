use ccrpress_core::AppConfig;
use ccrpress_core::models::{
    Author, FirstPage, Issue, IssuePlacement, LocalizedText, PublicationRecord, RecordAuthor,
    SubmissionMetadata,
};
use tracing::{debug, warn};

use crate::error::{PublishError, Result};
use crate::hints::ManuscriptHints;
use crate::identifiers::CanonicalDoi;
use crate::pages::first_page_for;
use crate::sequence::{SequenceAssignment, SequenceEngine};
use crate::text::{ABSTRACT_WIDTH, LocalePreference, abstract_paragraphs, keyword_list};

/// Builds [`PublicationRecord`]s from freshly fetched upstream data.
pub struct RecordAssembler<'a> {
    config: &'a AppConfig,
    locale: LocalePreference,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            locale: LocalePreference::new(config.locale.preference.iter().cloned()),
        }
    }

    /// `issue` must be the issue named by `submission.issue_id`, or `None`
    /// when the submission is not assigned to one.
    pub fn assemble(
        &self,
        submission: &SubmissionMetadata,
        issue: Option<&Issue>,
        hints: &ManuscriptHints,
    ) -> Result<PublicationRecord> {
        if let Some(issue) = issue {
            if submission.issue_id != Some(issue.id) {
                return Err(PublishError::Payload(format!(
                    "issue {} is not the issue of submission {}",
                    issue.id, submission.submission_id
                )));
            }
        }

        let title = self.locale.resolve("title", &submission.title)?.clone();
        let abstract_text = self.locale.resolve("abstract", &submission.abstract_text)?.clone();
        let keywords = keyword_list(self.locale.resolve("keywords", &submission.keywords)?);
        let authors = submission
            .authors
            .iter()
            .map(|author| self.resolve_author(author))
            .collect::<Result<Vec<_>>>()?;

        let assignment = self.assign_sequence(submission, issue, hints)?;

        let first_page = match hints.first_page {
            Some(page) => FirstPage::Known { page, after_article: None },
            None => first_page_for(issue, self.config.pages.first_page_policy),
        };

        let placement = issue
            .map(|issue| self.place(submission, issue, hints, &assignment))
            .transpose()?;

        debug!(
            submission = submission.submission_id,
            doi = %assignment.doi,
            first_page = %first_page,
            "assembled publication record"
        );

        Ok(PublicationRecord {
            submission_id: submission.submission_id,
            title,
            abstract_paragraphs: abstract_paragraphs(&abstract_text, ABSTRACT_WIDTH),
            abstract_text,
            keywords,
            authors,
            placement,
            sequence_number: assignment.sequence_number,
            first_page,
            doi: assignment.doi,
            doi_was_preexisting: assignment.preexisting,
        })
    }

    fn resolve_author(&self, author: &Author) -> Result<RecordAuthor> {
        Ok(RecordAuthor {
            given_name: self.locale.resolve("author given name", &author.given_name)?.clone(),
            family_name: self.locale.resolve("author family name", &author.family_name)?.clone(),
            affiliation: self.locale.resolve("author affiliation", &author.affiliation)?.clone(),
        })
    }

    /// Hints override the issue, but a synthesized DOI already names a year
    /// and number, and the placement may not contradict it.
    fn place(
        &self,
        submission: &SubmissionMetadata,
        issue: &Issue,
        hints: &ManuscriptHints,
        assignment: &SequenceAssignment,
    ) -> Result<IssuePlacement> {
        let mut placement = IssuePlacement {
            issue_id: issue.id,
            year: hints.year.unwrap_or(issue.year),
            volume: hints.volume.unwrap_or(issue.volume),
            number: hints.number.unwrap_or(issue.number),
        };

        let doi = CanonicalDoi::parse(&assignment.doi)?;
        if (placement.year, placement.number) != (doi.year, doi.issue_number) {
            warn!(
                submission = submission.submission_id,
                doi = %assignment.doi,
                year = placement.year,
                number = placement.number,
                "issue placement disagrees with the DOI"
            );
            if !assignment.preexisting {
                placement.year = doi.year;
                placement.number = doi.issue_number;
            }
        }
        Ok(placement)
    }

    fn assign_sequence(
        &self,
        submission: &SubmissionMetadata,
        issue: Option<&Issue>,
        hints: &ManuscriptHints,
    ) -> Result<SequenceAssignment> {
        // A DOI registered upstream wins over one typed into the manuscript.
        let existing = submission.existing_doi.as_deref().or(hints.doi.as_deref());

        let Some(issue) = issue else {
            return match existing {
                Some(doi) => SequenceAssignment::from_existing(doi),
                None => Err(PublishError::IssueNotAssigned(submission.submission_id)),
            };
        };

        let no_name = LocalizedText::new();
        let family_name = match (submission.first_author(), existing) {
            (Some(author), _) => &author.family_name,
            (None, Some(_)) => &no_name,
            (None, None) => return Err(PublishError::NoAuthors(submission.submission_id)),
        };

        SequenceEngine::new(&self.config.doi.prefix, &self.locale).derive(issue, existing, family_name)
    }
}
