//! JATS 1.2 front matter for the journal's hosting platform.

use ccrpress_core::config::JournalConfig;
use ccrpress_core::models::PublicationRecord;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::CitationRenderer;
use crate::error::{PublishError, Result};

const DOCTYPE: &str = r#"article PUBLIC "-//NLM//DTD JATS (Z39.96) Journal Publishing DTD v1.2 20190208//EN" "JATS-journalpublishing1.dtd""#;

#[derive(Debug, Clone)]
pub struct JatsRenderer {
    journal: JournalConfig,
}

impl JatsRenderer {
    pub fn new(journal: JournalConfig) -> Self {
        Self { journal }
    }

    pub fn render_string(&self, record: &PublicationRecord) -> Result<String> {
        let bytes = self.render(record)?;
        String::from_utf8(bytes).map_err(|e| PublishError::Render(e.to_string()))
    }
}

impl CitationRenderer for JatsRenderer {
    fn render(&self, record: &PublicationRecord) -> Result<Vec<u8>> {
        let mut doc = JatsWriter::new();
        doc.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        doc.event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;

        doc.open(
            "article",
            &[
                ("xmlns:xlink", "http://www.w3.org/1999/xlink"),
                ("article-type", "research-article"),
                ("dtd-version", "1.2"),
                ("xml:lang", "en"),
            ],
        )?;
        doc.open("front", &[])?;
        self.journal_meta(&mut doc)?;
        article_meta(&mut doc, record)?;
        doc.close("front")?;
        doc.close("article")?;

        Ok(doc.finish())
    }
}

impl JatsRenderer {
    fn journal_meta(&self, doc: &mut JatsWriter) -> Result<()> {
        doc.open("journal-meta", &[])?;
        doc.leaf(
            "journal-id",
            &[("journal-id-type", "publisher-id")],
            &self.journal.abbrev_title,
        )?;
        doc.open("journal-title-group", &[])?;
        doc.leaf("journal-title", &[], &self.journal.title)?;
        doc.leaf("abbrev-journal-title", &[], &self.journal.abbrev_title)?;
        doc.close("journal-title-group")?;
        if let Some(issn) = &self.journal.issn {
            doc.leaf("issn", &[("pub-type", "epub")], issn)?;
        }
        doc.open("publisher", &[])?;
        doc.leaf("publisher-name", &[], &self.journal.publisher)?;
        doc.close("publisher")?;
        doc.close("journal-meta")
    }
}

fn article_meta(doc: &mut JatsWriter, record: &PublicationRecord) -> Result<()> {
    doc.open("article-meta", &[])?;
    doc.leaf("article-id", &[("pub-id-type", "doi")], &record.doi)?;

    doc.open("title-group", &[])?;
    doc.leaf("article-title", &[], &record.title)?;
    doc.close("title-group")?;

    // Identical affiliations share one <aff>.
    let mut affiliations: Vec<&str> = Vec::new();
    let mut aff_ids = Vec::with_capacity(record.authors.len());
    for author in &record.authors {
        let affiliation = author.affiliation.trim();
        if affiliation.is_empty() {
            aff_ids.push(None);
            continue;
        }
        let index = match affiliations.iter().position(|a| *a == affiliation) {
            Some(i) => i,
            None => {
                affiliations.push(affiliation);
                affiliations.len() - 1
            }
        };
        aff_ids.push(Some(format!("aff{}", index + 1)));
    }

    doc.open("contrib-group", &[])?;
    for (author, aff_id) in record.authors.iter().zip(&aff_ids) {
        doc.open("contrib", &[("contrib-type", "author")])?;
        doc.open("name", &[])?;
        doc.leaf("surname", &[], &author.family_name)?;
        doc.leaf("given-names", &[], &author.given_name)?;
        doc.close("name")?;
        if let Some(rid) = aff_id {
            doc.empty("xref", &[("ref-type", "aff"), ("rid", rid.as_str())])?;
        }
        doc.close("contrib")?;
    }
    doc.close("contrib-group")?;

    for (i, affiliation) in affiliations.iter().enumerate() {
        let id = format!("aff{}", i + 1);
        doc.leaf("aff", &[("id", id.as_str())], affiliation)?;
    }

    if let Some(placement) = &record.placement {
        doc.open("pub-date", &[("pub-type", "epub")])?;
        doc.leaf("year", &[], &placement.year.to_string())?;
        doc.close("pub-date")?;
        doc.leaf("volume", &[], &placement.volume.to_string())?;
        doc.leaf("issue", &[], &placement.number.to_string())?;
    }
    if let Some(page) = record.first_page.page() {
        doc.leaf("fpage", &[], &page.to_string())?;
    }

    doc.open("abstract", &[])?;
    for paragraph in &record.abstract_paragraphs {
        doc.leaf("p", &[], paragraph)?;
    }
    doc.close("abstract")?;

    if !record.keywords.is_empty() {
        doc.open("kwd-group", &[("kwd-group-type", "author")])?;
        for keyword in &record.keywords {
            doc.leaf("kwd", &[], keyword)?;
        }
        doc.close("kwd-group")?;
    }

    doc.close("article-meta")
}

struct JatsWriter {
    writer: Writer<Vec<u8>>,
}

impl JatsWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| PublishError::Render(e.to_string()))
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(start))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(start))
    }

    fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.open(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}
