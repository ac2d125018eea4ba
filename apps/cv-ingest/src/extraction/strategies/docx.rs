use std::io::{Cursor, Read};
use std::sync::LazyLock;

use async_trait::async_trait;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::extraction::chain::{run_blocking, ExtractionStrategy, StrategyError};
use crate::extraction::document::{ExtractedText, RawDocument};
use crate::extraction::strategies::normalize_extracted_text;

const DOCUMENT_PART: &str = "word/document.xml";

static RE_PARAGRAPH_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"</w:p>").unwrap());
static RE_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:(?:br|cr)\b[^>]*/>").unwrap());
static RE_TAB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:tab\b[^>]*/>").unwrap());
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Primary Word strategy: streams the main document part with an XML event
/// reader, keeping paragraph breaks, line breaks and tabs.
pub struct OoxmlStrategy;

#[async_trait]
impl ExtractionStrategy for OoxmlStrategy {
    fn name(&self) -> &'static str {
        "ooxml_document"
    }

    async fn extract(&self, document: &RawDocument) -> Result<ExtractedText, StrategyError> {
        let raw = run_blocking(document, |bytes| {
            let xml = read_part(bytes, DOCUMENT_PART)?;
            parse_document_xml(&xml)
        })
        .await?;

        ExtractedText::new(normalize_extracted_text(&raw), self.name())
    }
}

/// Cross-check Word strategy: scans every text-bearing part of the container
/// (body, headers, footers, notes) with a tag-stripping pass instead of an XML
/// parser, so it still reads documents the event reader rejects.
pub struct WordXmlScanStrategy;

#[async_trait]
impl ExtractionStrategy for WordXmlScanStrategy {
    fn name(&self) -> &'static str {
        "word_xml_scan"
    }

    async fn extract(&self, document: &RawDocument) -> Result<ExtractedText, StrategyError> {
        let raw = run_blocking(document, scan_text_parts).await?;
        ExtractedText::new(normalize_extracted_text(&raw), self.name())
    }
}

fn open_archive(bytes: &[u8]) -> Result<zip::ZipArchive<Cursor<&[u8]>>, StrategyError> {
    zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| StrategyError::Failed(format!("not a Word (OOXML) container: {e}")))
}

fn read_part(bytes: &[u8], name: &str) -> Result<String, StrategyError> {
    let mut archive = open_archive(bytes)?;
    let mut part = archive
        .by_name(name)
        .map_err(|e| StrategyError::Failed(format!("missing {name}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| StrategyError::Failed(format!("failed to read {name}: {e}")))?;
    Ok(xml)
}

fn parse_document_xml(xml: &str) -> Result<String, StrategyError> {
    let mut reader = Reader::from_str(xml);

    let mut text = String::new();
    let mut in_text_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"t" {
                    in_text_element = true;
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_element {
                    // Undeclared entities fail the strategy so the scan can keep the run.
                    let decoded = e.unescape().map_err(|err| {
                        StrategyError::Failed(format!("undecodable text run: {err}"))
                    })?;
                    text.push_str(&decoded);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(StrategyError::Failed(format!(
                    "XML parsing error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    Ok(text)
}

/// Parts that can carry résumé text, body first.
fn is_text_part(name: &str) -> bool {
    let Some(file) = name.strip_prefix("word/") else {
        return false;
    };
    if file.contains('/') || !file.ends_with(".xml") {
        return false;
    }
    file == "document.xml"
        || file.starts_with("header")
        || file.starts_with("footer")
        || file == "footnotes.xml"
        || file == "endnotes.xml"
}

fn scan_text_parts(bytes: &[u8]) -> Result<String, StrategyError> {
    let mut archive = open_archive(bytes)?;

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| is_text_part(n))
        .map(String::from)
        .collect();
    if names.is_empty() {
        return Err(StrategyError::Failed(
            "container has no Word text parts".to_string(),
        ));
    }
    names.sort_by_key(|n| (n.as_str() != DOCUMENT_PART, n.clone()));

    let mut sections = Vec::with_capacity(names.len());
    for name in &names {
        let mut xml = String::new();
        match archive.by_name(name) {
            Ok(mut part) => {
                if part.read_to_string(&mut xml).is_err() {
                    continue;
                }
            }
            Err(_) => continue,
        }
        let text = strip_markup(&xml);
        if !text.trim().is_empty() {
            sections.push(text);
        }
    }

    Ok(sections.join("\n\n"))
}

fn strip_markup(xml: &str) -> String {
    let text = RE_PARAGRAPH_END.replace_all(xml, "\n");
    let text = RE_LINE_BREAK.replace_all(&text, "\n");
    let text = RE_TAB.replace_all(&text, "\t");
    let stripped = RE_TAG.replace_all(&text, "");
    match unescape(&stripped) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => stripped.to_string(),
    }
}
