//! DOCX text extraction.
//!
//! A DOCX file is a ZIP container whose main part, `word/document.xml`, holds
//! the body as a sequence of `<w:p>` paragraphs. Only paragraphs that are
//! direct children of `<w:body>` are collected, so table cells and text boxes
//! are left out. Each paragraph contributes one line, empty ones included.

use std::io::{BufReader, Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::errors::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Embedded objects inside a run. Text boxes live under these and are not
/// part of the paragraph's own text.
const EMBEDDED_ELEMENTS: &[&[u8]] = &[b"drawing", b"pict", b"object", b"AlternateContent"];

pub fn extract_docx_text(data: &[u8]) -> Result<String, ExtractError> {
    let paragraphs = extract_paragraphs(data)?;
    let paragraph_count = paragraphs.len();
    let text = paragraphs.join("\n");

    tracing::info!(paragraph_count, chars = text.len(), "DOCX text extraction complete");
    Ok(text)
}

/// Read the body paragraphs of a DOCX file, in document order.
pub fn extract_paragraphs(data: &[u8]) -> Result<Vec<String>, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut part = archive.by_name(DOCUMENT_PART).map_err(|e| {
        ExtractError::ExtractionFailed(format!("missing {DOCUMENT_PART}: {e}"))
    })?;

    let mut xml = Vec::with_capacity(part.size() as usize);
    part.read_to_end(&mut xml)
        .map_err(|e| ExtractError::ExtractionFailed(format!("failed to read {DOCUMENT_PART}: {e}")))?;

    parse_document_xml(BufReader::new(Cursor::new(xml)))
}

/// Walk `document.xml` and collect the text of every body paragraph.
pub fn parse_document_xml<R: std::io::BufRead>(reader: R) -> Result<Vec<String>, ExtractError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut paragraphs = Vec::new();

    // Depth of the open body paragraph, if any.
    let mut paragraph_depth: Option<usize> = None;
    // Depth of the embedded object being skipped inside that paragraph.
    let mut skip_depth: Option<usize> = None;
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let name = e.local_name().as_ref().to_vec();

                if paragraph_depth.is_none() && name == b"p" && parent_is(&stack, b"body") {
                    paragraph_depth = Some(stack.len());
                    current.clear();
                } else if paragraph_depth.is_some() && skip_depth.is_none() {
                    if EMBEDDED_ELEMENTS.contains(&name.as_slice()) {
                        skip_depth = Some(stack.len());
                    } else if name == b"t" && parent_is(&stack, b"r") {
                        in_text = true;
                    }
                }

                stack.push(name);
            }

            Event::Empty(ref e) => {
                let name = e.local_name();
                let name = name.as_ref();

                if paragraph_depth.is_none() {
                    if name == b"p" && parent_is(&stack, b"body") {
                        paragraphs.push(String::new());
                    }
                } else if skip_depth.is_none() && parent_is(&stack, b"r") {
                    match name {
                        b"tab" => current.push('\t'),
                        b"br" | b"cr" => current.push('\n'),
                        b"noBreakHyphen" => current.push('-'),
                        _ => {}
                    }
                }
            }

            Event::Text(ref e) => {
                if in_text {
                    current.push_str(&e.unescape()?);
                }
            }

            Event::CData(ref e) => {
                if in_text {
                    current.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }

            Event::End(_) => {
                let closed = stack.pop();

                if in_text && closed.as_deref() == Some(b"t".as_slice()) {
                    in_text = false;
                }

                if skip_depth == Some(stack.len()) {
                    skip_depth = None;
                }

                if paragraph_depth == Some(stack.len()) {
                    paragraphs.push(std::mem::take(&mut current));
                    paragraph_depth = None;
                    in_text = false;
                }
            }

            Event::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if paragraph_depth.is_some() {
        return Err(ExtractError::ExtractionFailed(
            "document.xml ended inside a paragraph".to_string(),
        ));
    }

    Ok(paragraphs)
}

fn parent_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().is_some_and(|top| top.as_slice() == name)
}
