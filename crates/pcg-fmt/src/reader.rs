//! Reads an existing configuration document back into a tree.

use std::fmt::Display;

use pcg_core::{ErrorInfo, PcgError};
use pcg_doc::{Document, Element};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

/// Parses configuration text into a document tree.
///
/// Comments, processing instructions, the doctype and whitespace are
/// dropped. Any other text content is rejected, as is a document with no
/// root or more than one.
pub fn parse_document(text: &str) -> Result<Document, PcgError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut version = None;
    let mut encoding = None;
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let offset = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|err| parse_error("xml-syntax", err, offset))?;
        match event {
            Event::Decl(decl) => {
                let declared = decl
                    .version()
                    .map_err(|err| parse_error("xml-declaration", err, offset))?;
                version = Some(utf8(&declared, offset)?);
                if let Some(declared) = decl.encoding() {
                    let declared =
                        declared.map_err(|err| parse_error("xml-declaration", err, offset))?;
                    encoding = Some(utf8(&declared, offset)?);
                }
            }
            Event::Start(start) => open.push(element(&start, offset)?),
            Event::Empty(start) => {
                let element = element(&start, offset)?;
                attach(&mut open, &mut root, element, offset)?;
            }
            Event::End(_) => {
                let Some(element) = open.pop() else {
                    return Err(parse_error(
                        "xml-syntax",
                        "closing tag without an open element",
                        offset,
                    ));
                };
                attach(&mut open, &mut root, element, offset)?;
            }
            Event::Text(content) => {
                let content = content
                    .unescape()
                    .map_err(|err| parse_error("xml-syntax", err, offset))?;
                if !content.trim().is_empty() {
                    return Err(unexpected_text(content.trim(), offset));
                }
            }
            Event::CData(content) => {
                return Err(unexpected_text(
                    &String::from_utf8_lossy(&content),
                    offset,
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(PcgError::Serde(
            ErrorInfo::new("xml-syntax", "document ends inside an open element")
                .with_context("element", unclosed.tag.clone()),
        ));
    }
    let Some(root) = root else {
        return Err(PcgError::Serde(ErrorInfo::new(
            "empty-document",
            "document has no root element",
        )));
    };

    let mut document = Document::new(root);
    if let Some(version) = version {
        document.version = version;
    }
    if let Some(encoding) = encoding {
        document.encoding = encoding;
    }
    debug!(
        root = %document.root.tag,
        children = document.root.children.len(),
        "document parsed"
    );
    Ok(document)
}

fn element(start: &BytesStart<'_>, offset: u64) -> Result<Element, PcgError> {
    let mut element = Element::new(utf8(start.name().as_ref(), offset)?);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| parse_error("xml-attribute", err, offset))?;
        let value = attribute
            .unescape_value()
            .map_err(|err| parse_error("xml-attribute", err, offset))?;
        element = element.attr(utf8(attribute.key.as_ref(), offset)?, value.into_owned());
    }
    Ok(element)
}

/// Hands a finished element to its parent, or makes it the root.
fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    offset: u64,
) -> Result<(), PcgError> {
    if let Some(parent) = open.last_mut() {
        parent.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(PcgError::Serde(
            ErrorInfo::new("multiple-roots", "document has more than one root element")
                .with_context("element", element.tag)
                .with_context("offset", offset.to_string()),
        ));
    }
    *root = Some(element);
    Ok(())
}

fn utf8(bytes: &[u8], offset: u64) -> Result<String, PcgError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| parse_error("xml-encoding", err, offset))
}

fn unexpected_text(content: &str, offset: u64) -> PcgError {
    PcgError::Serde(
        ErrorInfo::new(
            "unexpected-text",
            "text content has no place in a configuration document",
        )
        .with_context("text", content)
        .with_context("offset", offset.to_string()),
    )
}

fn parse_error(code: &str, err: impl Display, offset: u64) -> PcgError {
    PcgError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("offset", offset.to_string()),
    )
}
