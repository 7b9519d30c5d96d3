//! Event reader over a package part that tracks the open element path
//!
//! Parts are small, so each one is read fully into memory and decoded from a
//! byte slice. Element names are compared by local name, which keeps the
//! parsers independent of the namespace prefixes a producer chose.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ExtractError, Result};

/// Decoded XML event, reduced to what the part parsers need
pub(crate) enum PartEvent<'a> {
    /// An element opened; the path already includes it
    Open(BytesStart<'a>),
    /// Unescaped character data (text or CDATA)
    Text(String),
    /// An element closed; the path still includes it until the next read
    Close,
}

pub(crate) struct PartReader<'a> {
    part: &'a str,
    reader: Reader<&'a [u8]>,
    path: Vec<Vec<u8>>,
    pending_close: bool,
}

impl<'a> PartReader<'a> {
    pub(crate) fn new(part: &'a str, bytes: &'a [u8]) -> Self {
        let mut reader = Reader::from_reader(bytes);
        let config = reader.config_mut();
        config.trim_text(false);
        config.expand_empty_elements = true;

        Self {
            part,
            reader,
            path: Vec::new(),
            pending_close: false,
        }
    }

    /// Read the next relevant event, or `None` at end of document
    pub(crate) fn next(&mut self) -> Result<Option<PartEvent<'a>>> {
        if self.pending_close {
            self.path.pop();
            self.pending_close = false;
        }

        let part = self.part;
        loop {
            let event = self
                .reader
                .read_event()
                .map_err(|e| ExtractError::xml(part, e))?;

            match event {
                Event::Start(e) => {
                    self.path.push(e.local_name().as_ref().to_vec());
                    return Ok(Some(PartEvent::Open(e)));
                }
                Event::End(_) => {
                    self.pending_close = true;
                    return Ok(Some(PartEvent::Close));
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|e| ExtractError::xml(part, e))?;
                    return Ok(Some(PartEvent::Text(text.into_owned())));
                }
                Event::CData(e) => {
                    return Ok(Some(PartEvent::Text(
                        String::from_utf8_lossy(e.as_ref()).into_owned(),
                    )));
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    /// Whether the current element path, below the root element, is exactly `names`
    pub(crate) fn at(&self, names: &[&str]) -> bool {
        self.path.len() == names.len() + 1
            && self.path[1..]
                .iter()
                .zip(names)
                .all(|(open, name)| open.as_slice() == name.as_bytes())
    }

    /// Unescaped value of the attribute with the given local name
    pub(crate) fn attribute(
        &self,
        element: &BytesStart<'_>,
        name: &str,
    ) -> Result<Option<String>> {
        for attr in element.attributes() {
            let attr = attr.map_err(|e| ExtractError::xml(self.part, e))?;
            if attr.key.local_name().as_ref() == name.as_bytes() {
                let value = attr
                    .unescape_value()
                    .map_err(|e| ExtractError::xml(self.part, e))?;
                return Ok(Some(value.into_owned()));
            }
        }
        Ok(None)
    }

    /// Attribute parsed as a number; absent attributes yield `None`
    pub(crate) fn parse_attribute<T: std::str::FromStr>(
        &self,
        element: &BytesStart<'_>,
        name: &'static str,
    ) -> Result<Option<T>> {
        self.attribute(element, name)?
            .map(|value| {
                value.trim().parse().map_err(|_| ExtractError::InvalidNumber {
                    part: self.part.to_string(),
                    field: name,
                    value,
                })
            })
            .transpose()
    }
}
