//! Shared string table loading

use std::io::{Read, Seek};
use tracing::debug;

use super::xml::{PartEvent, PartReader};
use super::{Package, SHARED_STRINGS_PART};
use crate::error::{ExtractError, Result};

/// Ordered pool of strings referenced by index from `t="s"` cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    strings: Vec<String>,
}

impl SharedStrings {
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// String at `index`, failing when the index is past the end of the table
    pub fn get(&self, index: usize) -> Result<&str> {
        self.strings
            .get(index)
            .map(String::as_str)
            .ok_or(ExtractError::SharedStringIndex {
                index,
                len: self.strings.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for SharedStrings {
    fn from(strings: Vec<String>) -> Self {
        Self { strings }
    }
}

/// Load the shared string table; a package without one yields an empty table
pub fn load_shared_strings<R: Read + Seek>(package: &mut Package<R>) -> Result<SharedStrings> {
    let Some(bytes) = package.read_optional_part(SHARED_STRINGS_PART)? else {
        debug!("no shared string table in package");
        return Ok(SharedStrings::default());
    };

    let strings = parse_shared_strings(&bytes)?;
    debug!(count = strings.len(), "loaded shared strings");
    Ok(strings)
}

/// Only a `t` directly under `si` is taken; run-structured items flatten to ""
fn parse_shared_strings(bytes: &[u8]) -> Result<SharedStrings> {
    let mut reader = PartReader::new(SHARED_STRINGS_PART, bytes);
    let mut strings = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    while let Some(event) = reader.next()? {
        match event {
            PartEvent::Open(_) if reader.at(&["si"]) => current = None,
            PartEvent::Open(_) if reader.at(&["si", "t"]) => {
                // A second direct `t` is ignored, the first one wins
                in_text = current.is_none();
                if in_text {
                    current = Some(String::new());
                }
            }
            PartEvent::Text(text) if in_text => {
                if let Some(current) = current.as_mut() {
                    current.push_str(&text);
                }
            }
            PartEvent::Close if reader.at(&["si", "t"]) => in_text = false,
            PartEvent::Close if reader.at(&["si"]) => {
                strings.push(current.take().unwrap_or_default());
            }
            _ => {}
        }
    }

    Ok(SharedStrings::from(strings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::test_support::package;

    const SST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="5" uniqueCount="5">
<si><t>Squat</t></si>
<si><t xml:space="preserve"> Bench Press </t></si>
<si><r><rPr><b/></rPr><t>Rich</t></r><r><t>Text</t></r></si>
<si><t/></si>
<si><t>Deadlift</t><rPh sb="0" eb="1"><t>phonetic</t></rPh></si>
</sst>"#;

    #[test]
    fn test_load_shared_strings() {
        let mut package = package(&[(SHARED_STRINGS_PART, SST)]);
        let strings = load_shared_strings(&mut package).unwrap();

        let all: Vec<&str> = strings.iter().collect();
        assert_eq!(all, vec!["Squat", " Bench Press ", "", "", "Deadlift"]);
    }

    #[test]
    fn test_missing_part_is_empty_table() {
        let mut package = package(&[("xl/workbook.xml", "<workbook/>")]);
        let strings = load_shared_strings(&mut package).unwrap();

        assert!(strings.is_empty());
    }

    #[test]
    fn test_index_lookup() {
        let strings = SharedStrings::from(vec!["a".to_string(), "b".to_string()]);

        for (i, expected) in strings.iter().enumerate() {
            assert_eq!(strings.get(i).unwrap(), expected);
        }
        assert!(matches!(
            strings.get(2),
            Err(ExtractError::SharedStringIndex { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_entities_are_decoded() {
        let xml = r#"<sst><si><t>Clean &amp; Jerk</t></si></sst>"#;
        let strings = parse_shared_strings(xml.as_bytes()).unwrap();

        assert_eq!(strings.get(0).unwrap(), "Clean & Jerk");
    }
}
