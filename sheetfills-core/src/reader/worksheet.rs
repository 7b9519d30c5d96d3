//! Header row decoding from a worksheet part

use std::io::{Read, Seek};

use super::Package;
use super::xml::{PartEvent, PartReader};
use crate::error::Result;

/// Cell type marker for shared-string cells
pub const SHARED_STRING_TYPE: &str = "s";

/// A cell of the header row before its text and fill are resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    /// `t` attribute
    pub cell_type: Option<String>,
    /// `s` attribute, 0 when absent
    pub style_index: usize,
    /// Content of the `v` child, `None` when the cell has no value node
    pub value: Option<String>,
}

impl RawCell {
    pub fn is_shared_string(&self) -> bool {
        self.cell_type.as_deref() == Some(SHARED_STRING_TYPE)
    }
}

/// Cells of the first row record in the worksheet, or `None` if it has no rows.
///
/// The first `row` element is the header regardless of its `r` attribute. The
/// remainder of the part is still decoded so that malformed XML is reported.
pub fn read_header_row<R: Read + Seek>(
    package: &mut Package<R>,
    part: &str,
) -> Result<Option<Vec<RawCell>>> {
    let bytes = package.read_part(part)?;
    parse_header_row(part, &bytes)
}

fn parse_header_row(part: &str, bytes: &[u8]) -> Result<Option<Vec<RawCell>>> {
    let mut reader = PartReader::new(part, bytes);
    let mut header: Option<Vec<RawCell>> = None;
    let mut in_header = false;
    let mut cell: Option<RawCell> = None;
    let mut in_value = false;

    while let Some(event) = reader.next()? {
        match event {
            PartEvent::Open(_) if reader.at(&["sheetData", "row"]) => {
                in_header = header.is_none();
                if in_header {
                    header = Some(Vec::new());
                }
            }
            PartEvent::Open(e) if in_header && reader.at(&["sheetData", "row", "c"]) => {
                cell = Some(RawCell {
                    cell_type: reader.attribute(&e, "t")?,
                    style_index: reader.parse_attribute(&e, "s")?.unwrap_or(0),
                    value: None,
                });
            }
            PartEvent::Open(_) if in_header && reader.at(&["sheetData", "row", "c", "v"]) => {
                if let Some(cell) = cell.as_mut() {
                    in_value = cell.value.is_none();
                    if in_value {
                        cell.value = Some(String::new());
                    }
                }
            }
            PartEvent::Text(text) if in_value => {
                if let Some(value) = cell.as_mut().and_then(|c| c.value.as_mut()) {
                    value.push_str(&text);
                }
            }
            PartEvent::Close if in_header && reader.at(&["sheetData", "row", "c", "v"]) => {
                in_value = false;
            }
            PartEvent::Close if in_header && reader.at(&["sheetData", "row", "c"]) => {
                if let (Some(cell), Some(header)) = (cell.take(), header.as_mut()) {
                    header.push(cell);
                }
            }
            PartEvent::Close if reader.at(&["sheetData", "row"]) => in_header = false,
            _ => {}
        }
    }

    Ok(header)
}
