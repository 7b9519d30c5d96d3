//! Header cell resolution and grouping by fill

use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::reader::{FillDescriptor, RawCell, SharedStrings, StyleTable};

/// A resolved header cell
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub text: String,
    pub fill: Option<FillDescriptor>,
}

/// A maximal run of adjacent headers sharing one fill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderGroup {
    #[serde(rename = "style")]
    pub fill: Option<FillDescriptor>,
    #[serde(rename = "exercises")]
    pub headers: Vec<String>,
}

/// Resolve text and fill of every raw header cell, in order
pub fn resolve_header_cells(
    part: &str,
    cells: &[RawCell],
    shared_strings: &SharedStrings,
    styles: &StyleTable,
) -> Result<Vec<HeaderCell>> {
    cells
        .iter()
        .map(|cell| {
            Ok(HeaderCell {
                text: resolve_text(part, cell, shared_strings)?,
                fill: styles.fill_for_style(cell.style_index).cloned(),
            })
        })
        .collect()
}

fn resolve_text(part: &str, cell: &RawCell, shared_strings: &SharedStrings) -> Result<String> {
    let Some(value) = cell.value.as_deref() else {
        return Ok(String::new());
    };

    if !cell.is_shared_string() {
        return Ok(value.to_string());
    }

    let index = value
        .trim()
        .parse::<usize>()
        .map_err(|_| ExtractError::InvalidNumber {
            part: part.to_string(),
            field: "shared string index",
            value: value.to_string(),
        })?;
    Ok(shared_strings.get(index)?.to_string())
}

/// Partition headers into runs of equal fill, preserving order
pub fn group_headers(cells: Vec<HeaderCell>) -> Vec<HeaderGroup> {
    let mut groups = Vec::new();
    let mut current: Option<HeaderGroup> = None;

    for cell in cells {
        match current.as_mut() {
            Some(group) if group.fill == cell.fill => group.headers.push(cell.text),
            _ => {
                if let Some(group) = current.take() {
                    groups.push(group);
                }
                current = Some(HeaderGroup {
                    fill: cell.fill,
                    headers: vec![cell.text],
                });
            }
        }
    }

    groups.extend(current);
    groups
}
