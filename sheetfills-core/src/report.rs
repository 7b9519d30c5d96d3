//! Extraction result and its JSON shape

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ExtractError;
use crate::headers::HeaderGroup;

/// Outcome of one sheet: its header groups or the reason it failed
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum SheetReport {
    Groups(Vec<HeaderGroup>),
    Failed { error: String },
}

impl From<Result<Vec<HeaderGroup>, ExtractError>> for SheetReport {
    fn from(result: Result<Vec<HeaderGroup>, ExtractError>) -> Self {
        match result {
            Ok(groups) => SheetReport::Groups(groups),
            Err(e) => SheetReport::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// Sheet name to outcome, serialized as an object in workbook order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetMap {
    entries: Vec<(String, SheetReport)>,
}

impl SheetMap {
    /// Insert or replace; a replaced entry keeps its original position
    pub fn insert(&mut self, name: String, report: SheetReport) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = report,
            None => self.entries.push((name, report)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SheetReport> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, report)| report)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SheetMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, report) in &self.entries {
            map.serialize_entry(name, report)?;
        }
        map.end()
    }
}

/// Result of a whole run: every sheet, or a single error when the document is unusable
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ExtractionReport {
    Failed { error: String },
    Sheets(SheetMap),
}

impl From<Result<SheetMap, ExtractError>> for ExtractionReport {
    fn from(result: Result<SheetMap, ExtractError>) -> Self {
        match result {
            Ok(sheets) => ExtractionReport::Sheets(sheets),
            Err(e) => ExtractionReport::Failed {
                error: e.to_string(),
            },
        }
    }
}
