//! Sheet declarations and workbook relationships

use std::collections::HashMap;
use std::io::{Read, Seek};
use tracing::debug;

use super::xml::{PartEvent, PartReader};
use super::{Package, WORKBOOK_PART, WORKBOOK_RELS_PART};
use crate::error::Result;

/// A sheet as declared in `xl/workbook.xml`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetMeta {
    pub name: String,
    pub sheet_id: String,
    pub relationship_id: String,
}

/// Relationship id to worksheet part path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipMap {
    targets: HashMap<String, String>,
}

impl RelationshipMap {
    /// Part path for a relationship id, if the relationship exists
    pub fn resolve(&self, relationship_id: &str) -> Option<&str> {
        self.targets.get(relationship_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Enumerate sheets in declaration order
pub fn load_sheets<R: Read + Seek>(package: &mut Package<R>) -> Result<Vec<SheetMeta>> {
    let bytes = package.read_part(WORKBOOK_PART)?;
    let sheets = parse_sheets(&bytes)?;
    debug!(count = sheets.len(), "loaded sheet declarations");
    Ok(sheets)
}

/// Map every workbook relationship to its part path inside the package
pub fn load_relationships<R: Read + Seek>(package: &mut Package<R>) -> Result<RelationshipMap> {
    let bytes = package.read_part(WORKBOOK_RELS_PART)?;
    let relationships = parse_relationships(&bytes)?;
    debug!(count = relationships.len(), "loaded workbook relationships");
    Ok(relationships)
}

fn parse_sheets(bytes: &[u8]) -> Result<Vec<SheetMeta>> {
    let mut reader = PartReader::new(WORKBOOK_PART, bytes);
    let mut sheets = Vec::new();

    while let Some(event) = reader.next()? {
        if let PartEvent::Open(e) = event {
            if !reader.at(&["sheets", "sheet"]) {
                continue;
            }

            let name = reader.attribute(&e, "name")?.unwrap_or_default();
            // `r:id`, matched by local name
            let Some(relationship_id) = reader.attribute(&e, "id")? else {
                debug!(sheet = %name, "sheet has no relationship id");
                continue;
            };

            sheets.push(SheetMeta {
                name,
                sheet_id: reader.attribute(&e, "sheetId")?.unwrap_or_default(),
                relationship_id,
            });
        }
    }

    Ok(sheets)
}

fn parse_relationships(bytes: &[u8]) -> Result<RelationshipMap> {
    let mut reader = PartReader::new(WORKBOOK_RELS_PART, bytes);
    let mut targets = HashMap::new();

    while let Some(event) = reader.next()? {
        if let PartEvent::Open(e) = event {
            if !reader.at(&["Relationship"]) {
                continue;
            }

            let id = reader.attribute(&e, "Id")?;
            let target = reader.attribute(&e, "Target")?;
            if let (Some(id), Some(target)) = (id, target) {
                targets.insert(id, part_path(&target));
            }
        }
    }

    Ok(RelationshipMap { targets })
}

/// Targets are relative to `xl/` unless package-absolute
fn part_path(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::reader::test_support::package;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<workbookPr/>
<sheets>
  <sheet name="Upper Body" sheetId="1" r:id="rId1"/>
  <sheet name="Lower Body" sheetId="3" r:id="rId2"/>
</sheets>
<definedNames><definedName name="sheet">Upper Body!$A$1</definedName></definedNames>
</workbook>"#;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="/xl/worksheets/sheet2.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

    #[test]
    fn test_load_sheets_in_declaration_order() {
        let mut package = package(&[(WORKBOOK_PART, WORKBOOK)]);
        let sheets = load_sheets(&mut package).unwrap();

        assert_eq!(
            sheets,
            vec![
                SheetMeta {
                    name: "Upper Body".to_string(),
                    sheet_id: "1".to_string(),
                    relationship_id: "rId1".to_string(),
                },
                SheetMeta {
                    name: "Lower Body".to_string(),
                    sheet_id: "3".to_string(),
                    relationship_id: "rId2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_load_relationships() {
        let mut package = package(&[(WORKBOOK_RELS_PART, RELS)]);
        let rels = load_relationships(&mut package).unwrap();

        assert_eq!(rels.len(), 3);
        assert_eq!(rels.resolve("rId1"), Some("xl/worksheets/sheet1.xml"));
        assert_eq!(rels.resolve("rId2"), Some("xl/worksheets/sheet2.xml"));
        assert_eq!(rels.resolve("rId9"), None);
    }

    #[test]
    fn test_workbook_part_is_mandatory() {
        let mut package = package(&[(WORKBOOK_RELS_PART, RELS)]);

        assert!(matches!(
            load_sheets(&mut package),
            Err(ExtractError::MissingPart(_))
        ));
    }
}
