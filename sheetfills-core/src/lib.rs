//! sheetfills-core: XLSX header columns grouped by fill color
//!
//! The package is read directly as a ZIP archive. Shared strings, fills, cell
//! formats and sheet relationships are decoded from their XML parts, then the
//! first row of every worksheet is split into runs of headers sharing a fill.

pub mod config;
pub mod error;
pub mod headers;
pub mod reader;
pub mod report;

use std::io::{Read, Seek};
use std::sync::Arc;
use tracing::{debug, warn};

pub use config::{ConfigError, ExtractorConfig};
pub use error::{ExtractError, Result, SharedPart};
pub use headers::{HeaderCell, HeaderGroup, group_headers, resolve_header_cells};
pub use reader::{FillDescriptor, Package, SharedStrings, SheetMeta, StyleTable};
pub use report::{ExtractionReport, SheetMap, SheetReport};

/// Run the whole extraction; failures become part of the report
pub fn extract(config: &ExtractorConfig) -> ExtractionReport {
    let result = try_extract(config);
    if let Err(e) = &result {
        warn!(path = %config.source_path.display(), error = %e, "extraction failed");
    }
    ExtractionReport::from(result)
}

/// Open the configured document and extract every sheet
pub fn try_extract(config: &ExtractorConfig) -> Result<SheetMap> {
    let mut package = Package::open(&config.source_path)?;
    extract_package(&mut package)
}

/// Extract all sheets of an opened package.
///
/// Errors here concern the package as a whole: the workbook and its
/// relationships. A shared-strings or styles part that fails to load, and any
/// failure inside one worksheet, is recorded against each affected sheet while
/// the remaining sheets still run.
pub fn extract_package<R: Read + Seek>(package: &mut Package<R>) -> Result<SheetMap> {
    let shared_strings = load_shared_part(reader::load_shared_strings(package));
    let styles = load_shared_part(reader::load_styles(package));
    let sheets = reader::load_sheets(package)?;
    let relationships = reader::load_relationships(package)?;

    let mut result = SheetMap::default();
    for sheet in &sheets {
        let Some(part) = relationships.resolve(&sheet.relationship_id) else {
            warn!(
                sheet = %sheet.name,
                relationship = %sheet.relationship_id,
                "skipping sheet with unresolved relationship"
            );
            continue;
        };

        let outcome = match extract_sheet(
            package,
            part,
            shared_strings.as_ref(),
            styles.as_ref(),
        ) {
            Ok(Some(groups)) => Ok(groups),
            Ok(None) => {
                warn!(sheet = %sheet.name, part, "skipping sheet without rows");
                continue;
            }
            Err(e) => {
                warn!(sheet = %sheet.name, part, error = %e, "sheet extraction failed");
                Err(e)
            }
        };

        debug!(sheet = %sheet.name, sheet_id = %sheet.sheet_id, "extracted sheet");
        result.insert(sheet.name.clone(), SheetReport::from(outcome));
    }

    Ok(result)
}

fn load_shared_part<T>(result: Result<T>) -> SharedPart<T> {
    result.map_err(|e| {
        warn!(error = %e, "failed to load part; sheets with rows will report it");
        Arc::new(e)
    })
}

/// Header groups of one worksheet part, or `None` if it has no rows.
///
/// A failed shared-strings or styles load is only reported once the worksheet
/// is known to have a header row, so empty sheets stay omitted.
pub fn extract_sheet<R: Read + Seek>(
    package: &mut Package<R>,
    part: &str,
    shared_strings: std::result::Result<&SharedStrings, &Arc<ExtractError>>,
    styles: std::result::Result<&StyleTable, &Arc<ExtractError>>,
) -> Result<Option<Vec<HeaderGroup>>> {
    let Some(raw_cells) = reader::read_header_row(package, part)? else {
        return Ok(None);
    };

    let shared_strings = shared_strings.map_err(|e| ExtractError::Dependency(Arc::clone(e)))?;
    let styles = styles.map_err(|e| ExtractError::Dependency(Arc::clone(e)))?;
    let cells = resolve_header_cells(part, &raw_cells, shared_strings, styles)?;
    Ok(Some(group_headers(cells)))
}
