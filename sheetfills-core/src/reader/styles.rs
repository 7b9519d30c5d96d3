//! Fill and cell format tables from `xl/styles.xml`

use serde::Serialize;
use std::io::{Read, Seek};
use tracing::debug;

use super::xml::{PartEvent, PartReader};
use super::{Package, STYLES_PART};
use crate::error::Result;

/// Foreground color of a pattern fill, attribute text kept exactly as present.
///
/// Equality compares the source text, so `tint="NaN"` matches itself and
/// `0.5` differs from `0.50`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FillDescriptor {
    pub rgb: Option<String>,
    pub theme: Option<String>,
    pub tint: Option<String>,
}

/// Fills and the fill reference of every cell format (`cellXfs/xf`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleTable {
    /// `None` where a fill has no pattern fill or no foreground color
    pub fills: Vec<Option<FillDescriptor>>,
    /// Indexed by the `s` attribute of a cell
    pub format_fill_refs: Vec<usize>,
}

impl StyleTable {
    /// Fill applied by a cell format; unknown formats fall back to fill 0
    /// and unknown fills to no fill
    pub fn fill_for_style(&self, style_index: usize) -> Option<&FillDescriptor> {
        let fill_id = self
            .format_fill_refs
            .get(style_index)
            .copied()
            .unwrap_or(0);
        self.fills.get(fill_id).and_then(Option::as_ref)
    }
}

/// Load fills and cell formats; a package without styles yields empty tables
pub fn load_styles<R: Read + Seek>(package: &mut Package<R>) -> Result<StyleTable> {
    let Some(bytes) = package.read_optional_part(STYLES_PART)? else {
        debug!("no styles in package");
        return Ok(StyleTable::default());
    };

    let styles = parse_styles(&bytes)?;
    debug!(
        fills = styles.fills.len(),
        formats = styles.format_fill_refs.len(),
        "loaded styles"
    );
    Ok(styles)
}

fn parse_styles(bytes: &[u8]) -> Result<StyleTable> {
    let mut reader = PartReader::new(STYLES_PART, bytes);
    let mut styles = StyleTable::default();
    let mut current_fill: Option<FillDescriptor> = None;
    let mut in_pattern_fill = false;
    let mut seen_pattern_fill = false;

    while let Some(event) = reader.next()? {
        match event {
            PartEvent::Open(_) if reader.at(&["fills", "fill"]) => {
                current_fill = None;
                in_pattern_fill = false;
                seen_pattern_fill = false;
            }
            PartEvent::Open(_) if reader.at(&["fills", "fill", "patternFill"]) => {
                // Later pattern fills in the same fill are not consulted
                in_pattern_fill = !seen_pattern_fill;
                seen_pattern_fill = true;
            }
            PartEvent::Open(e) if reader.at(&["fills", "fill", "patternFill", "fgColor"]) => {
                // Only the first foreground color of a pattern fill counts
                if in_pattern_fill && current_fill.is_none() {
                    current_fill = Some(FillDescriptor {
                        rgb: reader.attribute(&e, "rgb")?,
                        theme: reader.attribute(&e, "theme")?,
                        tint: reader.attribute(&e, "tint")?,
                    });
                }
            }
            PartEvent::Close if reader.at(&["fills", "fill", "patternFill"]) => {
                in_pattern_fill = false;
            }
            PartEvent::Close if reader.at(&["fills", "fill"]) => {
                styles.fills.push(current_fill.take());
            }
            PartEvent::Open(e) if reader.at(&["cellXfs", "xf"]) => {
                let fill_id = reader.parse_attribute::<usize>(&e, "fillId")?.unwrap_or(0);
                styles.format_fill_refs.push(fill_id);
            }
            _ => {}
        }
    }

    Ok(styles)
}
