//! Direct access to the parts of an XLSX package

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{ExtractError, Result};

pub mod shared_strings;
pub mod styles;
pub mod workbook;
pub mod worksheet;
pub(crate) mod xml;

pub use shared_strings::{SharedStrings, load_shared_strings};
pub use styles::{FillDescriptor, StyleTable, load_styles};
pub use workbook::{RelationshipMap, SheetMeta, load_relationships, load_sheets};
pub use worksheet::{RawCell, read_header_row};

pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
pub const STYLES_PART: &str = "xl/styles.xml";
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";

/// Upper bound for preallocating a part buffer from its declared size
const PART_CAPACITY_LIMIT: usize = 1 << 20;

/// An opened spreadsheet package; the archive handle lives as long as this value
pub struct Package<R> {
    archive: ZipArchive<R>,
}

impl Package<BufReader<File>> {
    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ExtractError::FileNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let package = Self::from_reader(BufReader::new(file))?;
        debug!(path = %path.display(), parts = package.archive.len(), "opened package");
        Ok(package)
    }
}

impl<R: Read + Seek> Package<R> {
    /// Wrap any seekable reader holding ZIP data
    pub fn from_reader(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Read a whole part into memory
    pub fn read_part(&mut self, name: &str) -> Result<Vec<u8>> {
        self.read_optional_part(name)?
            .ok_or_else(|| ExtractError::MissingPart(name.to_string()))
    }

    /// Read a part, returning `None` when the package does not contain it
    pub fn read_optional_part(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        // Declared sizes are untrusted; read_to_end grows past the cap as needed
        let capacity = usize::try_from(file.size()).unwrap_or(0).min(PART_CAPACITY_LIMIT);
        let mut bytes = Vec::with_capacity(capacity);
        file.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Package;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    /// Build an in-memory package from `(part name, content)` pairs
    pub(crate) fn package(parts: &[(&str, &str)]) -> Package<Cursor<Vec<u8>>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        for (name, content) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }

        let cursor = zip.finish().unwrap();
        Package::from_reader(Cursor::new(cursor.into_inner())).unwrap()
    }
}
