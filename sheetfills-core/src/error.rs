//! Error taxonomy for header extraction

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while reading a spreadsheet package
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The source document does not exist
    #[error("File not found")]
    FileNotFound(PathBuf),

    /// The file exists but is not a readable ZIP package
    #[error("{0}")]
    Archive(#[from] zip::result::ZipError),

    /// A named part is absent from the package
    #[error("There is no item named '{0}' in the archive")]
    MissingPart(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// A part could not be decoded as XML
    #[error("{part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// A numeric attribute or value could not be parsed
    #[error("{part}: invalid {field} value '{value}'")]
    InvalidNumber {
        part: String,
        field: &'static str,
        value: String,
    },

    /// A part every sheet depends on (shared strings, styles) failed to load
    #[error("{0}")]
    Dependency(Arc<ExtractError>),

    /// A cell references a shared string past the end of the table
    #[error("list index out of range: shared string {index} requested, table holds {len}")]
    SharedStringIndex { index: usize, len: usize },
}

impl ExtractError {
    pub(crate) fn xml(part: &str, source: impl Into<quick_xml::Error>) -> Self {
        ExtractError::Xml {
            part: part.to_string(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;

/// Load outcome of a part shared by all sheets; the error is reported per sheet
pub type SharedPart<T> = std::result::Result<T, Arc<ExtractError>>;
