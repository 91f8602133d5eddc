/*!
 * Container-format adapters.
 *
 * Adapters turn an on-disk file into a `Document` grid and write a grid back
 * out, preserving cell order and non-string cell values verbatim. They carry
 * no translation logic of their own.
 */

use std::path::Path;

use crate::document::Document;
use crate::errors::JobError;

pub mod csv;
pub mod xlsx;

/// Supported container formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Delimited text (csv/tsv/txt with a field separator)
    Delimited,
    /// Spreadsheet workbook (xlsx)
    Workbook,
}

impl FileFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, JobError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(Self::Delimited),
            "xlsx" | "xlsm" => Ok(Self::Workbook),
            other => Err(JobError::Document(format!(
                "Unsupported input format: '{}'. Expected csv, tsv, txt, or xlsx.",
                other
            ))),
        }
    }
}

/// Read/write boundary for one container format.
pub trait DocumentAdapter {
    /// Read the file into a cell grid.
    fn read(&self, path: &Path) -> Result<Document, JobError>;

    /// Write the grid to a new file. Never called with the input path.
    fn write(&self, document: &Document, path: &Path) -> Result<(), JobError>;
}

/// Pick the adapter for a path.
pub fn adapter_for(path: &Path, delimiter: char) -> Result<Box<dyn DocumentAdapter>, JobError> {
    match FileFormat::from_path(path)? {
        FileFormat::Delimited => Ok(Box::new(csv::DelimitedAdapter::new(delimiter))),
        FileFormat::Workbook => Ok(Box::new(xlsx::WorkbookAdapter::new())),
    }
}
