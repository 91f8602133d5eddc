/*!
 * Workbook adapter.
 *
 * Reads the first worksheet of an xlsx workbook via calamine and writes the
 * translated grid with rust_xlsxwriter. Numeric and boolean cells pass
 * through verbatim; only string cells are candidates for translation.
 * Formatting and additional worksheets are not carried over.
 */

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::document::{Cell, Document};
use crate::errors::JobError;
use crate::formats::DocumentAdapter;

/// Adapter for spreadsheet workbooks.
pub struct WorkbookAdapter;

impl WorkbookAdapter {
    /// Create a workbook adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for WorkbookAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAdapter for WorkbookAdapter {
    fn read(&self, path: &Path) -> Result<Document, JobError> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| JobError::Document(format!("Failed to open workbook {:?}: {}", path, e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| JobError::Document(format!("Workbook {:?} has no worksheets", path)))?
            .map_err(|e| JobError::Document(format!("Failed to read worksheet: {}", e)))?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        Ok(Document { rows })
    }

    fn write(&self, document: &Document, path: &Path) -> Result<(), JobError> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (row_idx, row) in document.rows.iter().enumerate() {
            let row_idx = row_idx as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_idx = col_idx as u16;
                let written = match cell {
                    Cell::Empty => Ok(&mut *worksheet),
                    Cell::Text(s) => worksheet.write_string(row_idx, col_idx, s),
                    Cell::Number(n) => worksheet.write_number(row_idx, col_idx, *n),
                    Cell::Bool(b) => worksheet.write_boolean(row_idx, col_idx, *b),
                };
                written.map_err(|e| {
                    JobError::Document(format!(
                        "Failed to write cell ({}, {}): {}",
                        row_idx, col_idx, e
                    ))
                })?;
            }
        }

        workbook
            .save(path)
            .map_err(|e| JobError::Document(format!("Failed to save workbook {:?}: {}", path, e)))?;
        Ok(())
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        // ISO date/duration strings stay textual; the classifier's numeric
        // rule keeps plain dates out of the translation path.
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}
