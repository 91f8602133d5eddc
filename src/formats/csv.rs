/*!
 * Delimited-text adapter.
 *
 * Reads and writes delimiter-separated files with a configurable field
 * separator. Input may carry a UTF-8 byte-order mark (spreadsheet exports
 * usually do); it is stripped on read and re-emitted on write so round-trips
 * stay byte-compatible with the tools that produced the input.
 */

use std::path::Path;

use crate::document::{Cell, Document};
use crate::errors::JobError;
use crate::formats::DocumentAdapter;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Adapter for delimiter-separated text files.
pub struct DelimitedAdapter {
    delimiter: char,
}

impl DelimitedAdapter {
    /// Create an adapter with the given field separator.
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    fn delimiter_byte(&self) -> Result<u8, JobError> {
        u8::try_from(self.delimiter as u32).map_err(|_| {
            JobError::Document(format!(
                "Field delimiter '{}' is not a single-byte character",
                self.delimiter
            ))
        })
    }
}

impl DocumentAdapter for DelimitedAdapter {
    fn read(&self, path: &Path) -> Result<Document, JobError> {
        let raw = std::fs::read(path)?;
        let content = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter_byte()?)
            .has_headers(false)
            .flexible(true)
            .from_reader(content);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| JobError::Document(format!("Failed to parse {:?}: {}", path, e)))?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        Ok(Document::from_string_rows(rows))
    }

    fn write(&self, document: &Document, path: &Path) -> Result<(), JobError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter_byte()?)
            .flexible(true)
            .from_writer(Vec::new());

        for row in &document.rows {
            let fields: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => String::new(),
                    Cell::Text(s) => s.clone(),
                    Cell::Number(n) => n.to_string(),
                    Cell::Bool(b) => b.to_string(),
                })
                .collect();
            writer
                .write_record(&fields)
                .map_err(|e| JobError::Document(format!("Failed to encode row: {}", e)))?;
        }

        let body = writer
            .into_inner()
            .map_err(|e| JobError::Document(format!("Failed to finish output: {}", e)))?;

        let mut out = Vec::with_capacity(UTF8_BOM.len() + body.len());
        out.extend_from_slice(UTF8_BOM);
        out.extend_from_slice(&body);
        std::fs::write(path, out)?;
        Ok(())
    }
}
