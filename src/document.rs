/*!
 * Core document model for tabular translation.
 *
 * A `Document` is an ordered 2-D grid of cells read from a delimited text file
 * or a workbook sheet. The translation pipeline only ever rewrites the content
 * of text cells in place; grid shape and non-text cells are preserved exactly.
 */

/// A single cell of a tabular document.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Empty cell; left untouched
    Empty,
    /// Text content, candidate for translation
    Text(String),
    /// Numeric cell value (workbooks); passed through verbatim
    Number(f64),
    /// Boolean cell value (workbooks); passed through verbatim
    Bool(bool),
}

impl Cell {
    /// Text content of this cell, if it is a non-empty text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Position of a cell in the grid, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    /// Row index, zero-based
    pub row: usize,
    /// Column index, zero-based
    pub col: usize,
}

/// An ordered grid of cells. Rows may have differing lengths for delimited
/// text input; the shape is preserved through translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Grid rows in input order
    pub rows: Vec<Vec<Cell>>,
}

impl Document {
    /// Build a document from plain string rows (delimited text input).
    pub fn from_string_rows(rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|field| {
                        if field.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::Text(field)
                        }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// All non-empty text cells in row-major order, with their positions.
    pub fn text_cells(&self) -> Vec<(CellPos, &str)> {
        let mut cells = Vec::new();
        for (row, cols) in self.rows.iter().enumerate() {
            for (col, cell) in cols.iter().enumerate() {
                if let Some(text) = cell.as_text() {
                    cells.push((CellPos { row, col }, text));
                }
            }
        }
        cells
    }

    /// Replace the content of a text cell. Positions outside the grid or
    /// non-text cells are ignored; the grid shape never changes.
    pub fn set_text(&mut self, pos: CellPos, text: String) {
        if let Some(cell) = self.rows.get_mut(pos.row).and_then(|r| r.get_mut(pos.col)) {
            if matches!(cell, Cell::Text(_)) {
                *cell = Cell::Text(text);
            }
        }
    }

    /// Total number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }
}
