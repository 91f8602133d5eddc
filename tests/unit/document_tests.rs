/*!
 * Tests for document extraction order and output naming
 */

use std::path::Path;

use tabtrans::document::{Cell, CellPos};
use tabtrans::file_utils;

use crate::common;

#[test]
fn test_textCells_withSharedFragment_shouldListEveryPosition() {
    let doc = common::document(&[&["Hola", "Adios"], &["Hola"]]);
    let cells = doc.text_cells();
    let hola_positions: Vec<CellPos> = cells
        .iter()
        .filter(|(_, text)| *text == "Hola")
        .map(|(pos, _)| *pos)
        .collect();
    assert_eq!(
        hola_positions,
        vec![CellPos { row: 0, col: 0 }, CellPos { row: 1, col: 0 }]
    );
}

#[test]
fn test_setText_shouldNotChangeGridShape() {
    let mut doc = common::document(&[&["a", "", "c"], &["d"]]);
    let before: Vec<usize> = doc.rows.iter().map(|r| r.len()).collect();

    let positions: Vec<CellPos> = doc.text_cells().into_iter().map(|(pos, _)| pos).collect();
    for pos in positions {
        doc.set_text(pos, "translated".to_string());
    }

    let after: Vec<usize> = doc.rows.iter().map(|r| r.len()).collect();
    assert_eq!(before, after);
    assert_eq!(doc.rows[0][1], Cell::Empty);
}

#[test]
fn test_outputNaming_shouldDistinguishCompleteAndPartial() {
    let input = Path::new("/tmp/arquivo_entrada.csv");
    let complete = file_utils::translated_output_path(input, "pt");
    let partial = file_utils::partial_output_path(input, "pt");

    assert_eq!(complete.file_name().unwrap(), "arquivo_entrada_pt.csv");
    assert_eq!(
        partial.file_name().unwrap(),
        "arquivo_entrada_partial_pt.csv"
    );
    assert_ne!(complete, partial);
}
