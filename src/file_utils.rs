/*!
 * Output-path naming.
 *
 * Translated output lands next to the input with the target language tag
 * inserted before the extension; an interrupted run writes a distinctly
 * named partial file instead. The input file itself is never overwritten.
 */

use std::path::{Path, PathBuf};

/// Output path for a completed translation: `{stem}_{lang}.{ext}`.
pub fn translated_output_path(input: &Path, target_language: &str) -> PathBuf {
    suffixed_path(input, target_language)
}

/// Output path for an interrupted run: `{stem}_partial_{lang}.{ext}`.
pub fn partial_output_path(input: &Path, target_language: &str) -> PathBuf {
    suffixed_path(input, &format!("partial_{}", target_language))
}

fn suffixed_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    let file_name = if ext.is_empty() {
        format!("{}_{}", stem, suffix)
    } else {
        format!("{}_{}.{}", stem, suffix, ext)
    };

    match input.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}
