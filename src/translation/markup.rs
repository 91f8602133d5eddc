/*!
 * Markup handling around the translation call.
 *
 * Fragments with embedded tags are stripped to plain text before translation
 * and re-wrapped afterwards. Reconstruction is a best-effort approximation by
 * contract: the first opening tag's name wraps the whole translated text, and
 * the original inner tag structure is not rebuilt. Fragments containing the
 * field delimiter get it swapped for a placeholder around the call so the
 * delimiter never corrupts delimited-text output.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("tag pattern is valid"));

static OPENING_TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([A-Za-z][A-Za-z0-9]*)[^>]*>").expect("tag name pattern is valid"));

/// Placeholder standing in for a literal field delimiter during translation.
/// U+FFFC (object replacement character) survives translation untouched.
const DELIMITER_PLACEHOLDER: char = '\u{FFFC}';

/// Remove all tags, collapsing the fragment to its plain text.
pub fn strip_tags(fragment: &str) -> String {
    ANY_TAG.replace_all(fragment, "").into_owned()
}

/// Name of the first opening tag in the fragment, if any.
pub fn first_tag_name(fragment: &str) -> Option<&str> {
    OPENING_TAG_NAME
        .captures(fragment)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Wrap translated text in a generic envelope built from the original
/// fragment's first tag. Lossy: inner structure is not reconstructed.
pub fn rewrap(original: &str, translated: &str) -> String {
    match first_tag_name(original) {
        Some(tag) => format!("<{tag}>{translated}</{tag}>"),
        None => translated.to_string(),
    }
}

/// Replace literal delimiter characters with the placeholder before the
/// fragment is sent to the service.
pub fn mask_delimiter(fragment: &str, delimiter: char) -> String {
    fragment.replace(delimiter, &DELIMITER_PLACEHOLDER.to_string())
}

/// Restore delimiter characters in the translated result.
pub fn unmask_delimiter(fragment: &str, delimiter: char) -> String {
    fragment.replace(DELIMITER_PLACEHOLDER, &delimiter.to_string())
}
