/*!
 * Fragment classification.
 *
 * Decides whether an extracted cell fragment should be translated at all.
 * Numeric values, URLs, and marker-prefixed strings are pass-through: they are
 * returned unchanged, never sent to the translation service, and never cached.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Generic opening tag, e.g. `<b>` or `<span class="x">`.
static MARKUP_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[A-Za-z][^>]*>").expect("markup tag pattern is valid")
});

/// Classification of a text fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Digits with thousand/decimal/sign punctuation, e.g. "1,234" or "-5.0"
    Numeric,
    /// Anything starting with http/HTTP
    Url,
    /// Matches a configured pass-through prefix, e.g. "Image01.png"
    MarkerPrefix,
    /// Contains embedded markup tags; translated with tag handling
    Markup,
    /// Ordinary translatable text
    PlainText,
}

impl Classification {
    /// Pass-through fragments skip translation and caching entirely.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Numeric | Self::Url | Self::MarkerPrefix)
    }
}

/// Classify a fragment by content alone.
///
/// `passthrough_prefixes` lists literal prefixes (like "Image") whose
/// fragments are kept verbatim.
pub fn classify(fragment: &str, passthrough_prefixes: &[String]) -> Classification {
    if is_numeric(fragment) {
        return Classification::Numeric;
    }
    if is_url(fragment) {
        return Classification::Url;
    }
    if passthrough_prefixes.iter().any(|p| fragment.starts_with(p.as_str())) {
        return Classification::MarkerPrefix;
    }
    if MARKUP_TAG.is_match(fragment) {
        return Classification::Markup;
    }
    Classification::PlainText
}

/// A fragment is numeric when, after removing `.`, `,` and `-`, only digits
/// remain and there was at least one digit. An all-punctuation string is not
/// numeric.
fn is_numeric(fragment: &str) -> bool {
    let mut saw_digit = false;
    for c in fragment.chars() {
        match c {
            '.' | ',' | '-' => {}
            c if c.is_ascii_digit() => saw_digit = true,
            _ => return false,
        }
    }
    saw_digit
}

fn is_url(fragment: &str) -> bool {
    // get() instead of slicing: the 4th byte may fall inside a multi-byte
    // character ("está"), and a URL prefix is ASCII anyway.
    fragment
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}
