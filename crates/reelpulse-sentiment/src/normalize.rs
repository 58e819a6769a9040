//! Text cleanup applied before classification.
//!
//! Lossy on purpose: digits, punctuation, emoji and every non-ASCII letter are
//! dropped so the bag-of-words vocabulary only ever sees ASCII words.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+").expect("valid url regex"));
static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").expect("valid non-letter regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip URLs and non-letters, then collapse whitespace.
///
/// Output holds only ASCII letters separated by single spaces, with no
/// leading or trailing space. `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_urls = URL_RE.replace_all(text, "");
    let letters = NON_LETTER_RE.replace_all(&without_urls, "");
    // Stripping can reassemble a scheme (`ht-tp://x` -> `httpx`), so URLs are
    // removed a second time.
    let letters = URL_RE.replace_all(&letters, "");
    WHITESPACE_RE.replace_all(&letters, " ").trim().to_string()
}
