//! Markup stripping utilities.
//!
//! Reduces HTML article bodies to the plain text a reader actually reads.
//! Entities are left encoded; `&nbsp;` between two words joins them into a
//! single token.

use regex::Regex;
use std::sync::LazyLock;

/// Regex for `<script>` elements, including their contents.
static SCRIPT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex")
});

/// Regex for `<style>` elements, including their contents.
static STYLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex")
});

/// Regex for HTML comments.
static COMMENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Regex for any remaining tag (opening, closing, doctype, processing instruction).
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z!?][^>]*>").expect("valid regex"));

/// Strip all markup from `text`.
///
/// Removes:
/// - `<script>` and `<style>` elements together with their contents
/// - HTML comments
/// - Every other tag (the tag itself; its text content is kept)
///
/// Tags are removed without inserting whitespace, so `un<em>usual</em>` stays
/// one word. The result is trimmed.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn strip_all_tags(text: &str) -> String {
    let text = SCRIPT_PATTERN.replace_all(text, "");
    let text = STYLE_PATTERN.replace_all(&text, "");
    let text = COMMENT_PATTERN.replace_all(&text, "");
    let text = TAG_PATTERN.replace_all(&text, "");
    text.trim().to_string()
}

/// Count words by whitespace splitting.
///
/// Any run of Unicode whitespace separates two words; punctuation is part of
/// the token it touches.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
