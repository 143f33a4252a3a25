//! Sentence segmentation.

use std::sync::LazyLock;

use regex::Regex;

/// Whitespace runs that contain a line break.
static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("line break pattern is valid"));

/// Sentence-ending punctuation followed by whitespace.
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence pattern is valid"));

/// Collapse hard line breaks (and the whitespace around them) into one space.
pub fn normalize(text: &str) -> String {
    LINE_BREAK.replace_all(text, " ").into_owned()
}

/// Split normalized text into `(sentence, separator)` pairs.
///
/// The punctuation stays on the sentence; the separator is the whitespace
/// that followed it (empty for the final piece). Concatenating every pair
/// gives back the input.
pub fn split_sentences(normalized: &str) -> Vec<(&str, &str)> {
    let mut pieces = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_END.find_iter(normalized) {
        // The punctuation mark is a single ASCII byte.
        let end = boundary.start() + 1;
        pieces.push((&normalized[start..end], &normalized[end..boundary.end()]));
        start = boundary.end();
    }
    pieces.push((&normalized[start..], ""));

    pieces
}

/// Normalize `text` and split it into sentences.
///
/// A trailing fragment without punctuation is kept; so is the empty string
/// left behind by trailing whitespace.
pub fn segment(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    split_sentences(&normalized)
        .into_iter()
        .map(|(sentence, _)| sentence.to_string())
        .collect()
}
