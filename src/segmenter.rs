//! Sentence segmenter
//!
//! Splits article bodies on the Japanese full stop. Each sentence keeps its
//! delimiter; empty pieces (runs of delimiters, a trailing delimiter) are dropped.

pub const SENTENCE_DELIMITER: char = '。';

/// Split `body` into sentences on [`SENTENCE_DELIMITER`].
pub fn segment(body: &str) -> Vec<String> {
    segment_with(body, SENTENCE_DELIMITER)
}

/// Split `body` on `delimiter`, re-appending it to every non-empty piece.
///
/// A final piece without a trailing delimiter in the source still gets one.
pub fn segment_with(body: &str, delimiter: char) -> Vec<String> {
    body.split(delimiter)
        .filter(|piece| !piece.is_empty())
        .map(|piece| {
            let mut sentence = String::with_capacity(piece.len() + delimiter.len_utf8());
            sentence.push_str(piece);
            sentence.push(delimiter);
            sentence
        })
        .collect()
}
