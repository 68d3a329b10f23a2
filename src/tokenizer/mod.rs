//! Tokenizer capability
//!
//! The morphological analyser is an external collaborator. The pipeline only
//! needs something that turns text into [`Token`]s and can be shared between
//! worker tasks.

pub mod unidic;

pub use unidic::{token_from_features, UnidicTokenizer};

use crate::error::TokenizeError;
use crate::token::Token;

/// Text → ordered tokens. Implementations must be deterministic for identical
/// input and safe to call from several tasks at once.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError>;
}

/// Re-insert source text the analyser skipped (spaces, newlines) as literal
/// tokens, so that the surfaces concatenate back to `text`.
///
/// Tokens whose surface cannot be found at or after the cursor are kept as-is.
pub fn align_with_source(text: &str, tokens: Vec<Token>) -> Vec<Token> {
    let mut aligned = Vec::with_capacity(tokens.len());
    let mut cursor = 0;

    for token in tokens {
        if token.surface.is_empty() {
            continue;
        }
        if let Some(offset) = text[cursor..].find(&token.surface) {
            if offset > 0 {
                aligned.push(Token::literal(&text[cursor..cursor + offset]));
            }
            cursor += offset + token.surface.len();
        }
        aligned.push(token);
    }

    if cursor < text.len() {
        aligned.push(Token::literal(&text[cursor..]));
    }
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::PosTag;

    fn surfaces(tokens: &[Token]) -> String {
        tokens.iter().map(|t| t.surface.as_str()).collect()
    }

    #[test]
    fn test_align_restores_gaps() {
        let text = " 今日は 雨。\n";
        let tokens = vec![
            Token::new("今日", PosTag::new("名詞", "普通名詞", "副詞可能")),
            Token::new("は", PosTag::new("助詞", "係助詞", "")),
            Token::new("雨", PosTag::new("名詞", "普通名詞", "一般")),
            Token::new("。", PosTag::new("補助記号", "句点", "")),
        ];
        let aligned = align_with_source(text, tokens);

        assert_eq!(surfaces(&aligned), text);
        assert_eq!(aligned.len(), 7);
        assert_eq!(aligned[0], Token::literal(" "));
        assert_eq!(aligned[3], Token::literal(" "));
        assert_eq!(aligned[6], Token::literal("\n"));
    }

    #[test]
    fn test_align_no_gaps_is_identity() {
        let tokens = vec![Token::literal("雨"), Token::literal("。")];
        assert_eq!(align_with_source("雨。", tokens.clone()), tokens);
    }
}
