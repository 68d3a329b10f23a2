//! In-process morphological analysis with `vibrato` over a UniDic dictionary.
//!
//! `vibrato` reports each token's dictionary features as one CSV string. With
//! UniDic the features we read are:
//!
//! | index | field            |
//! |-------|------------------|
//! | 0..=2 | pos1, pos2, pos3 |
//! | 7     | lemma            |
//! | 9     | pronunciation    |
//!
//! `*` marks an unknown field. Unknown words carry fewer fields.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info};
use vibrato::{Dictionary, SystemDictionaryBuilder, Tokenizer as Analyzer};

use super::{align_with_source, Tokenizer};
use crate::error::{ConfigError, TokenizeError};
use crate::token::{PosTag, Token};

const LEMMA_FIELD: usize = 7;
const PRONUNCIATION_FIELD: usize = 9;

fn field(features: &[&str], index: usize) -> Option<String> {
    features
        .get(index)
        .map(|f| f.trim_matches('"'))
        .filter(|f| !f.is_empty() && *f != "*")
        .map(str::to_string)
}

/// Build a token from its surface and UniDic feature string.
pub fn token_from_features(surface: &str, feature: &str) -> Token {
    let features: Vec<&str> = feature.split(',').collect();
    let pos = PosTag::new(
        field(&features, 0).unwrap_or_default(),
        field(&features, 1).unwrap_or_default(),
        field(&features, 2).unwrap_or_default(),
    );

    Token {
        surface: surface.to_string(),
        pos,
        lemma: field(&features, LEMMA_FIELD),
        pronunciation: field(&features, PRONUNCIATION_FIELD),
    }
}

/// UniDic tokenizer. The dictionary is loaded once and shared; each call gets
/// its own worker, so one instance serves every enrichment task.
pub struct UnidicTokenizer {
    analyzer: Analyzer,
}

impl UnidicTokenizer {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            analyzer: Analyzer::new(dictionary),
        }
    }

    /// Load a compiled `vibrato` dictionary (`system.dic`, decompressed).
    pub fn from_dictionary_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let dictionary = Dictionary::read(BufReader::new(File::open(path)?))?;
        info!(path = %path.display(), "loaded compiled dictionary");
        Ok(Self::new(dictionary))
    }

    /// Build from MeCab-format sources: `lex.csv`, `matrix.def`, `char.def`, `unk.def`.
    pub fn from_readers<L, M, C, U>(
        lexicon: L,
        matrix: M,
        char_def: C,
        unk_def: U,
    ) -> Result<Self, ConfigError>
    where
        L: Read,
        M: Read,
        C: Read,
        U: Read,
    {
        let dictionary =
            SystemDictionaryBuilder::from_readers(lexicon, matrix, char_def, unk_def)?;
        Ok(Self::new(dictionary))
    }

    /// Build from a MeCab-format UniDic directory.
    pub fn from_mecab_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let open = |name: &str| File::open(dir.join(name)).map(BufReader::new);
        let tokenizer = Self::from_readers(
            open("lex.csv")?,
            open("matrix.def")?,
            open("char.def")?,
            open("unk.def")?,
        )?;
        info!(dir = %dir.display(), "built dictionary from MeCab sources");
        Ok(tokenizer)
    }

    /// Compiled dictionary file or MeCab-format directory, whichever `path` is.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_mecab_dir(path)
        } else {
            Self::from_dictionary_file(path)
        }
    }
}

impl Tokenizer for UnidicTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let mut worker = self.analyzer.new_worker();
        worker.reset_sentence(text);
        worker.tokenize();

        let tokens: Vec<Token> = worker
            .token_iter()
            .map(|t| token_from_features(t.surface(), t.feature()))
            .collect();
        debug!(count = tokens.len(), "tokenized unit");
        Ok(align_with_source(text, tokens))
    }
}
