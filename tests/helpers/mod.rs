//! Shared fakes for integration tests: a small fixed-lexicon tokenizer and
//! in-memory translators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use news_annotator::{PosTag, Token, TokenizeError, TranslationError, Tokenizer, Translator};

/// (surface, primary, secondary, tertiary, lemma, reading)
const LEXICON: &[(&str, &str, &str, &str, &str, &str)] = &[
    ("今日", "名詞", "普通名詞", "副詞可能", "今日", "キョー"),
    ("明日", "名詞", "普通名詞", "副詞可能", "明日", "アシタ"),
    ("雨", "名詞", "普通名詞", "一般", "雨", "アメ"),
    ("晴れ", "名詞", "普通名詞", "一般", "晴れ", "ハレ"),
    ("降る", "動詞", "一般", "", "降る", "フル"),
    ("食べる", "動詞", "一般", "", "食べる", "タベル"),
    ("する", "動詞", "非自立可能", "", "為る", "スル"),
    ("寒い", "形容詞", "一般", "", "寒い", "サムイ"),
    ("とても", "副詞", "", "", "迚も", "トテモ"),
    ("三", "名詞", "数詞", "", "三", "サン"),
    ("人", "接尾辞", "名詞的", "一般", "人", "ニン"),
    ("です", "助動詞", "", "", "です", "デス"),
    ("は", "助詞", "係助詞", "", "は", "ワ"),
    ("が", "助詞", "格助詞", "", "が", "ガ"),
    ("を", "助詞", "格助詞", "", "を", "オ"),
    ("。", "補助記号", "句点", "", "。", ""),
];

/// Longest-match tokenizer over [`LEXICON`]; unknown characters become
/// literal tokens.
#[derive(Debug, Default, Clone)]
pub struct LexiconTokenizer;

impl Tokenizer for LexiconTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            let entry = LEXICON
                .iter()
                .filter(|(surface, ..)| rest.starts_with(surface))
                .max_by_key(|(surface, ..)| surface.len());

            match entry {
                Some((surface, primary, secondary, tertiary, lemma, reading)) => {
                    tokens.push(
                        Token::new(*surface, PosTag::new(*primary, *secondary, *tertiary))
                            .with_lemma(*lemma)
                            .with_pronunciation(*reading),
                    );
                    rest = &rest[surface.len()..];
                }
                None => {
                    let c = rest.chars().next().unwrap();
                    tokens.push(Token::literal(c.to_string()));
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        Ok(tokens)
    }
}

/// Looks translations up in a fixed table; unknown text is echoed with a prefix.
#[derive(Debug, Default)]
pub struct TableTranslator {
    pub table: HashMap<String, String>,
}

impl TableTranslator {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            table: pairs
                .iter()
                .map(|(ja, en)| (ja.to_string(), en.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl Translator for TableTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslationError> {
        Ok(self
            .table
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target, text)))
    }
}

/// Sleeps a random few milliseconds before echoing, so completion order is
/// shuffled relative to submission order.
#[derive(Debug)]
pub struct JitterTranslator {
    pub max_delay_ms: u64,
}

#[async_trait]
impl Translator for JitterTranslator {
    async fn translate(&self, text: &str, _target: &str) -> Result<String, TranslationError> {
        let delay = rand::thread_rng().gen_range(0..=self.max_delay_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(format!("translated: {}", text))
    }
}
