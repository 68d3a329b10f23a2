//! Annotate a news article from the command line
//!
//! Reads an article as JSON (`{"title": "...", "body": "..."}`) and prints the
//! parsed article as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Annotate everything, translating with the configured project
//! TRANSLATE_PROJECT_ID=my-project TRANSLATE_ACCESS_TOKEN=... \
//!     annotate_article --dictionary unidic/system.dic --input article.json
//!
//! # Skip words from a word list, one sentence at a time (dictionary from the env)
//! export UNIDIC_DICTIONARY=unidic/system.dic
//! cat article.json | annotate_article --known known.txt --sequential
//!
//! # Gate by the reader's WaniKani progress
//! WK_TOKEN=... annotate_article --input article.json --batched
//! ```

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use news_annotator::config::{Concurrency, PipelineConfig, TranslationMode, VocabularyConfig};
use news_annotator::vocabulary::{gate_from_config, gate_from_word_list};
use news_annotator::{
    Article, ArticleParser, CloudTranslateClient, EnrichmentPipeline, RuleTable, TranslatorConfig,
    UnidicTokenizer,
};

#[derive(Parser)]
#[command(name = "annotate_article")]
#[command(version)]
#[command(about = "Annotate a Japanese news article with lookup links, readings and translations")]
#[command(long_about = None)]
struct Cli {
    /// Article JSON file (reads stdin if not provided)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Known-word list, one lemma per line (overrides the vocabulary service)
    #[arg(long)]
    known: Option<PathBuf>,

    /// Rule table YAML (defaults to the built-in current rules)
    #[arg(long, conflicts_with = "legacy_rules")]
    rules: Option<PathBuf>,

    /// Use the older rule revision that also links quasi-nominal counters
    #[arg(long)]
    legacy_rules: bool,

    /// Enrich one sentence at a time
    #[arg(long)]
    sequential: bool,

    /// Translate the whole body in a single request
    #[arg(long)]
    batched: bool,

    /// Worker pool size (defaults to ANNOTATOR_WORKERS or host parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// UniDic dictionary: a compiled `system.dic` or a MeCab-format directory
    #[arg(long, env = "UNIDIC_DICTIONARY")]
    dictionary: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn read_article(input: Option<&PathBuf>) -> Result<Article> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Article must be JSON with 'title' and 'body'")
}

fn pipeline_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env()?;

    if let Some(path) = &cli.rules {
        config.rules = RuleTable::from_yaml_file(path)
            .with_context(|| format!("Failed to load rule table {}", path.display()))?;
    } else if cli.legacy_rules {
        config.rules = RuleTable::legacy();
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if cli.sequential {
        config.concurrency = Concurrency::Sequential;
    }
    if cli.batched {
        config.translation_mode = TranslationMode::Batched;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_annotator=info,annotate_article=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let article = read_article(cli.input.as_ref())?;
    let config = pipeline_config(&cli)?;

    let translator = CloudTranslateClient::new(&TranslatorConfig::from_env()?)
        .context("Translator is not configured")?;
    let tokenizer = UnidicTokenizer::load(&cli.dictionary)
        .with_context(|| format!("Failed to load dictionary {}", cli.dictionary.display()))?;

    let gate = match &cli.known {
        Some(path) => {
            let list = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            gate_from_word_list(&list)
        }
        None => gate_from_config(&VocabularyConfig::from_env()?).await,
    };

    let workers = config.workers;
    let pipeline = EnrichmentPipeline::new(Arc::new(tokenizer), Arc::new(translator), config)?;
    let parser = ArticleParser::new(pipeline);

    tracing::info!(
        rules = %parser.pipeline().rules().revision,
        workers,
        "Annotating article"
    );
    let parsed = parser
        .parse_article(Some(&article), Arc::new(gate))
        .await
        .context("Article could not be parsed")?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&parsed)?
    } else {
        serde_json::to_string(&parsed)?
    };
    println!("{}", json);

    Ok(())
}
