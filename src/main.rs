#![forbid(unsafe_code)]
//! # NER Semantics CLI
//!
//! Command-line interface for the `ner_semantics` crate.
//! Cleans a token-per-row NER corpus and writes a per-word co-occurrence table
//! without writing Rust code.
//!
//! ## Features
//! - Cleaned corpus export (normalized words, canonical POS tags).
//! - Relationship table export (csv, tsv, json).
//! - Configurable context window and ranking caps.
//! - Lookup mode for querying an existing relationship table.
//! - Next-word prediction and phrase completion over multi-word contexts.
//! - N-gram POS tagging and jackknife evaluation of the tagger chain.
//!
//! ## Example
//! ```bash
//! cargo run --release -- --input data/ner_dataset.csv --window 3 --export-format csv
//! cargo run --release -- --semantic-output data/semantic_data.csv --query london
//! cargo run --release -- --predict "the government of"
//! cargo run --release -- --input data/ner_dataset.csv --evaluate-taggers --parallel
//! ```
//!
//! See `--help` for all available options.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use env_logger;
use log::{error, info, warn};
use ner_semantics::config::{
    DEFAULT_CLEANED_OUTPUT_PATH, DEFAULT_INPUT_PATH, DEFAULT_SEMANTIC_OUTPUT_PATH,
};
use ner_semantics::jackknife::DEFAULT_FOLD_SIZE;
use ner_semantics::tagger::MAX_ORDER;
use ner_semantics::{
    AnalysisOptions, ExportFormat, PipelineConfig, Result, SemanticLookup, Tagger, build_ngrams,
    format_for_path, jackknife, normalize_text, read_sentences, run_pipeline, tagger_chain,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Input corpus (CSV with `Sentence #`, `Word`, `POS` columns)
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Where to write the cleaned corpus (read back by --predict and --query)
    #[arg(long, default_value = DEFAULT_CLEANED_OUTPUT_PATH)]
    cleaned_output: PathBuf,

    /// Where to write (or, with --query/--predict, read) the relationship table
    #[arg(long, default_value = DEFAULT_SEMANTIC_OUTPUT_PATH)]
    semantic_output: PathBuf,

    /// Context window radius (e.g. 3 = ±3 words)
    #[arg(long, default_value_t = 3)]
    window: usize,

    /// Sentences with fewer tokens are skipped
    #[arg(long, default_value_t = 3)]
    min_sentence_len: usize,

    /// Number of next words kept per word
    #[arg(long, default_value_t = 5)]
    max_next: usize,

    /// Number of previous words kept per word
    #[arg(long, default_value_t = 5)]
    max_prev: usize,

    /// Number of related (context) words kept per word
    #[arg(long, default_value_t = 10)]
    max_related: usize,

    /// Format of the relationship table (csv, tsv, json) [default: from the
    /// --semantic-output extension]
    #[arg(long)]
    export_format: Option<ExportFormat>,

    /// Aggregate sentences (and jackknife folds) in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Number of sample relationships printed after a run
    #[arg(long, default_value_t = 10)]
    samples: usize,

    /// Look up words in an existing relationship table instead of running the pipeline
    #[arg(long)]
    query: Vec<String>,

    /// Suggest next words and phrase completions for a context phrase
    #[arg(long)]
    predict: Vec<String>,

    /// Words added by each phrase completion
    #[arg(long, default_value_t = 3)]
    phrase_words: usize,

    /// Phrase completions printed per --predict context
    #[arg(long, default_value_t = 3)]
    phrases: usize,

    /// Tag a sentence with the tagger chain trained on --input
    #[arg(long)]
    tag: Vec<String>,

    /// Jackknife evaluation of the tagger chain on --input
    #[arg(long, default_value_t = false)]
    evaluate_taggers: bool,

    /// Sentences held out per jackknife fold
    #[arg(long, default_value_t = DEFAULT_FOLD_SIZE)]
    fold_size: usize,
}

impl Cli {
    /// The explicit --export-format, else the one implied by the table's extension.
    fn export_format(&self) -> ExportFormat {
        self.export_format
            .unwrap_or_else(|| format_for_path(&self.semantic_output))
    }

    fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            window: self.window,
            min_sentence_len: self.min_sentence_len,
            max_next: self.max_next,
            max_prev: self.max_prev,
            max_related: self.max_related,
            parallel: self.parallel,
        }
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            input_path: self.input.clone(),
            cleaned_output_path: self.cleaned_output.clone(),
            semantic_output_path: self.semantic_output.clone(),
            export_format: self.export_format(),
            options: self.options(),
            samples: self.samples,
        }
    }
}

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(normalize_text)
        .filter(|w| !w.is_empty())
        .collect()
}

fn print_lookup(lookup: &SemanticLookup, word: &str) {
    match lookup.get(word) {
        Some(row) => {
            println!("{} ({})", row.word, row.common_pos);
            println!("  next:    {}", row.next_words);
            println!("  prev:    {}", row.prev_words);
            println!("  related: {}", row.related_words);
            let suggestions: Vec<String> = lookup
                .suggest_next(word, 5)
                .into_iter()
                .map(|s| s.word)
                .collect();
            println!("  suggest: {}", suggestions.join(" "));
        }
        None => println!("{}: no entry", word),
    }
}

fn print_prediction(lookup: &SemanticLookup, context: &str, cli: &Cli) {
    println!("{}", context);
    let words: Vec<String> = lookup
        .suggest_next(context, 5)
        .into_iter()
        .map(|s| s.word)
        .collect();
    println!("  words:   {}", words.join(" "));
    for phrase in lookup.complete_phrases(context, cli.phrase_words, cli.phrases) {
        println!("  phrase:  {}", phrase);
    }
}

/// Relationship table plus, when the cleaned corpus is around, the multi-word model.
fn load_lookup(cli: &Cli) -> Result<SemanticLookup> {
    let options = cli.options();
    options.validate()?;
    let lookup = SemanticLookup::load_with(&cli.semantic_output, cli.export_format())?;
    if !cli.cleaned_output.exists() {
        info!(
            "{} not found; predicting from the relationship table only",
            cli.cleaned_output.display()
        );
        return Ok(lookup);
    }
    let sentences = read_sentences(&cli.cleaned_output)?;
    Ok(lookup.with_ngrams(build_ngrams(&sentences, &options)))
}

fn tag_sentences(cli: &Cli) -> Result<()> {
    let sentences = read_sentences(&cli.input)?;
    let chain = tagger_chain(MAX_ORDER, &sentences);
    let tagger = &chain[MAX_ORDER];
    for text in &cli.tag {
        let words = tokens(text);
        let tagged: Vec<String> = words
            .iter()
            .zip(tagger.tag(&words))
            .map(|(word, tag)| format!("{word}/{tag}"))
            .collect();
        println!("{}", tagged.join(" "));
    }
    Ok(())
}

fn evaluate_taggers(cli: &Cli) -> Result<()> {
    let sentences = read_sentences(&cli.input)?;
    if sentences.is_empty() {
        warn!("no sentences in {}; nothing to evaluate", cli.input.display());
    }
    let report = jackknife(&sentences, cli.fold_size, cli.parallel)?;
    print!("{}", report.summary());
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    if cli.evaluate_taggers {
        return evaluate_taggers(cli);
    }
    if !cli.tag.is_empty() {
        return tag_sentences(cli);
    }
    if !cli.query.is_empty() || !cli.predict.is_empty() {
        // Lookup mode: read existing outputs, no cleaning or export
        let lookup = load_lookup(cli)?;
        for word in &cli.query {
            print_lookup(&lookup, word);
        }
        for context in &cli.predict {
            print_prediction(&lookup, context, cli);
        }
        return Ok(());
    }

    let config = cli.config();
    let report = run_pipeline(&config)?;
    println!("{}", report.summary);
    println!(
        "Cleaned data: {}\nSemantic data: {}",
        config.cleaned_output_path.display(),
        config.semantic_output_path.display()
    );
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        process::exit(1);
    }
}
