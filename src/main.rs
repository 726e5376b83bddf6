//! `lyrics-eval` - score lyrics transcripts against references from the command line.
//!
//! Usage:
//!   `lyrics-eval --reference ref.txt --hypothesis hyp.txt`
//!   `lyrics-eval --manifest dataset.jsonl --json`
//!   `lyrics-eval --manifest dataset.jsonl --visualize text`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use lyrics_eval::config::Config;
use lyrics_eval::manifest::{load_manifest, load_pairs};
use lyrics_eval::metrics::{CorpusMetrics, SymbolAlignment};
use lyrics_eval::types::SymbolCategory;
use lyrics_eval::visualize::{render_html, render_text};
use lyrics_eval::compute_metrics;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VisualFormat {
    /// `<span>` markup with one class per token.
    Html,
    /// `[-deleted-]{+inserted+}` diff.
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SymbolMode {
    /// Punctuation and parentheses by presence, breaks by position.
    Hybrid,
    /// One alignment over the full token streams.
    Global,
    /// Each symbol category aligned on its own.
    PerCategory,
}

impl From<SymbolMode> for SymbolAlignment {
    fn from(mode: SymbolMode) -> Self {
        match mode {
            SymbolMode::Hybrid => Self::Hybrid,
            SymbolMode::Global => Self::Global,
            SymbolMode::PerCategory => Self::PerCategory,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "lyrics-eval", author, version, about)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Reference lyrics file; repeat and pair with --hypothesis in order.
    #[arg(long = "reference", short = 'r', value_name = "FILE")]
    references: Vec<PathBuf>,

    /// Hypothesis transcript file; repeat and pair with --reference in order.
    #[arg(long = "hypothesis", short = 'p', value_name = "FILE")]
    hypotheses: Vec<PathBuf>,

    /// JSON Lines manifest with `reference`, `hypothesis` and optional `language` fields.
    #[arg(long, short = 'm', conflicts_with_all = ["references", "hypotheses"])]
    manifest: Option<PathBuf>,

    /// Language code for examples without their own tag (default: `LYRICS_EVAL_LANGUAGE` or `en`).
    #[arg(long, short = 'l')]
    language: Option<String>,

    /// Skip punctuation, parenthesis and break scoring.
    #[arg(long)]
    no_other: bool,

    /// Print a word-level error visualization for every example.
    #[arg(long, value_enum, num_args = 0..=1, default_missing_value = "html")]
    visualize: Option<VisualFormat>,

    /// How symbol tokens are aligned.
    #[arg(long, value_enum)]
    symbol_alignment: Option<SymbolMode>,

    /// Apply the corrective lyric normalizer to hypotheses before scoring.
    #[arg(long)]
    normalize_hypotheses: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Enable debug logging.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let config = Config::load().context("Failed to load configuration")?;
    info!("{} v{}", config.app_name(), config.app_version());

    let mut options = config.options;
    if cli.no_other {
        options.include_other = false;
    }
    if let Some(mode) = cli.symbol_alignment {
        options.symbol_alignment = mode.into();
    }
    let format = cli.visualize.or_else(|| options.visualize_errors.then_some(VisualFormat::Html));
    options.visualize_errors = format.is_some();
    let language = cli.language.clone().unwrap_or(config.language);

    let mut dataset = match &cli.manifest {
        Some(path) => load_manifest(path)
            .with_context(|| format!("Failed to load manifest {}", path.display()))?,
        None if cli.references.is_empty() => {
            bail!("Nothing to evaluate: pass --manifest or --reference/--hypothesis pairs")
        }
        None => load_pairs(&cli.references, &cli.hypotheses).context("Failed to load transcript files")?,
    };
    if cli.normalize_hypotheses {
        dataset.normalize_hypotheses();
    }

    let evaluation = compute_metrics(
        &dataset.references,
        &dataset.hypotheses,
        &dataset.languages(&language),
        &options,
    )?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
        return Ok(());
    }

    print_metrics(&evaluation.metrics);
    if let (Some(format), Some(visualizations)) = (format, &evaluation.visualizations) {
        for (index, spans) in visualizations.iter().enumerate() {
            let rendered = match format {
                VisualFormat::Html => render_html(spans),
                VisualFormat::Text => render_text(spans),
            };
            println!("\n[{index}] {rendered}");
        }
    }
    Ok(())
}

fn print_metrics(metrics: &CorpusMetrics) {
    let overall = &metrics.overall;
    let words = &metrics.counts.words;
    println!("examples          {}", metrics.examples);
    println!("reference words   {}", words.reference_len());
    println!(
        "WER               {:.4}  (S {} / D {} / I {})",
        overall.wer, words.substitutions, words.deletions, words.insertions
    );
    println!("MER               {:.4}", overall.mer);
    println!("WIL               {:.4}", overall.wil);
    println!("case error rate   {:.4}  ({} case errors)", overall.case_error_rate, metrics.counts.case_errors);

    let Some(symbols) = &overall.symbols else {
        return;
    };
    println!("\n{:<16}  {:>9}  {:>9}  {:>9}", "symbols", "precision", "recall", "F");
    for &category in SymbolCategory::all() {
        let scores = symbols.get(category);
        println!(
            "{:<16}  {:>9.4}  {:>9.4}  {:>9.4}",
            category.name(),
            scores.precision,
            scores.recall,
            scores.f_score
        );
    }
}
