use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use lanetag::{Tagger, Trainer};
use tracing_subscriber::EnvFilter;

/// Train a part-of-speech tagger from a labeled corpus, then tag sentences
/// read from standard input.
///
/// Input is one token per line with a blank line ending each sentence.
/// Every sentence is echoed as tab-separated token/label lines followed by
/// a blank line; a final sentence left open at end of input is tagged too.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Labeled training corpus: token line, label line, repeated, with a
    /// blank line closing each sentence.
    corpus: PathBuf,

    /// Decoder worker threads; defaults to the number of available CPUs.
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    if args.workers == Some(0) {
        bail!("--workers must be at least 1");
    }

    let mut trainer = Trainer::new();
    trainer
        .read_corpus_path(&args.corpus)
        .with_context(|| format!("reading corpus {}", args.corpus.display()))?;
    let trained = trainer.estimate().context("estimating model parameters")?;
    let mut tagger = match args.workers {
        Some(workers) => Tagger::with_workers(trained, workers),
        None => Tagger::new(trained),
    };

    let stdin = io::stdin().lock();
    let mut out = BufWriter::new(io::stdout().lock());
    let mut sentence: Vec<String> = Vec::new();
    for line in stdin.lines() {
        let line = line.context("reading standard input")?;
        let token = line.strip_suffix('\r').unwrap_or(&line);
        if token.is_empty() {
            tag_sentence(&mut tagger, &mut sentence, &mut out)?;
        } else {
            sentence.push(token.to_owned());
        }
    }
    tag_sentence(&mut tagger, &mut sentence, &mut out)?;
    out.flush().context("flushing standard output")?;

    if tagger.unknown_tokens() > 0 {
        tracing::info!(
            unknown = tagger.unknown_tokens(),
            "input tokens outside the training vocabulary used the fallback mapping"
        );
    }
    Ok(())
}

fn tag_sentence(
    tagger: &mut Tagger,
    sentence: &mut Vec<String>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if sentence.is_empty() {
        return Ok(());
    }
    let labels = tagger.tag(sentence);
    for (token, label) in sentence.iter().zip(&labels) {
        writeln!(out, "{token}\t{label}")?;
    }
    writeln!(out)?;
    sentence.clear();
    Ok(())
}
