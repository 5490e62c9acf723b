use std::fs::{self, File};
use std::io::{prelude::*, stdout, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser};
use mailvec::{FittedPipeline, NormalizerOptions, Pipeline, RawEmail, Vocabulary};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    about = "A program to convert spam and ham emails into word count vectors.",
    group = ArgGroup::new("dataset").required(true).multiple(true),
)]
struct Args {
    /// A ham email file, or a directory of them
    #[arg(long, group = "dataset")]
    ham: Vec<PathBuf>,

    /// A spam email file, or a directory of them
    #[arg(long, group = "dataset")]
    spam: Vec<PathBuf>,

    /// The maximum number of words in the vocabulary
    #[arg(long, default_value = "1000")]
    vocab_size: usize,

    /// Keep the original letter case
    #[arg(long)]
    no_lowercase: bool,

    /// Keep punctuation marks
    #[arg(long)]
    no_punctuation: bool,

    /// Keep URLs as they are
    #[arg(long)]
    no_urls: bool,

    /// Do not stem words
    #[arg(long)]
    no_stem: bool,

    /// Encode with a vocabulary file written by --save-vocab instead of fitting a new one
    #[arg(long, conflicts_with = "vocab_size")]
    load_vocab: Option<PathBuf>,

    /// The file to write the vocabulary to
    #[arg(long)]
    save_vocab: Option<PathBuf>,

    /// The compression level for zstd
    #[arg(long, default_value = "19")]
    zstd_level: i32,
}

const HAM_LABEL: u8 = 0;
const SPAM_LABEL: u8 = 1;

fn collect_files(path: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if path.is_dir() {
        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();
        for entry in entries {
            collect_files(&entry, files)?;
        }
    } else {
        files.push(path.to_path_buf());
    }
    Ok(())
}

fn load_emails(
    paths: &[PathBuf],
    label: u8,
    emails: &mut Vec<RawEmail>,
    labels: &mut Vec<u8>,
) -> std::io::Result<()> {
    let mut files = vec![];
    for path in paths {
        collect_files(path, &mut files)?;
    }
    for path in files {
        let raw = fs::read(&path)?;
        match RawEmail::parse(raw) {
            Ok(email) => {
                emails.push(email);
                labels.push(label);
            }
            Err(e) => warn!(?path, error = %e, "Skipping unparseable email"),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let options = NormalizerOptions::new()
        .lowercase(!args.no_lowercase)
        .strip_punctuation(!args.no_punctuation)
        .replace_urls(!args.no_urls)
        .stem(!args.no_stem);

    let mut emails = vec![];
    let mut labels = vec![];
    load_emails(&args.ham, HAM_LABEL, &mut emails, &mut labels)?;
    load_emails(&args.spam, SPAM_LABEL, &mut emails, &mut labels)?;
    info!(num_docs = emails.len(), "Loaded emails");

    let (fitted, matrix) = if let Some(path) = args.load_vocab {
        info!(?path, "Loading vocabulary");
        let mut f = zstd::Decoder::with_buffer(BufReader::new(File::open(path)?))?;
        let vocabulary = Vocabulary::read(&mut f)?;
        let fitted = FittedPipeline::from_vocabulary(options, vocabulary);
        let matrix = fitted.transform(&emails);
        (fitted, matrix)
    } else {
        Pipeline::new(options, args.vocab_size).fit_transform(&emails)
    };

    if let Some(path) = args.save_vocab {
        info!(?path, "Writing vocabulary");
        let mut f = zstd::Encoder::new(File::create(path)?, args.zstd_level)?;
        fitted.vocabulary().write(&mut f)?;
        f.finish()?;
    }

    let out = stdout();
    let mut out = BufWriter::new(out.lock());
    for (word, index) in fitted.vocabulary().iter() {
        writeln!(out, "#\t{index}\t{word}")?;
    }
    for (label, row) in labels.iter().zip(matrix.to_dense()) {
        let row: Vec<_> = row.iter().map(|count| count.to_string()).collect();
        writeln!(out, "{label}\t{}", row.join(" "))?;
    }
    out.flush()?;

    Ok(())
}
