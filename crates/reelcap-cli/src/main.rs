//! Reelcap CLI
//!
//! Headless driver for the caption engine: ingest a transcription result
//! from JSON, re-wrap it for on-screen display, and export SRT.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reelcap_core::captions::{export_srt, ingest, rewrap, TranscriptionResult, WrapSettings};
use reelcap_core::Size2D;

#[derive(Parser, Debug)]
#[command(name = "reelcap", version, about = "Caption timeline processing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a transcription JSON file to SRT
    Convert {
        /// Transcription result JSON file
        input: PathBuf,
        /// Output SRT file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Maximum characters per caption line
        #[arg(long, default_value_t = 38)]
        max_chars: usize,
        /// Maximum words per caption line
        #[arg(long, default_value_t = 7)]
        max_words: usize,
        /// Video frame width in pixels
        #[arg(long, default_value_t = 1920)]
        width: u32,
        /// Video frame height in pixels
        #[arg(long, default_value_t = 1080)]
        height: u32,
    },
    /// Print a per-segment summary of a transcription JSON file
    Inspect {
        /// Transcription result JSON file
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            max_chars,
            max_words,
            width,
            height,
        } => {
            let transcription = read_transcription(&input)?;
            let settings = WrapSettings::new(max_chars, max_words);

            let timeline = ingest(&transcription, Size2D::new(width, height))
                .context("failed to ingest transcription")?;
            let timeline = rewrap(&timeline, &settings).context("failed to wrap captions")?;
            tracing::debug!(
                "wrapped {} transcription segments into {} captions",
                transcription.segments.len(),
                timeline.len()
            );
            let srt = export_srt(&timeline);

            match output {
                Some(path) => {
                    fs::write(&path, srt.as_bytes())
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Wrote {} captions to {}", timeline.len(), path.display());
                }
                None => println!("{}", srt),
            }
        }
        Commands::Inspect { input } => {
            let transcription = read_transcription(&input)?;
            let timeline = ingest(&transcription, Size2D::default())
                .context("failed to ingest transcription")?;

            for segment in &timeline {
                println!(
                    "{:<12} {:>8}ms ~ {:>8}ms  {:>3} words  {}",
                    segment.id,
                    segment.start_ms,
                    segment.end_ms,
                    segment.words.len(),
                    segment.text
                );
            }
        }
    }

    Ok(())
}

fn read_transcription(path: &PathBuf) -> anyhow::Result<TranscriptionResult> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse transcription JSON in {}", path.display()))
}
