//! Command-line interface for manifest building and audio persistence.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use ttsprep::audio::io::WavIo;
use ttsprep::config::{load_config, Config};
use ttsprep::logging::{init_tracing, LoggingConfig};
use ttsprep::{perf, AudioPersistor, ManifestBuilder, SavedWith};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "ttsprep")]
#[command(about = "Prepare TTS training manifests and write audio files", long_about = None)]
struct Cli {
    /// Log per-row decisions and print a run summary at the end.
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
    /// Optional YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a metadata table (audio_path|text|speaker_id) into a JSONL manifest.
    Manifest {
        /// Path to the metadata table.
        #[arg(long)]
        csv: PathBuf,
        /// Directory containing the referenced audio files.
        #[arg(long)]
        audio_root: PathBuf,
        /// Destination JSONL manifest path.
        #[arg(long)]
        output: PathBuf,
        /// Column delimiter used in the table.
        #[arg(long)]
        delimiter: Option<String>,
        /// Language code to tag samples with.
        #[arg(long)]
        language: Option<String>,
    },
    /// Audio utility subcommands.
    Audio {
        /// Audio subcommand to execute.
        #[command(subcommand)]
        command: AudioCommands,
    },
}

/// Audio utility commands.
#[derive(Subcommand)]
enum AudioCommands {
    /// Re-encode a WAV file through the backend fallback chain.
    Write {
        /// Input WAV path.
        #[arg(long)]
        input: PathBuf,
        /// Output WAV path.
        #[arg(long)]
        output: PathBuf,
        /// Encoding subtype for the primary backend (e.g. PCM_16, PCM_24, FLOAT).
        #[arg(long)]
        subtype: Option<String>,
        /// Disable the primary backend and write with the fallback only.
        #[arg(long)]
        no_primary: bool,
    },
    /// Print the format of a WAV file.
    Info {
        /// Input WAV path.
        #[arg(long)]
        input: PathBuf,
    },
}

/// Entry point for the CLI.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(LoggingConfig {
        verbose: cli.verbose,
        json: cli.log_json,
    });
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Manifest {
            csv,
            audio_root,
            output,
            delimiter,
            language,
        } => {
            let options = config.manifest.options(delimiter, language);
            let summary = ManifestBuilder::new(options).build(&csv, &audio_root, &output)?;
            let shown = output.canonicalize().unwrap_or(output);
            println!(
                "Wrote {} samples to {} (skipped {}).",
                summary.processed,
                shown.display(),
                summary.skipped
            );
        }
        Commands::Audio { command } => match command {
            AudioCommands::Write {
                input,
                output,
                subtype,
                no_primary,
            } => {
                let subtype = subtype.unwrap_or_else(|| config.audio.subtype.clone());
                let mut backends = config.audio.backends();
                if no_primary {
                    backends = backends.without_primary();
                }
                let persistor = AudioPersistor::new(backends);
                run_audio_write(&persistor, &input, &output, &subtype)?;
            }
            AudioCommands::Info { input } => {
                let info = WavIo::info(&input)
                    .with_context(|| format!("failed to read {}", input.display()))?;
                println!("channels: {}", info.spec.channels);
                println!("sample_rate: {}", info.spec.sample_rate);
                println!("frames: {}", info.frames);
                println!("bits_per_sample: {}", info.spec.bits_per_sample);
                println!("sample_format: {:?}", info.spec.sample_format);
            }
        },
    }

    if cli.verbose {
        eprintln!("{}", perf::report());
    }

    Ok(())
}

fn run_audio_write(
    persistor: &AudioPersistor,
    input: &Path,
    output: &Path,
    subtype: &str,
) -> Result<()> {
    let (buffer, sample_rate) = WavIo::read_buffer(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let saved = persistor.save(output, &buffer, sample_rate, subtype)?;
    let backend = match saved {
        SavedWith::Primary => persistor.backends().primary().map(|b| b.name()),
        SavedWith::Secondary => persistor.backends().secondary().map(|b| b.name()),
    };
    println!(
        "Wrote {} ({} channels, {} frames) with the {} backend.",
        output.display(),
        buffer.channels(),
        buffer.frames(),
        backend.unwrap_or("unknown")
    );
    Ok(())
}
