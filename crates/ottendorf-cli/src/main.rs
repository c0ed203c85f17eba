//! Ottendorf - book-cipher codec over shared key files
//!
//! JSON goes in on stdin (or `--input`), JSON comes out on stdout; logs go
//! to stderr so the output stays pipeable.

use anyhow::Context;
use clap::{Parser, Subcommand};
use ottendorf_core::{decrypt, encrypt, legacy, KeyFile, KeySet, MessageEnvelope};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ottendorf")]
#[command(about = "Book cipher: messages travel as addresses into shared key files")]
#[command(version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, env = "OTTENDORF_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt {"message": ...} into a cipher payload
    Encrypt {
        /// Key file path; repeat for each file, ids are assigned in order (2 to 5 files)
        #[arg(short, long = "key", required = true)]
        keys: Vec<PathBuf>,

        /// Block width in bits (1 to 32)
        #[arg(short, long, default_value = "8", env = "OTTENDORF_BLOCK_BITS")]
        block_bits: u8,

        /// Input JSON file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Decrypt a cipher payload back into {"message": ...}
    Decrypt {
        /// Key file path; repeat for each file, ids are assigned in order (2 to 5 files)
        #[arg(short, long = "key", required = true)]
        keys: Vec<PathBuf>,

        /// Input JSON file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Character-granularity coordinate cipher over one key text
    Legacy {
        #[command(subcommand)]
        command: LegacyCommand,
    },
}

#[derive(Subcommand, Debug)]
enum LegacyCommand {
    /// Encrypt {"message": ...} into {"cipher": [...]}
    Encrypt {
        /// Key text file
        #[arg(short, long)]
        key: PathBuf,

        /// Input JSON file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Decrypt {"cipher": [...]} back into {"message": ...}
    Decrypt {
        /// Key text file
        #[arg(short, long)]
        key: PathBuf,

        /// Input JSON file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging on stderr
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("ottendorf={log_level},ottendorf_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let output = match args.command {
        Command::Encrypt {
            keys,
            block_bits,
            input,
        } => {
            let keys = load_key_set(&keys)?;
            let envelope: MessageEnvelope = parse_input(input.as_deref())?;
            let payload = encrypt(&envelope.message, &keys, block_bits)?;
            tracing::info!(
                blocks = payload.addresses.len(),
                block_bits,
                "message encrypted"
            );
            serde_json::to_string_pretty(&payload)?
        }
        Command::Decrypt { keys, input } => {
            let keys = load_key_set(&keys)?;
            let payload = parse_input(input.as_deref())?;
            let message = decrypt(&payload, &keys)?;
            serde_json::to_string_pretty(&MessageEnvelope { message })?
        }
        Command::Legacy { command } => match command {
            LegacyCommand::Encrypt { key, input } => {
                let key_text = read_text(&key)?;
                let envelope: MessageEnvelope = parse_input(input.as_deref())?;
                let payload = legacy::encrypt(&key_text, &envelope.message)?;
                tracing::info!(characters = payload.cipher.len(), "message encrypted");
                serde_json::to_string_pretty(&payload)?
            }
            LegacyCommand::Decrypt { key, input } => {
                let key_text = read_text(&key)?;
                let payload = parse_input(input.as_deref())?;
                let message = legacy::decrypt(&key_text, &payload)?;
                serde_json::to_string_pretty(&MessageEnvelope { message })?
            }
        },
    };

    println!("{output}");
    Ok(())
}

/// Read key files in argument order, assigning ids 1..n
fn load_key_set(paths: &[PathBuf]) -> anyhow::Result<KeySet> {
    let mut files = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        let bytes =
            fs::read(path).with_context(|| format!("reading key file {}", path.display()))?;
        files.push(KeyFile::new(i as u32 + 1, display_name(path), bytes)?);
    }
    Ok(KeySet::new(files)?)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading key text {}", path.display()))
}

/// Parse the JSON input from a file, or stdin when no path is given
fn parse_input<T: serde::de::DeserializeOwned>(path: Option<&Path>) -> anyhow::Result<T> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading input {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            buffer
        }
    };
    serde_json::from_str(&text).context("invalid JSON input")
}
