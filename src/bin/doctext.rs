//! CLI binary for doctext.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`, runs one extraction and/or conversion, and saves the
//! result.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use doctext::{
    sanitize_stem, suggested_file_name, BinaryArtifact, ClientConfig, DocumentClient,
    ExtractionResult, OutputFormat, UploadRequest,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Print the text of a scanned page
  doctext extract scan.png

  # Save it to a file, or as JSON
  doctext extract scan.png -o scan.txt
  doctext extract scan.png --json

  # Turn text into a PDF named notes.pdf in ./out
  doctext convert --text "hello text" -f pdf -n notes -d out

  # Extract then convert in one go (writes report.doc)
  doctext run report.pdf -f doc

FORMATS:
  txt     text/plain
  pdf     application/pdf
  doc     application/msword
  image   image/png
  Any other value is passed to the service unchanged.

ENVIRONMENT VARIABLES:
  DOCTEXT_BASE_URL   Service base URL (default http://127.0.0.1:5000/api)
  DOCTEXT_TIMEOUT    Request timeout in seconds (default 120)
  RUST_LOG           Overrides the log filter chosen by -v / -q
"#;

/// Extract text from documents and convert it to other formats via a remote service.
#[derive(Parser, Debug)]
#[command(
    name = "doctext",
    version,
    about = "Extract text from documents and convert it via a remote service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Service base URL.
    #[arg(long, global = true, env = "DOCTEXT_BASE_URL",
          default_value = doctext::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "DOCTEXT_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DOCTEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and results.
    #[arg(short, long, global = true, env = "DOCTEXT_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file and print the extracted text.
    Extract {
        /// File to upload.
        file: PathBuf,

        /// Write the text to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print `{"extractedText": ...}` instead of raw text.
        #[arg(long)]
        json: bool,
    },

    /// Convert text to a file format.
    Convert {
        #[command(flatten)]
        source: TextSource,

        #[command(flatten)]
        target: Target,

        /// Base name of the produced file.
        #[arg(short, long, default_value = "")]
        name: String,
    },

    /// Extract a file's text, then convert it.
    Run {
        /// File to upload.
        file: PathBuf,

        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct TextSource {
    /// Text to convert.
    #[arg(long)]
    text: Option<String>,

    /// Read the text to convert from this file.
    #[arg(long)]
    text_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct Target {
    /// Output format: txt, pdf, doc, image.
    #[arg(short, long, default_value = "txt")]
    format: OutputFormat,

    /// Directory to save the converted file in.
    #[arg(short = 'd', long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback that matters; library INFO logs
    // would only interleave with it.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build client ─────────────────────────────────────────────────────
    let config = ClientConfig::builder()
        .base_url(&cli.base_url)
        .timeout_secs(cli.timeout)
        .build()
        .context("Invalid configuration")?;
    let client = DocumentClient::new(&config).context("Failed to create client")?;
    let show_progress = !cli.quiet && !cli.verbose;

    match cli.command {
        Command::Extract { file, output, json } => {
            let text = extract_file(&client, &file, show_progress).await?;
            let rendered = if json {
                let result = ExtractionResult { extracted_text: text };
                serde_json::to_string_pretty(&result).context("Failed to serialise output")?
            } else {
                text
            };
            match output {
                Some(path) => {
                    tokio::fs::write(&path, rendered.as_bytes())
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    if !cli.quiet {
                        eprintln!("{} Wrote {}", green("✔"), bold(&path.display().to_string()));
                    }
                }
                None => print_stdout(&rendered)?,
            }
        }

        Command::Convert {
            source,
            target,
            name,
        } => {
            let text = match (source.text, source.text_file) {
                (Some(t), _) => t,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read text from {}", path.display()))?,
                (None, None) => bail!("Provide --text or --text-file"),
            };
            let stem = if name.trim().is_empty() {
                config.default_filename.clone()
            } else {
                name
            };
            convert_and_save(&client, &text, &stem, &target, cli.quiet, show_progress).await?;
        }

        Command::Run { file, target } => {
            let text = extract_file(&client, &file, show_progress).await?;
            if text.trim().is_empty() {
                bail!("No text was extracted from the file");
            }
            if !cli.quiet {
                eprintln!(
                    "{} Extracted {} chars from {}",
                    green("✔"),
                    text.chars().count(),
                    file.display()
                );
            }
            let stem = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            convert_and_save(&client, &text, &stem, &target, cli.quiet, show_progress).await?;
        }
    }

    Ok(())
}

async fn extract_file(client: &DocumentClient, file: &Path, show_progress: bool) -> Result<String> {
    let upload = UploadRequest::from_path(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let label = format!("Extracting text from {}…", file.display());
    let text = with_spinner(show_progress, label, client.extract(upload)).await?;
    Ok(text)
}

async fn convert_and_save(
    client: &DocumentClient,
    text: &str,
    stem: &str,
    target: &Target,
    quiet: bool,
    show_progress: bool,
) -> Result<()> {
    let stem = sanitize_stem(stem, doctext::config::DEFAULT_FILENAME);
    let file_name = suggested_file_name(&stem, &target.format);

    let label = format!("Converting to {}…", target.format);
    let artifact: BinaryArtifact = with_spinner(
        show_progress,
        label,
        client.convert(text, target.format.clone(), stem),
    )
    .await?;

    let path = target.out_dir.join(&file_name);
    artifact
        .save_to(&path)
        .await
        .with_context(|| format!("Failed to save {}", path.display()))?;

    if !quiet {
        eprintln!(
            "{} Saved {}  {}",
            green("✔"),
            bold(&path.display().to_string()),
            dim(&format!("{} bytes, {}", artifact.len(), artifact.mime_type)),
        );
    }
    Ok(())
}

/// Run `fut` while a spinner shows `label` on stderr.
async fn with_spinner<T, E>(
    show: bool,
    label: String,
    fut: impl Future<Output = std::result::Result<T, E>>,
) -> std::result::Result<T, E> {
    if !show {
        return fut.await;
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(label);
    bar.enable_steady_tick(Duration::from_millis(80));
    let result = fut.await;
    bar.finish_and_clear();
    result
}

fn print_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}
