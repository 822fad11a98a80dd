use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use rfguess::config::PipelineConfig;
use rfguess::core::pipeline::run_pipeline;
use rfguess::{Catalog, Config, RawDetection, SignalEngine};

#[derive(Parser, Debug)]
#[command(name = "rfguess", version, about = "Hedged identification of detected radio signals")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "rfguess.toml", env = "RFGUESS_CONFIG", global = true)]
    config: PathBuf,

    /// Default region code, overriding the config file
    #[arg(long, global = true)]
    region: Option<String>,

    /// Catalog file, overriding the config file and the built-in table
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a single detection and print the result as JSON
    Classify(ClassifyArgs),
    /// List catalog entries allocated at a frequency
    Allocations {
        #[arg(long)]
        frequency_hz: f64,
    },
    /// Classify newline-delimited JSON detections from a file or stdin
    Stream {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Validate the active catalog and print its fingerprint
    Catalog {
        /// Dump the full catalog as JSON instead
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    #[arg(long)]
    frequency_hz: f64,
    #[arg(long)]
    modulation: Option<String>,
    #[arg(long)]
    bandwidth_hz: Option<f64>,
    #[arg(long)]
    duration_ms: Option<f64>,
    #[arg(long)]
    repetition_count: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    rssi_dbm: Option<f64>,
}

impl From<ClassifyArgs> for RawDetection {
    fn from(args: ClassifyArgs) -> Self {
        RawDetection {
            frequency_hz: Some(args.frequency_hz),
            modulation: args.modulation,
            bandwidth_hz: args.bandwidth_hz,
            duration_ms: args.duration_ms,
            repetition_count: args.repetition_count,
            rssi_dbm: args.rssi_dbm,
            region: None,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries results only
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rfguess=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config);
    let engine = build_engine(&cli, &config)?;
    let pretty = config.pipeline.pretty;

    match cli.command {
        Command::Classify(args) => {
            let guess = engine.classify(&RawDetection::from(args));
            print_json(&guess, pretty)?;
        }
        Command::Allocations { frequency_hz } => {
            print_json(&engine.allocations(frequency_hz, None), pretty)?;
        }
        Command::Stream { input } => {
            stream(engine, input, config.pipeline)?;
        }
        Command::Catalog { json } => {
            let catalog = engine.catalog();
            if json {
                println!("{}", catalog.to_json().context("failed to render catalog")?);
            } else {
                println!("entries: {}", catalog.len());
                println!("fingerprint: {}", catalog.fingerprint());
            }
        }
    }
    Ok(())
}

fn build_engine(cli: &Cli, config: &Config) -> Result<SignalEngine> {
    let catalog_path = cli
        .catalog
        .clone()
        .or_else(|| config.catalog.path.as_ref().map(PathBuf::from));

    let catalog = match catalog_path {
        Some(path) => Arc::new(
            Catalog::load(&path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?,
        ),
        None => Catalog::builtin(),
    };

    let region = cli
        .region
        .clone()
        .unwrap_or_else(|| config.engine.default_region.clone());
    tracing::info!("Engine ready: {} signal types, default region {region}", catalog.len());

    Ok(SignalEngine::new(catalog, region))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

/// Reader task → pipeline → stdout, one JSON line per input line.
fn stream(engine: SignalEngine, input: Option<PathBuf>, config: PipelineConfig) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(async move {
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        let reader = tokio::spawn(read_lines(input, line_tx));
        let pipeline = tokio::spawn(run_pipeline(line_rx, out_tx, Arc::new(engine), config));

        let mut stdout = tokio::io::stdout();
        while let Some(output) = out_rx.recv().await {
            let mut line = serde_json::to_vec(&output)?;
            line.push(b'\n');
            stdout.write_all(&line).await?;
        }
        stdout.flush().await?;

        reader.await.context("reader task failed")??;
        pipeline.await.context("pipeline task failed")?;
        Ok::<(), anyhow::Error>(())
    })
}

async fn read_lines(input: Option<PathBuf>, tx: mpsc::UnboundedSender<String>) -> Result<()> {
    match input {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            forward_lines(BufReader::new(file), tx).await
        }
        None => forward_lines(BufReader::new(tokio::io::stdin()), tx).await,
    }
}

/// Forward input line by line. Bytes that are not UTF-8 are replaced rather
/// than ending the stream; the pipeline rejects such lines individually.
async fn forward_lines<R: AsyncBufRead + Unpin>(
    mut reader: R,
    tx: mpsc::UnboundedSender<String>,
) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        if tx.send(line).is_err() {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfguess::core::pipeline::PipelineOutput;

    async fn forwarded(input: &[u8]) -> Vec<String> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        forward_lines(input, tx).await.unwrap();
        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn invalid_utf8_line_does_not_end_input() {
        let lines = forwarded(
            b"{\"frequency_hz\":98500000}\n\xff\xfe\n{\"frequency_hz\":137100000}\n",
        )
        .await;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"frequency_hz":98500000}"#);
        assert_eq!(lines[1], "\u{FFFD}\u{FFFD}");
        assert_eq!(lines[2], r#"{"frequency_hz":137100000}"#);
    }

    #[tokio::test]
    async fn strips_line_endings() {
        assert_eq!(forwarded(b"a\r\nb\nc").await, vec!["a", "b", "c"]);
        assert!(forwarded(b"").await.is_empty());
    }

    #[tokio::test]
    async fn records_after_bad_bytes_are_classified() {
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let input: &[u8] = b"{\"frequency_hz\":98500000}\n\xff\xfe\n{\"frequency_hz\":137100000}\n";

        forward_lines(input, line_tx).await.unwrap();
        run_pipeline(
            line_rx,
            out_tx,
            Arc::new(SignalEngine::builtin()),
            PipelineConfig::default(),
        )
        .await;

        let mut outputs = Vec::new();
        while let Some(output) = out_rx.recv().await {
            outputs.push(output);
        }
        assert_eq!(outputs.len(), 3);
        assert!(matches!(outputs[1], PipelineOutput::Rejected { line: 2, .. }));
        match &outputs[2] {
            PipelineOutput::Classified { line: 3, guess, .. } => {
                assert_eq!(guess.primary_label, "Weather Satellite (NOAA)");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
