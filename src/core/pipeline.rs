use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::core::{RawDetection, SignalGuess};
use crate::signals::SignalEngine;

/// One record out of the pipeline, written as a JSON line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineOutput {
    Classified {
        line: u64,
        classified_at: DateTime<Utc>,
        detection: RawDetection,
        guess: SignalGuess,
    },
    Rejected {
        line: u64,
        error: String,
    },
}

/// Run the pipeline: receive newline-delimited JSON detections, classify,
/// forward results. Ends when the input channel closes or the output side
/// goes away.
pub async fn run_pipeline(
    mut rx: mpsc::UnboundedReceiver<String>,
    out_tx: mpsc::UnboundedSender<PipelineOutput>,
    engine: Arc<SignalEngine>,
    config: PipelineConfig,
) {
    let mut line_no: u64 = 0;
    let mut classified: u64 = 0;
    let mut rejected: u64 = 0;

    info!("Pipeline started, waiting for detections...");

    while let Some(text) = rx.recv().await {
        line_no += 1;
        if text.trim().is_empty() {
            continue;
        }

        let output = match parse_detection(&text) {
            Ok(detection) => {
                let guess = engine.classify(&detection);
                classified += 1;
                debug!("line {line_no}: {} ({})", guess.primary_label, guess.confidence);
                PipelineOutput::Classified {
                    line: line_no,
                    classified_at: Utc::now(),
                    detection,
                    guess,
                }
            }
            Err(e) => {
                rejected += 1;
                warn!("line {line_no}: rejected: {e}");
                PipelineOutput::Rejected {
                    line: line_no,
                    error: e,
                }
            }
        };

        if config.stats_interval > 0 && (classified + rejected) % config.stats_interval == 0 {
            info!("Pipeline processed {classified} detections, {rejected} rejected");
        }

        if out_tx.send(output).is_err() {
            info!("Output channel closed, stopping pipeline");
            break;
        }
    }

    info!("Pipeline shutting down after {classified} detections, {rejected} rejected");
}

/// A line must hold a JSON object; its fields are read leniently.
fn parse_detection(text: &str) -> Result<RawDetection, String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
