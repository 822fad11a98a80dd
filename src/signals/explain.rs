use crate::catalog::CatalogEntry;
use crate::core::{Confidence, Detection};
use crate::signals::rules::SHORT_BURST_MAX_MS;

/// Sightings needed before "repeated transmission" is cited as evidence.
/// One higher than the scoring threshold in `rules`.
pub const REPETITION_MIN_EVIDENCE: i64 = 3;

/// Hedged sentence for a matched identification, followed by the observed
/// characteristics that were supplied. Scores are never mentioned.
pub fn explanation(entry: &CatalogEntry, confidence: Confidence, detection: &Detection) -> String {
    let verb = match confidence {
        Confidence::High => "is consistent with",
        Confidence::Medium => "could indicate",
        Confidence::Low => "may be associated with",
    };
    let mut text = format!(
        "Frequency of {} {verb} {}.",
        format_mhz(detection.frequency_hz),
        entry.description.to_lowercase()
    );

    let evidence = evidence(detection);
    if !evidence.is_empty() {
        let list = evidence.join(", ");
        match confidence {
            Confidence::High => {
                text.push_str(&format!(
                    " Observed characteristics ({list}) support this identification."
                ));
            }
            Confidence::Medium | Confidence::Low => {
                text.push_str(&format!(" Observed {list}."));
            }
        }
    }
    text
}

/// Explanation for a detection nothing in the catalog accounts for.
pub fn unknown_explanation(frequency_hz: Option<f64>, modulation: Option<&str>) -> String {
    let at = match frequency_hz {
        Some(hz) => format_mhz(hz),
        None => "an unmeasured frequency".to_string(),
    };
    match modulation {
        Some(modulation) => format!(
            "Signal at {at} with {modulation} modulation does not match common allocations for this region."
        ),
        None => format!(
            "Signal at {at} does not match common allocations for this region. \
             Additional characteristics may help identification."
        ),
    }
}

fn evidence(detection: &Detection) -> Vec<String> {
    let mut items = Vec::new();
    if let Some(modulation) = &detection.modulation {
        items.push(format!("{modulation} modulation"));
    }
    if let Some(bandwidth) = detection.bandwidth_hz {
        items.push(format!("~{:.0} kHz bandwidth", bandwidth / 1000.0));
    }
    if detection.duration_ms.is_some_and(|d| d < SHORT_BURST_MAX_MS) {
        items.push("short-burst pattern".to_string());
    }
    if detection
        .repetition_count
        .is_some_and(|n| n >= REPETITION_MIN_EVIDENCE)
    {
        items.push("repeated transmission".to_string());
    }
    items
}

fn format_mhz(hz: f64) -> String {
    format!("{:.3} MHz", hz / 1_000_000.0)
}
