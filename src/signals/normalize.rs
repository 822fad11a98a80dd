use crate::core::{Detection, RawDetection, SignalGuess};
use crate::signals::explain;

/// Outcome of normalization: either a detection ready for scoring, or the
/// Unknown-Signal result when no usable frequency was supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    Ready(Detection),
    Unknown(SignalGuess),
}

impl Normalized {
    pub fn detection(self) -> Option<Detection> {
        match self {
            Normalized::Ready(detection) => Some(detection),
            Normalized::Unknown(_) => None,
        }
    }
}

/// Apply defaults to a raw detection. Never fails.
///
/// Only the presence and numeric type of `frequency_hz` is checked. Zero or
/// negative values pass through and simply miss every catalog range later.
/// Empty strings and a zero bandwidth count as not provided; whitespace is
/// kept as given.
pub fn normalize(raw: &RawDetection, default_region: &str) -> Normalized {
    let modulation = raw
        .modulation
        .as_ref()
        .filter(|m| !m.is_empty())
        .cloned();

    let Some(frequency_hz) = raw.frequency_hz.filter(|f| f.is_finite()) else {
        return Normalized::Unknown(SignalGuess::unknown(explain::unknown_explanation(
            None,
            modulation.as_deref(),
        )));
    };

    let region = raw
        .region
        .as_ref()
        .filter(|r| !r.is_empty())
        .cloned()
        .unwrap_or_else(|| default_region.to_string());

    Normalized::Ready(Detection {
        frequency_hz,
        modulation,
        bandwidth_hz: raw.bandwidth_hz.filter(|b| b.is_finite() && *b != 0.0),
        duration_ms: raw.duration_ms.filter(|d| d.is_finite()),
        repetition_count: raw.repetition_count,
        rssi_dbm: raw.rssi_dbm.filter(|r| r.is_finite()),
        region,
    })
}
