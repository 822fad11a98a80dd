pub mod pipeline;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Label reported when no catalog entry survives scoring.
pub const UNKNOWN_LABEL: &str = "Unknown Signal";

/// Tag set reported alongside [`UNKNOWN_LABEL`].
pub const UNKNOWN_TAG: &str = "unknown";

/// A detection as handed over by the measurement side. Every field is
/// optional; values of the wrong JSON type read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDetection {
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub frequency_hz: Option<f64>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub modulation: Option<String>,
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub bandwidth_hz: Option<f64>,
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    #[serde(deserialize_with = "lenient_i64", skip_serializing_if = "Option::is_none")]
    pub repetition_count: Option<i64>,
    /// Accepted and carried, not scored.
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub rssi_dbm: Option<f64>,
    #[serde(deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl RawDetection {
    pub fn at(frequency_hz: f64) -> Self {
        Self {
            frequency_hz: Some(frequency_hz),
            ..Self::default()
        }
    }

    pub fn with_modulation(mut self, modulation: impl Into<String>) -> Self {
        self.modulation = Some(modulation.into());
        self
    }

    pub fn with_bandwidth_hz(mut self, bandwidth_hz: f64) -> Self {
        self.bandwidth_hz = Some(bandwidth_hz);
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_repetition_count(mut self, count: i64) -> Self {
        self.repetition_count = Some(count);
        self
    }

    pub fn with_rssi_dbm(mut self, rssi_dbm: f64) -> Self {
        self.rssi_dbm = Some(rssi_dbm);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// A detection that passed normalization: the frequency is a finite number
/// and the region is resolved. Auxiliary values are not range-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub frequency_hz: f64,
    pub modulation: Option<String>,
    pub bandwidth_hz: Option<f64>,
    pub duration_ms: Option<f64>,
    pub repetition_count: Option<i64>,
    pub rssi_dbm: Option<f64>,
    pub region: String,
}

impl Detection {
    /// Whether the detection carries modulation or bandwidth evidence.
    pub fn has_shape_evidence(&self) -> bool {
        self.modulation.is_some() || self.bandwidth_hz.is_some()
    }
}

/// Hedge strength attached to an identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub label: String,
    pub confidence: Confidence,
}

/// The identification handed to callers. Scores never appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalGuess {
    pub primary_label: String,
    pub confidence: Confidence,
    pub alternatives: Vec<Alternative>,
    pub explanation: String,
    pub tags: Vec<String>,
}

impl SignalGuess {
    pub fn unknown(explanation: String) -> Self {
        Self {
            primary_label: UNKNOWN_LABEL.to_string(),
            confidence: Confidence::Low,
            alternatives: Vec::new(),
            explanation,
            tags: vec![UNKNOWN_TAG.to_string()],
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.primary_label == UNKNOWN_LABEL
    }
}

// --- Lenient field readers ---

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
    }))
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_string)))
}
