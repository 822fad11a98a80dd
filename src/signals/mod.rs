pub mod confidence;
pub mod explain;
pub mod normalize;
pub mod rank;
pub mod rules;
pub mod score;

use std::sync::{Arc, OnceLock};

use crate::catalog::Catalog;
use crate::core::{Alternative, Detection, RawDetection, SignalGuess};
use normalize::Normalized;
use rank::{Candidate, Ranking};

/// Region assumed when neither the detection nor the caller names one.
pub const DEFAULT_REGION: &str = "UK/EU";

/// The guessing engine: scores a detection against every catalog entry and
/// reports a hedged identification. Holds no mutable state, so one engine
/// can serve any number of threads.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    catalog: Arc<Catalog>,
    default_region: String,
}

impl SignalEngine {
    pub fn new(catalog: Arc<Catalog>, default_region: impl Into<String>) -> Self {
        Self {
            catalog,
            default_region: default_region.into(),
        }
    }

    /// Built-in catalog, [`DEFAULT_REGION`].
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin(), DEFAULT_REGION)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    pub fn normalize(&self, raw: &RawDetection) -> Normalized {
        normalize::normalize(raw, &self.default_region)
    }

    pub fn classify(&self, raw: &RawDetection) -> SignalGuess {
        match self.normalize(raw) {
            Normalized::Ready(detection) => self.classify_detection(&detection),
            Normalized::Unknown(guess) => {
                tracing::debug!("Detection without usable frequency, reporting unknown");
                guess
            }
        }
    }

    pub fn classify_detection(&self, detection: &Detection) -> SignalGuess {
        let (primary, alternates) = match rank::rank(&self.catalog, detection) {
            Ranking::Matched { primary, alternates } => (primary, alternates),
            Ranking::Unknown => {
                tracing::debug!(
                    "No catalog match at {} Hz in region {}",
                    detection.frequency_hz,
                    detection.region
                );
                return SignalGuess::unknown(explain::unknown_explanation(
                    Some(detection.frequency_hz),
                    detection.modulation.as_deref(),
                ));
            }
        };

        for candidate in std::iter::once(&primary).chain(&alternates) {
            tracing::trace!("candidate {:?} scored {}", candidate.label(), candidate.score);
        }

        let confidence = confidence::primary_confidence(
            primary.score,
            alternates.first().map(|c| c.score),
            detection.has_shape_evidence(),
        );

        let alternatives = alternates
            .iter()
            .map(|alt| Alternative {
                label: alt.entry.label.clone(),
                confidence: confidence::alternative_confidence(alt.score, primary.score, confidence),
            })
            .collect();

        tracing::debug!(
            "Classified {} Hz as {:?} ({confidence}, {} alternatives)",
            detection.frequency_hz,
            primary.label(),
            alternates.len()
        );

        SignalGuess {
            primary_label: primary.entry.label.clone(),
            confidence,
            alternatives,
            explanation: explain::explanation(primary.entry, confidence, detection),
            tags: primary.entry.tags.clone(),
        }
    }

    /// All matching entries with their internal scores, best first. For
    /// diagnostics and parity checks; never part of a [`SignalGuess`].
    pub fn candidates(&self, detection: &Detection) -> Vec<Candidate<'_>> {
        rank::scored_candidates(&self.catalog, detection)
    }

    /// Labels of every entry allocated at this frequency in the region
    /// (default region if `None`), in catalog order. No scoring.
    pub fn allocations(&self, frequency_hz: f64, region: Option<&str>) -> Vec<&str> {
        let region = region.unwrap_or(&self.default_region);
        self.catalog
            .iter()
            .filter(|e| e.applies_to_region(region) && e.covers_frequency(frequency_hz))
            .map(|e| e.label.as_str())
            .collect()
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Classify with the built-in catalog and [`DEFAULT_REGION`].
pub fn classify(raw: &RawDetection) -> SignalGuess {
    static ENGINE: OnceLock<SignalEngine> = OnceLock::new();
    ENGINE.get_or_init(SignalEngine::builtin).classify(raw)
}
