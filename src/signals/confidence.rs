use crate::core::Confidence;

/// Minimum primary score for HIGH.
pub const HIGH_MIN_SCORE: i64 = 18;
/// Minimum lead over the runner-up for HIGH.
pub const HIGH_MIN_MARGIN: i64 = 5;
pub const MEDIUM_MIN_SCORE: i64 = 14;
pub const MEDIUM_MIN_MARGIN: i64 = 3;
/// Second MEDIUM band: lower score, tighter margin.
pub const WEAK_MEDIUM_MIN_SCORE: i64 = 12;
pub const WEAK_MEDIUM_MIN_MARGIN: i64 = 2;

const CLOSE_RATIO: f64 = 0.9;
const NEAR_RATIO: f64 = 0.7;

/// Confidence in the primary identification.
///
/// A lone candidate is judged on score alone, except that HIGH additionally
/// requires modulation or bandwidth evidence. With competitors the lead over
/// the runner-up (`second_score`) matters as well.
pub fn primary_confidence(
    primary_score: i64,
    second_score: Option<i64>,
    has_shape_evidence: bool,
) -> Confidence {
    match second_score {
        None => {
            if primary_score >= HIGH_MIN_SCORE && has_shape_evidence {
                Confidence::High
            } else if primary_score >= MEDIUM_MIN_SCORE {
                Confidence::Medium
            } else {
                Confidence::Low
            }
        }
        Some(second) => {
            let margin = primary_score - second;
            if primary_score >= HIGH_MIN_SCORE && margin >= HIGH_MIN_MARGIN {
                Confidence::High
            } else if (primary_score >= MEDIUM_MIN_SCORE && margin >= MEDIUM_MIN_MARGIN)
                || (primary_score >= WEAK_MEDIUM_MIN_SCORE && margin >= WEAK_MEDIUM_MIN_MARGIN)
            {
                Confidence::Medium
            } else {
                Confidence::Low
            }
        }
    }
}

/// Confidence for a runner-up, derived from its score relative to the
/// primary. Never exceeds MEDIUM.
pub fn alternative_confidence(alt_score: i64, primary_score: i64, primary: Confidence) -> Confidence {
    let ratio = if primary_score > 0 {
        alt_score as f64 / primary_score as f64
    } else {
        0.0
    };

    if ratio >= CLOSE_RATIO {
        match primary {
            Confidence::High => Confidence::Medium,
            other => other,
        }
    } else if ratio >= NEAR_RATIO {
        match primary {
            Confidence::High => Confidence::Medium,
            _ => Confidence::Low,
        }
    } else {
        Confidence::Low
    }
}
