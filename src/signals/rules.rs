use crate::catalog::CatalogEntry;
use crate::core::Detection;

pub const MODULATION_BONUS: i64 = 5;
pub const BANDWIDTH_FIT_BONUS: i64 = 4;
pub const BANDWIDTH_MISFIT_PENALTY: i64 = -3;
pub const SHORT_BURST_BONUS: i64 = 3;
pub const REPETITION_BONUS: i64 = 2;

/// Durations strictly below this count as a short burst.
pub const SHORT_BURST_MAX_MS: f64 = 1000.0;

/// Sightings needed before a burst-type entry earns the repetition bonus.
pub const REPETITION_MIN_SCORED: i64 = 2;

// --- Gates ---

/// The detection's region is listed, or the entry is GLOBAL.
pub fn region_gate(entry: &CatalogEntry, detection: &Detection) -> bool {
    entry.applies_to_region(&detection.region)
}

/// The frequency falls in at least one closed range of the entry.
pub fn frequency_gate(entry: &CatalogEntry, detection: &Detection) -> bool {
    entry.covers_frequency(detection.frequency_hz)
}

// --- Adjustments ---

/// +5 once if any hint and the modulation contain one another, ignoring case.
pub fn modulation_bonus(entry: &CatalogEntry, detection: &Detection) -> i64 {
    let Some(modulation) = detection.modulation.as_deref() else {
        return 0;
    };
    let modulation = modulation.to_uppercase();
    let matched = entry.modulation_hints.iter().any(|hint| {
        let hint = hint.to_uppercase();
        modulation.contains(&hint) || hint.contains(&modulation)
    });
    if matched { MODULATION_BONUS } else { 0 }
}

/// +4 inside the entry's bandwidth range, -3 below half its minimum or above
/// twice its maximum, nothing in between.
pub fn bandwidth_adjustment(entry: &CatalogEntry, detection: &Detection) -> i64 {
    let (Some(bandwidth), Some(range)) = (detection.bandwidth_hz, entry.bandwidth_range) else {
        return 0;
    };
    if range.contains(bandwidth) {
        BANDWIDTH_FIT_BONUS
    } else if bandwidth < range.min_hz as f64 * 0.5 || bandwidth > range.max_hz as f64 * 2.0 {
        BANDWIDTH_MISFIT_PENALTY
    } else {
        0
    }
}

/// Short-burst and repetition bonuses, burst-type entries only.
pub fn burst_bonus(entry: &CatalogEntry, detection: &Detection) -> i64 {
    if !entry.is_burst_type {
        return 0;
    }
    let mut bonus = 0;
    if detection.duration_ms.is_some_and(|d| d < SHORT_BURST_MAX_MS) {
        bonus += SHORT_BURST_BONUS;
    }
    if detection
        .repetition_count
        .is_some_and(|n| n >= REPETITION_MIN_SCORED)
    {
        bonus += REPETITION_BONUS;
    }
    bonus
}
