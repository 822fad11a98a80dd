use crate::catalog::CatalogEntry;
use crate::core::Detection;
use crate::signals::rules;

/// Score one catalog entry against a detection. Zero means excluded.
pub fn score(entry: &CatalogEntry, detection: &Detection) -> i64 {
    if !rules::region_gate(entry, detection) || !rules::frequency_gate(entry, detection) {
        return 0;
    }

    let total = i64::from(entry.base_score)
        + rules::modulation_bonus(entry, detection)
        + rules::bandwidth_adjustment(entry, detection)
        + rules::burst_bonus(entry, detection);

    total.max(0)
}
