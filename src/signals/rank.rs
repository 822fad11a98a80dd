use std::cmp::Reverse;

use crate::catalog::{Catalog, CatalogEntry};
use crate::core::Detection;
use crate::signals::score::score;

/// Maximum number of runners-up reported after the primary.
pub const MAX_ALTERNATIVES: usize = 3;

/// A catalog entry that survived scoring. Scores stay internal to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub entry: &'a CatalogEntry,
    pub score: i64,
}

impl Candidate<'_> {
    pub fn label(&self) -> &str {
        &self.entry.label
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Ranking<'a> {
    Unknown,
    Matched {
        primary: Candidate<'a>,
        alternates: Vec<Candidate<'a>>,
    },
}

/// Every entry with a positive score, best first. Equal scores keep catalog
/// order (`sort_by_key` is stable).
pub fn scored_candidates<'a>(catalog: &'a Catalog, detection: &Detection) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = catalog
        .iter()
        .map(|entry| Candidate {
            entry,
            score: score(entry, detection),
        })
        .filter(|c| c.score > 0)
        .collect();
    candidates.sort_by_key(|c| Reverse(c.score));
    candidates
}

pub fn rank<'a>(catalog: &'a Catalog, detection: &Detection) -> Ranking<'a> {
    let mut ranked = scored_candidates(catalog, detection).into_iter();
    let Some(primary) = ranked.next() else {
        return Ranking::Unknown;
    };
    Ranking::Matched {
        primary,
        alternates: ranked.take(MAX_ALTERNATIVES).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HzRange;

    fn make_entry(label: &str, base_score: u32) -> CatalogEntry {
        CatalogEntry {
            label: label.to_string(),
            tags: vec![],
            description: format!("{label} transmitter"),
            frequency_ranges: vec![HzRange::new(100, 200)],
            modulation_hints: vec![],
            bandwidth_range: None,
            base_score,
            is_burst_type: false,
            regions: vec!["GLOBAL".to_string()],
        }
    }

    fn detection(frequency_hz: f64) -> Detection {
        Detection {
            frequency_hz,
            modulation: None,
            bandwidth_hz: None,
            duration_ms: None,
            repetition_count: None,
            rssi_dbm: None,
            region: "UK/EU".to_string(),
        }
    }

    fn labels(candidates: &[Candidate<'_>]) -> Vec<String> {
        candidates.iter().map(|c| c.label().to_string()).collect()
    }

    #[test]
    fn no_match_is_unknown() {
        let catalog = Catalog::from_entries(vec![make_entry("a", 10)]).unwrap();
        assert_eq!(rank(&catalog, &detection(500.0)), Ranking::Unknown);
    }

    #[test]
    fn sorted_descending() {
        let catalog = Catalog::from_entries(vec![
            make_entry("low", 5),
            make_entry("high", 20),
            make_entry("mid", 10),
        ])
        .unwrap();
        let ranked = scored_candidates(&catalog, &detection(150.0));
        assert_eq!(labels(&ranked), vec!["high", "mid", "low"]);
    }

    #[test]
    fn ties_keep_definition_order() {
        let catalog = Catalog::from_entries(vec![
            make_entry("first", 10),
            make_entry("better", 12),
            make_entry("second", 10),
            make_entry("third", 10),
        ])
        .unwrap();
        let ranked = scored_candidates(&catalog, &detection(150.0));
        assert_eq!(labels(&ranked), vec!["better", "first", "second", "third"]);
    }

    #[test]
    fn alternates_capped_at_three() {
        let catalog = Catalog::from_entries(
            (0..6).map(|i| make_entry(&format!("e{i}"), 10 + i)).collect(),
        )
        .unwrap();
        let Ranking::Matched { primary, alternates } = rank(&catalog, &detection(150.0)) else {
            panic!("expected a match");
        };
        assert_eq!(primary.label(), "e5");
        assert_eq!(primary.score, 15);
        assert_eq!(labels(&alternates), vec!["e4", "e3", "e2"]);
    }

    #[test]
    fn single_match_has_no_alternates() {
        let mut other = make_entry("elsewhere", 10);
        other.frequency_ranges = vec![HzRange::new(1_000, 2_000)];
        let catalog = Catalog::from_entries(vec![make_entry("here", 10), other]).unwrap();
        let Ranking::Matched { primary, alternates } = rank(&catalog, &detection(150.0)) else {
            panic!("expected a match");
        };
        assert_eq!(primary.label(), "here");
        assert!(alternates.is_empty());
    }
}
