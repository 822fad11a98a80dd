pub mod error;

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use error::CatalogError;

/// Region code that matches any detection region.
pub const GLOBAL_REGION: &str = "GLOBAL";

const BUILTIN_CATALOG: &str = include_str!("builtin.toml");

/// Closed interval in Hz, written `[min, max]` in catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u64; 2]", into = "[u64; 2]")]
pub struct HzRange {
    pub min_hz: u64,
    pub max_hz: u64,
}

impl HzRange {
    pub const fn new(min_hz: u64, max_hz: u64) -> Self {
        Self { min_hz, max_hz }
    }

    /// Inclusive at both ends. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        self.min_hz as f64 <= value && value <= self.max_hz as f64
    }
}

impl From<[u64; 2]> for HzRange {
    fn from([min_hz, max_hz]: [u64; 2]) -> Self {
        Self { min_hz, max_hz }
    }
}

impl From<HzRange> for [u64; 2] {
    fn from(range: HzRange) -> Self {
        [range.min_hz, range.max_hz]
    }
}

/// One signal-type definition. Entries are only ever read once a
/// [`Catalog`] has validated them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    pub label: String,
    pub tags: Vec<String>,
    pub description: String,
    pub frequency_ranges: Vec<HzRange>,
    #[serde(default)]
    pub modulation_hints: Vec<String>,
    #[serde(default)]
    pub bandwidth_range: Option<HzRange>,
    pub base_score: u32,
    #[serde(default)]
    pub is_burst_type: bool,
    pub regions: Vec<String>,
}

impl CatalogEntry {
    pub fn applies_to_region(&self, region: &str) -> bool {
        self.regions
            .iter()
            .any(|r| r == region || r == GLOBAL_REGION)
    }

    pub fn covers_frequency(&self, frequency_hz: f64) -> bool {
        self.frequency_ranges.iter().any(|r| r.contains(frequency_hz))
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    signal: Vec<CatalogEntry>,
}

/// Immutable, validated table of signal types in definition order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    fingerprint: String,
}

impl Catalog {
    /// Validate entries and freeze them into a catalog.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        validate(&entries)?;
        let fingerprint = compute_fingerprint(&entries)?;
        tracing::debug!("Catalog validated: {} entries", entries.len());
        Ok(Self {
            entries,
            fingerprint,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(contents)?;
        Self::from_entries(file.signal)
    }

    /// Load an operator-supplied catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::info!(
            "Catalog loaded from {}: {} signal types (fingerprint {})",
            path.display(),
            catalog.len(),
            catalog.fingerprint()
        );
        Ok(catalog)
    }

    /// The reference catalog shipped with the crate, parsed once per process.
    pub fn builtin() -> Arc<Catalog> {
        static BUILTIN: OnceLock<Arc<Catalog>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| {
                let catalog = Catalog::from_toml_str(BUILTIN_CATALOG)
                    .expect("embedded catalog must validate");
                tracing::info!(
                    "Built-in catalog ready: {} signal types (fingerprint {})",
                    catalog.len(),
                    catalog.fingerprint()
                );
                Arc::new(catalog)
            })
            .clone()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// SHA-256 over the canonical JSON rendering of the entries. Two
    /// deployments hold structurally identical data iff these match.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Pretty JSON export, for provisioning a mirror of the engine.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn validate(entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if entry.label.trim().is_empty() {
            return Err(CatalogError::EmptyLabel { index });
        }
        if !seen.insert(entry.label.as_str()) {
            return Err(CatalogError::DuplicateLabel {
                label: entry.label.clone(),
            });
        }
        if entry.base_score == 0 {
            return Err(CatalogError::ZeroBaseScore {
                label: entry.label.clone(),
            });
        }
        if entry.frequency_ranges.is_empty() {
            return Err(CatalogError::NoFrequencyRanges {
                label: entry.label.clone(),
            });
        }
        let ranges = entry
            .frequency_ranges
            .iter()
            .map(|r| ("frequency", r))
            .chain(entry.bandwidth_range.iter().map(|r| ("bandwidth", r)));
        for (field, range) in ranges {
            if range.min_hz > range.max_hz {
                return Err(CatalogError::InvertedRange {
                    label: entry.label.clone(),
                    field,
                    min: range.min_hz,
                    max: range.max_hz,
                });
            }
        }
        if entry.regions.is_empty() {
            return Err(CatalogError::NoRegions {
                label: entry.label.clone(),
            });
        }
    }
    Ok(())
}

fn compute_fingerprint(entries: &[CatalogEntry]) -> Result<String, CatalogError> {
    let canonical = serde_json::to_vec(entries)?;
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str) -> CatalogEntry {
        CatalogEntry {
            label: label.to_string(),
            tags: vec!["test".to_string()],
            description: "Test transmitter".to_string(),
            frequency_ranges: vec![HzRange::new(100_000_000, 200_000_000)],
            modulation_hints: vec!["FM".to_string()],
            bandwidth_range: None,
            base_score: 10,
            is_burst_type: false,
            regions: vec![GLOBAL_REGION.to_string()],
        }
    }

    #[test]
    fn builtin_catalog_validates() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 21);
        assert_eq!(catalog.entries()[0].label, "FM Broadcast Radio");
        assert_eq!(catalog.entries()[20].label, "Remote Control / Key Fob");
    }

    #[test]
    fn builtin_catalog_is_shared() {
        let a = Catalog::builtin();
        let b = Catalog::builtin();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn builtin_entry_fields() {
        let catalog = Catalog::builtin();
        let adsb = catalog.get("ADS-B Aircraft Tracking").unwrap();
        assert_eq!(adsb.base_score, 15);
        assert!(adsb.is_burst_type);
        assert_eq!(adsb.frequency_ranges, vec![HzRange::new(1_090_000_000, 1_090_000_000)]);
        assert_eq!(adsb.regions, vec!["GLOBAL".to_string()]);

        let fm = catalog.get("FM Broadcast Radio").unwrap();
        assert!(!fm.is_burst_type);
        assert_eq!(fm.bandwidth_range, Some(HzRange::new(150_000, 250_000)));
    }

    #[test]
    fn range_contains_is_inclusive() {
        let range = HzRange::new(1_090_000_000, 1_090_000_000);
        assert!(range.contains(1_090_000_000.0));
        assert!(!range.contains(1_089_999_999.0));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn global_region_matches_anything() {
        let e = entry("a");
        assert!(e.applies_to_region("US"));
        assert!(e.applies_to_region("Mars"));

        let mut eu = entry("b");
        eu.regions = vec!["UK/EU".to_string()];
        assert!(eu.applies_to_region("UK/EU"));
        assert!(!eu.applies_to_region("US"));
        assert!(!eu.applies_to_region("GLOBAL"));
    }

    #[test]
    fn rejects_duplicate_label() {
        let err = Catalog::from_entries(vec![entry("same"), entry("same")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateLabel { ref label } if label == "same"));
    }

    #[test]
    fn rejects_inverted_frequency_range() {
        let mut e = entry("bad");
        e.frequency_ranges = vec![HzRange::new(200, 100)];
        let err = Catalog::from_entries(vec![e]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvertedRange { field: "frequency", min: 200, max: 100, .. }
        ));
    }

    #[test]
    fn rejects_inverted_bandwidth_range() {
        let mut e = entry("bad");
        e.bandwidth_range = Some(HzRange::new(50_000, 10_000));
        let err = Catalog::from_entries(vec![e]).unwrap_err();
        assert!(matches!(err, CatalogError::InvertedRange { field: "bandwidth", .. }));
    }

    #[test]
    fn rejects_zero_base_score() {
        let mut e = entry("zero");
        e.base_score = 0;
        assert!(matches!(
            Catalog::from_entries(vec![e]).unwrap_err(),
            CatalogError::ZeroBaseScore { .. }
        ));
    }

    #[test]
    fn rejects_missing_ranges_and_regions() {
        let mut e = entry("no-ranges");
        e.frequency_ranges.clear();
        assert!(matches!(
            Catalog::from_entries(vec![e]).unwrap_err(),
            CatalogError::NoFrequencyRanges { .. }
        ));

        let mut e = entry("no-regions");
        e.regions.clear();
        assert!(matches!(
            Catalog::from_entries(vec![e]).unwrap_err(),
            CatalogError::NoRegions { .. }
        ));
    }

    #[test]
    fn rejects_empty_label() {
        let err = Catalog::from_entries(vec![entry("ok"), entry("  ")]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyLabel { index: 1 }));
    }

    #[test]
    fn toml_unknown_key_rejected() {
        let doc = r#"
            [[signal]]
            label = "X"
            tags = []
            description = "x"
            frequency_ranges = [[1, 2]]
            base_score = 1
            regions = ["GLOBAL"]
            priority = 3
        "#;
        assert!(matches!(
            Catalog::from_toml_str(doc).unwrap_err(),
            CatalogError::Parse(_)
        ));
    }

    #[test]
    fn toml_defaults_applied() {
        let doc = r#"
            [[signal]]
            label = "Beacon"
            tags = ["beacon"]
            description = "Test beacon"
            frequency_ranges = [[1_000, 2_000]]
            base_score = 7
            regions = ["US"]
        "#;
        let catalog = Catalog::from_toml_str(doc).unwrap();
        let beacon = catalog.get("Beacon").unwrap();
        assert!(beacon.modulation_hints.is_empty());
        assert!(beacon.bandwidth_range.is_none());
        assert!(!beacon.is_burst_type);
    }

    #[test]
    fn fingerprint_tracks_content_and_order() {
        let ab = Catalog::from_entries(vec![entry("a"), entry("b")]).unwrap();
        let ab_again = Catalog::from_entries(vec![entry("a"), entry("b")]).unwrap();
        let ba = Catalog::from_entries(vec![entry("b"), entry("a")]).unwrap();
        assert_eq!(ab.fingerprint(), ab_again.fingerprint());
        assert_ne!(ab.fingerprint(), ba.fingerprint());
        assert_eq!(ab.fingerprint().len(), 64);

        let mut tuned = entry("b");
        tuned.base_score = 11;
        let tuned = Catalog::from_entries(vec![entry("a"), tuned]).unwrap();
        assert_ne!(ab.fingerprint(), tuned.fingerprint());
    }

    #[test]
    fn json_export_reloads_identically() {
        let catalog = Catalog::builtin();
        let json = catalog.to_json().unwrap();
        let entries: Vec<CatalogEntry> = serde_json::from_str(&json).unwrap();
        let mirror = Catalog::from_entries(entries).unwrap();
        assert_eq!(mirror.fingerprint(), catalog.fingerprint());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Catalog::load("/nonexistent/rfguess/catalog.toml").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
