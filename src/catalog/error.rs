/// Everything that can go wrong while provisioning a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog source: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render catalog for fingerprinting: {0}")]
    Render(#[from] serde_json::Error),

    #[error("catalog entry #{index} has an empty label")]
    EmptyLabel { index: usize },

    #[error("duplicate catalog label \"{label}\"")]
    DuplicateLabel { label: String },

    #[error("\"{label}\": {field} range [{min}, {max}] has min > max")]
    InvertedRange {
        label: String,
        field: &'static str,
        min: u64,
        max: u64,
    },

    #[error("\"{label}\": base_score must be positive")]
    ZeroBaseScore { label: String },

    #[error("\"{label}\": no frequency ranges")]
    NoFrequencyRanges { label: String },

    #[error("\"{label}\": no regions")]
    NoRegions { label: String },
}
