//! Heuristic identification of detected radio transmissions.
//!
//! A detection (center frequency plus whatever else was measured) is scored
//! against an immutable catalog of signal types. The result names the most
//! plausible type, up to three alternatives, a LOW/MEDIUM/HIGH confidence and
//! a hedged explanation. Classification is pure and deterministic.
//!
//! ```
//! use rfguess::{Confidence, RawDetection};
//!
//! let guess = rfguess::classify(
//!     &RawDetection::at(137_100_000.0)
//!         .with_modulation("APT")
//!         .with_region("GLOBAL"),
//! );
//! assert_eq!(guess.primary_label, "Weather Satellite (NOAA)");
//! assert_eq!(guess.confidence, Confidence::High);
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod signals;

pub use crate::catalog::{Catalog, CatalogEntry, CatalogError, GLOBAL_REGION, HzRange};
pub use crate::config::Config;
pub use crate::core::{
    Alternative, Confidence, Detection, RawDetection, SignalGuess, UNKNOWN_LABEL,
};
pub use crate::signals::{DEFAULT_REGION, SignalEngine, classify};
