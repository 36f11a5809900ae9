//! Candidate identity keys.
//!
//! Two submitted cities are the same candidate when their lowercased name
//! and lowercased region match. The key format is
//! `lowercase(name) + "|" + lowercase(region or "")` and is the only
//! identity used by deduplication, the elimination log, and the spin log.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identity key of a candidate destination.
///
/// Construct via [`CandidateKey::new`] so the normalization (trim +
/// lowercase, empty region folded to the empty string) is applied in
/// exactly one place.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct CandidateKey(String);

impl CandidateKey {
    /// Build the identity key for a candidate name and optional region.
    pub fn new(name: &str, region: Option<&str>) -> Self {
        let name = name.trim().to_lowercase();
        let region = region.unwrap_or("").trim().to_lowercase();
        Self(format!("{name}|{region}"))
    }

    /// Wrap an already-normalized key string (e.g. read back from storage).
    pub const fn from_raw(raw: String) -> Self {
        Self(raw)
    }

    /// Return the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for CandidateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
