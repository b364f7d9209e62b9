use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Fingerprint, FingerprintEntry};

/// Frequency-bin tolerance for entry matching.
pub const FREQ_TOLERANCE_BINS: usize = 5;
/// Time-delta tolerance for entry matching, in seconds.
pub const TIME_TOLERANCE_SECONDS: f32 = 0.005;
/// Match percentage at or above which two fingerprints count as similar.
///
/// Deliberately strict; near-exact fingerprint overlap is required. The
/// accept/reject boundary sits exactly here, so the constant must not be
/// rounded or loosened.
pub const SIMILARITY_THRESHOLD_PERCENT: f64 = 99.99;

/// Verdict of a fingerprint comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// The fingerprints overlap at or above the similarity threshold.
    Similarity,
    /// The fingerprints do not overlap sufficiently.
    NoSimilarity,
}

impl MatchResult {
    /// Canonical display string for the verdict.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchResult::Similarity => "similarity",
            MatchResult::NoSimilarity => "no similarity",
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare two fingerprints with tolerance-based matching.
///
/// Every `fp1` entry scans `fp2` and counts as matched when some `fp2`
/// entry lies within all three tolerances (first match wins). The verdict
/// is `similarity` when `matches / min(len1, len2) * 100` reaches
/// [`SIMILARITY_THRESHOLD_PERCENT`].
///
/// Not symmetric: both `min_len` and the scan order reference the argument
/// order. Callers must preserve their file order.
pub fn compare(fp1: &Fingerprint, fp2: &Fingerprint) -> MatchResult {
    if fp1.is_empty() || fp2.is_empty() {
        return MatchResult::NoSimilarity;
    }
    let mut matches = 0usize;
    for entry in &fp1.entries {
        if fp2.entries.iter().any(|other| entries_match(entry, other)) {
            matches += 1;
        }
    }
    let min_len = fp1.len().min(fp2.len());
    let percent = matches as f64 / min_len as f64 * 100.0;
    if percent >= SIMILARITY_THRESHOLD_PERCENT {
        MatchResult::Similarity
    } else {
        MatchResult::NoSimilarity
    }
}

fn entries_match(a: &FingerprintEntry, b: &FingerprintEntry) -> bool {
    a.freq1.abs_diff(b.freq1) <= FREQ_TOLERANCE_BINS
        && a.freq2.abs_diff(b.freq2) <= FREQ_TOLERANCE_BINS
        && (a.time_delta - b.time_delta).abs() <= TIME_TOLERANCE_SECONDS
}
