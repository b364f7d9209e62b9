//! Spectral-peak fingerprinting.
//!
//! An [`AudioSignal`] is reduced to an ordered sequence of adjacent-peak
//! pairs: the STFT is converted to decibels against the loudest bin of the
//! whole transform, salient bins are picked per frame, and consecutive
//! entries in the flattened peak list become fingerprint entries.

mod compare;
mod peaks;
mod stft;

pub use compare::{
    FREQ_TOLERANCE_BINS, MatchResult, SIMILARITY_THRESHOLD_PERCENT, TIME_TOLERANCE_SECONDS,
    compare,
};

use serde::{Deserialize, Serialize};

use crate::audio::AudioSignal;

/// STFT analysis window length in samples.
pub const N_FFT: usize = 2048;
/// Stride between successive analysis windows, in samples.
///
/// Much smaller than a typical default; trades compute time for temporal
/// resolution.
pub const HOP_LENGTH: usize = 51;
/// Per-frame peak cap used by the comparison job.
pub const DEFAULT_MAX_PEAKS_PER_FRAME: usize = 10;

/// One detected peak pair.
///
/// `time_delta` is `HOP_LENGTH / sample_rate` for every entry: the delta
/// reflects adjacency in the flattened peak list, not the frames the peaks
/// came from. Matching against reference fingerprints depends on this exact
/// formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FingerprintEntry {
    /// Frequency bin of the earlier peak.
    pub freq1: usize,
    /// Frequency bin of the later peak.
    pub freq2: usize,
    /// Nominal time between the two peaks, in seconds.
    pub time_delta: f32,
}

/// Ordered sequence of peak-pair entries for one audio signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Entries in peak-detection order.
    pub entries: Vec<FingerprintEntry>,
}

impl Fingerprint {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the fingerprint carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract a fingerprint from a decoded mono signal.
///
/// Frames yielding more than `max_peaks_per_frame` peaks are truncated to
/// the first peaks in bin order. Empty or silent input yields an empty
/// fingerprint.
pub fn extract_fingerprint(signal: AudioSignal, max_peaks_per_frame: usize) -> Fingerprint {
    let frames = stft::spectrogram_db(&signal.samples);
    let mut peaks = Vec::new();
    for frame in &frames {
        peaks.extend(peaks::pick_peaks(frame, max_peaks_per_frame));
    }
    let time_delta = HOP_LENGTH as f32 / signal.sample_rate.max(1) as f32;
    let entries = peaks
        .windows(2)
        .map(|pair| FingerprintEntry {
            freq1: pair[0],
            freq2: pair[1],
            time_delta,
        })
        .collect();
    Fingerprint { entries }
}
