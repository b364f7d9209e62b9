//! Offline audio fingerprint extraction and similarity checking.
//!
//! Two audio files are decoded to mono PCM, reduced to spectral-peak
//! fingerprints, and compared with tolerance-based matching. The comparison
//! runs as a background job that reports staged progress over a typed event
//! channel.

/// Application directory helpers for config and log files.
pub mod app_dirs;
/// Audio decoding and resampling.
pub mod audio;
/// Fingerprint extraction and similarity comparison.
pub mod fingerprint;
/// Background comparison job orchestration.
pub mod job;
/// Logging setup.
pub mod logging;
