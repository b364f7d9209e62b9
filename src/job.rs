//! Background comparison job orchestration.
//!
//! A job moves through preparing, extracting, comparing and finished
//! states, reporting milestone progress over a typed event channel. Decode
//! and extraction run off the caller's thread; the two fingerprint
//! extractions run on parallel workers and are joined before comparison.

use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{Receiver, Sender, channel},
};
use std::thread::JoinHandle;
use std::time::Instant;

use crate::audio::{self, AudioDecodeError, AudioSignal};
use crate::fingerprint::{self, DEFAULT_MAX_PEAKS_PER_FRAME, MatchResult};

/// Event emitted by a running comparison job.
///
/// Progress percentages never decrease; a job ends with exactly one
/// `Finished` or `Failed` event (or none at all when cancelled early).
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    /// Milestone progress update.
    Progress {
        /// Completion percentage, 0 to 100.
        percent: u8,
        /// Human-readable stage description.
        status: String,
        /// Human-readable time-remaining phrase.
        eta: String,
    },
    /// Terminal verdict.
    Finished(MatchResult),
    /// Terminal failure message.
    Failed(String),
}

/// Errors surfaced as a terminal [`JobEvent::Failed`].
#[derive(Debug, thiserror::Error)]
enum CompareJobError {
    /// An input file could not be decoded.
    #[error(transparent)]
    Decode(#[from] AudioDecodeError),
    /// A fingerprint extraction worker died.
    #[error("Fingerprint extraction failed for {0}")]
    Extraction(String),
}

/// Handle to a spawned comparison job.
pub struct ComparisonHandle {
    events: Receiver<JobEvent>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ComparisonHandle {
    /// Receiver for the job's event stream.
    ///
    /// The channel closes once the job thread exits.
    pub fn events(&self) -> &Receiver<JobEvent> {
        &self.events
    }

    /// Request cancellation.
    ///
    /// Best-effort: the job stops emitting events at the next stage
    /// boundary, but a mid-flight extraction runs to completion.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Wait for the job thread to exit.
    pub fn join(mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for ComparisonHandle {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Spawn a comparison of two audio files on a background thread.
///
/// Both files are decoded, the second is resampled to the first's rate on
/// mismatch, fingerprints are extracted in parallel with a per-frame peak
/// cap of [`DEFAULT_MAX_PEAKS_PER_FRAME`], and the verdict arrives as a
/// terminal [`JobEvent::Finished`]. Any decode or extraction failure is
/// caught and surfaced as a single [`JobEvent::Failed`].
pub fn spawn_comparison(file1: PathBuf, file2: PathBuf) -> ComparisonHandle {
    let (tx, events) = channel();
    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_flag = Arc::clone(&cancel);
    let worker = std::thread::spawn(move || {
        if let Err(err) = run_comparison(&file1, &file2, &tx, &cancel_flag) {
            tracing::warn!(
                "Comparison of {} vs {} failed: {err}",
                file1.display(),
                file2.display()
            );
            let _ = tx.send(JobEvent::Failed(err.to_string()));
        }
    });
    ComparisonHandle {
        events,
        cancel,
        worker: Some(worker),
    }
}

fn run_comparison(
    file1: &PathBuf,
    file2: &PathBuf,
    tx: &Sender<JobEvent>,
    cancel: &AtomicBool,
) -> Result<(), CompareJobError> {
    let started = Instant::now();
    if !emit_progress(tx, cancel, started, 0, "Preparing comparison") {
        return Ok(());
    }

    let signal1 = decode_input(file1)?;
    let signal2 = align_rate(decode_input(file2)?, signal1.sample_rate);
    if !emit_progress(tx, cancel, started, 20, "Decoded input files") {
        return Ok(());
    }

    if !emit_progress(tx, cancel, started, 40, "Extracting fingerprints") {
        return Ok(());
    }
    let extractor1 = spawn_extractor(signal1);
    let extractor2 = spawn_extractor(signal2);
    let fingerprint1 = extractor1
        .join()
        .map_err(|_| CompareJobError::Extraction(file1.display().to_string()))?;
    let fingerprint2 = extractor2
        .join()
        .map_err(|_| CompareJobError::Extraction(file2.display().to_string()))?;
    tracing::info!(
        "Extracted fingerprints: {} and {} entries",
        fingerprint1.len(),
        fingerprint2.len()
    );
    if !emit_progress(tx, cancel, started, 60, "Extracted fingerprints") {
        return Ok(());
    }

    let verdict = fingerprint::compare(&fingerprint1, &fingerprint2);
    if !emit_progress(tx, cancel, started, 80, "Compared fingerprints") {
        return Ok(());
    }

    if !emit_progress(tx, cancel, started, 100, "Comparison complete") {
        return Ok(());
    }
    tracing::info!("Comparison verdict: {verdict}");
    let _ = tx.send(JobEvent::Finished(verdict));
    Ok(())
}

fn decode_input(path: &PathBuf) -> Result<AudioSignal, CompareJobError> {
    Ok(audio::decode_mono(path)?)
}

fn align_rate(signal: AudioSignal, target_rate: u32) -> AudioSignal {
    if signal.sample_rate == target_rate {
        return signal;
    }
    tracing::info!(
        "Resampling second input from {} Hz to {} Hz",
        signal.sample_rate,
        target_rate
    );
    AudioSignal {
        samples: audio::resample_linear(&signal.samples, signal.sample_rate, target_rate),
        sample_rate: target_rate,
    }
}

fn spawn_extractor(signal: AudioSignal) -> JoinHandle<fingerprint::Fingerprint> {
    std::thread::spawn(move || {
        fingerprint::extract_fingerprint(signal, DEFAULT_MAX_PEAKS_PER_FRAME)
    })
}

/// Send one milestone event; returns false when the job was cancelled.
fn emit_progress(
    tx: &Sender<JobEvent>,
    cancel: &AtomicBool,
    started: Instant,
    percent: u8,
    status: &str,
) -> bool {
    if cancel.load(Ordering::Relaxed) {
        tracing::info!("Comparison cancelled at {percent}%");
        return false;
    }
    let event = JobEvent::Progress {
        percent,
        status: status.to_string(),
        eta: eta_phrase(started, percent),
    };
    tx.send(event).is_ok()
}

fn eta_phrase(started: Instant, percent: u8) -> String {
    if percent == 0 {
        return "estimating".to_string();
    }
    if percent >= 100 {
        return "done".to_string();
    }
    let elapsed = started.elapsed().as_secs_f64();
    let remaining = elapsed * (100 - percent) as f64 / percent as f64;
    format!("about {}s remaining", remaining.ceil().max(1.0) as u64)
}
