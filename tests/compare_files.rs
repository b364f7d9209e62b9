//! End-to-end comparison scenarios over real WAV files.

use std::path::Path;
use std::time::Instant;

use rand::Rng;
use sonoprint::audio;
use sonoprint::fingerprint::{DEFAULT_MAX_PEAKS_PER_FRAME, MatchResult, extract_fingerprint};
use sonoprint::job::{self, JobEvent};

const SAMPLE_RATE: u32 = 44_100;

fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

fn write_samples(path: &Path, sample_rate: u32, samples: impl Iterator<Item = f32>) {
    let mut writer = hound::WavWriter::create(path, wav_spec(sample_rate)).unwrap();
    for sample in samples {
        writer
            .write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}

fn write_sine(path: &Path, freq_hz: f32, seconds: f32, sample_rate: u32) {
    let len = (seconds * sample_rate as f32) as usize;
    write_samples(
        path,
        sample_rate,
        (0..len).map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * freq_hz * t).sin() * 0.5
        }),
    );
}

fn write_noise(path: &Path, seconds: f32, sample_rate: u32) {
    let mut rng = rand::rng();
    let len = (seconds * sample_rate as f32) as usize;
    write_samples(
        path,
        sample_rate,
        (0..len).map(|_| rng.random_range(-0.5..0.5)),
    );
}

fn write_silence(path: &Path, seconds: f32, sample_rate: u32) {
    let len = (seconds * sample_rate as f32) as usize;
    write_samples(path, sample_rate, (0..len).map(|_| 0.0));
}

/// Drain a job to completion, asserting progress never decreases and ends
/// at 100 before the terminal event.
fn run_to_verdict(file1: &Path, file2: &Path) -> Result<MatchResult, String> {
    let handle = job::spawn_comparison(file1.to_path_buf(), file2.to_path_buf());
    let mut last_percent = 0u8;
    let mut saw_terminal_progress = false;
    let mut outcome = None;
    for event in handle.events().iter() {
        match event {
            JobEvent::Progress { percent, .. } => {
                assert!(
                    percent >= last_percent,
                    "progress went backwards: {last_percent} -> {percent}"
                );
                last_percent = percent;
                saw_terminal_progress = percent == 100;
            }
            JobEvent::Finished(verdict) => {
                assert!(saw_terminal_progress, "verdict arrived before 100%");
                outcome = Some(Ok(verdict));
            }
            JobEvent::Failed(message) => outcome = Some(Err(message)),
        }
    }
    handle.join();
    outcome.expect("job ended without a terminal event")
}

#[test]
fn identical_sine_files_are_similar() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("tone_a.wav");
    let second = dir.path().join("tone_b.wav");
    write_sine(&first, 440.0, 2.0, SAMPLE_RATE);
    write_sine(&second, 440.0, 2.0, SAMPLE_RATE);

    let verdict = run_to_verdict(&first, &second).expect("comparison succeeds");
    assert_eq!(verdict, MatchResult::Similarity);
}

#[test]
fn noise_against_sine_is_not_similar() {
    let dir = tempfile::tempdir().unwrap();
    let noise = dir.path().join("noise.wav");
    let tone = dir.path().join("tone.wav");
    write_noise(&noise, 2.0, SAMPLE_RATE);
    write_sine(&tone, 440.0, 2.0, SAMPLE_RATE);

    let verdict = run_to_verdict(&noise, &tone).expect("comparison succeeds");
    assert_eq!(verdict, MatchResult::NoSimilarity);
}

#[test]
fn silence_against_sine_is_not_similar() {
    let dir = tempfile::tempdir().unwrap();
    let quiet = dir.path().join("silence.wav");
    let tone = dir.path().join("tone.wav");
    write_silence(&quiet, 1.0, SAMPLE_RATE);
    write_sine(&tone, 440.0, 1.0, SAMPLE_RATE);

    let verdict = run_to_verdict(&quiet, &tone).expect("comparison succeeds");
    assert_eq!(verdict, MatchResult::NoSimilarity);
}

#[test]
fn mismatched_sample_rates_resample_and_complete() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("tone_44k.wav");
    let second = dir.path().join("tone_22k.wav");
    write_sine(&first, 440.0, 1.0, SAMPLE_RATE);
    write_sine(&second, 440.0, 1.0, 22_050);

    // Rate alignment is internal; the job must reach a verdict either way.
    run_to_verdict(&first, &second).expect("comparison succeeds");
}

/// The full job on two large files must beat back-to-back extraction of
/// the same signals, confirming the two extraction workers overlap.
/// Ignored by default: wall-clock comparisons are machine-sensitive and
/// the fixtures are minute-long; run via `cargo test -- --ignored`.
#[test]
#[ignore = "wall-clock timing; run on an otherwise idle machine"]
fn parallel_extraction_beats_sequential_on_large_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("long_a.wav");
    let second = dir.path().join("long_b.wav");
    write_sine(&first, 440.0, 60.0, 22_050);
    write_sine(&second, 440.0, 60.0, 22_050);

    let signal1 = audio::decode_mono(&first).unwrap();
    let signal2 = audio::decode_mono(&second).unwrap();
    let sequential_start = Instant::now();
    let fp1 = extract_fingerprint(signal1, DEFAULT_MAX_PEAKS_PER_FRAME);
    let fp2 = extract_fingerprint(signal2, DEFAULT_MAX_PEAKS_PER_FRAME);
    let sequential = sequential_start.elapsed();
    assert!(!fp1.is_empty() && !fp2.is_empty());

    let job_start = Instant::now();
    let verdict = run_to_verdict(&first, &second).expect("comparison succeeds");
    let job_elapsed = job_start.elapsed();
    assert_eq!(verdict, MatchResult::Similarity);
    assert!(
        job_elapsed < sequential,
        "job took {job_elapsed:?}, sequential extraction took {sequential:?}"
    );
}

#[test]
fn unreadable_input_fails_with_decoder_message() {
    let dir = tempfile::tempdir().unwrap();
    let tone = dir.path().join("tone.wav");
    let bogus = dir.path().join("bogus.wav");
    write_sine(&tone, 440.0, 0.5, SAMPLE_RATE);
    std::fs::write(&bogus, b"not a wav file").unwrap();

    let err = run_to_verdict(&tone, &bogus).expect_err("comparison fails");
    assert!(err.contains("bogus.wav"), "unexpected message: {err}");
}
