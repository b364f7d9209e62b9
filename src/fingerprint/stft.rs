use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::PI;

use super::{HOP_LENGTH, N_FFT};

/// Floor applied to magnitudes before the decibel conversion.
const AMIN: f32 = 1e-10;

/// Compute a magnitude spectrogram in decibels.
///
/// Frames are [`N_FFT`] samples long, Hann-windowed and zero-padded at the
/// tail, advancing by [`HOP_LENGTH`]. Decibels are referenced to the largest
/// magnitude of the entire transform, so peak prominence is comparable
/// across frames. Each frame holds `N_FFT / 2 + 1` bins.
pub(super) fn spectrogram_db(samples: &[f32]) -> Vec<Vec<f32>> {
    if samples.is_empty() {
        return Vec::new();
    }
    let window = hann_window(N_FFT);
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(N_FFT);
    let bins = N_FFT / 2 + 1;

    let mut frames: Vec<Vec<f32>> = Vec::with_capacity(samples.len().div_ceil(HOP_LENGTH));
    let mut buffer = vec![Complex { re: 0.0_f32, im: 0.0 }; N_FFT];
    let mut start = 0usize;
    while start < samples.len() {
        for (i, cell) in buffer.iter_mut().enumerate() {
            let sample = samples.get(start + i).copied().unwrap_or(0.0);
            *cell = Complex {
                re: sanitize(sample) * window[i],
                im: 0.0,
            };
        }
        fft.process(&mut buffer);
        frames.push(
            buffer[..bins]
                .iter()
                .map(|c| (c.re * c.re + c.im * c.im).sqrt())
                .collect(),
        );
        start += HOP_LENGTH;
    }

    let mut global_max = 0.0_f32;
    for frame in &frames {
        for &magnitude in frame {
            if magnitude > global_max {
                global_max = magnitude;
            }
        }
    }
    let reference_db = 20.0 * global_max.max(AMIN).log10();
    for frame in &mut frames {
        for value in frame.iter_mut() {
            *value = 20.0 * value.max(AMIN).log10() - reference_db;
        }
    }
    frames
}

fn hann_window(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    let denom = (length - 1) as f32;
    (0..length)
        .map(|n| 0.5_f32 * (1.0 - (2.0 * PI * n as f32 / denom).cos()))
        .collect()
}

fn sanitize(sample: f32) -> f32 {
    if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
