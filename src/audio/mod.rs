//! Audio decoding and resampling for fingerprint comparison.

mod decode;
mod resample;

pub use decode::{AudioDecodeError, decode_mono};
pub use resample::resample_linear;

/// Decoded mono audio ready for fingerprint extraction.
#[derive(Debug, Clone)]
pub struct AudioSignal {
    /// Mono PCM samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Sample rate in Hz, always at least 1.
    pub sample_rate: u32,
}

impl AudioSignal {
    /// Signal duration in seconds.
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
