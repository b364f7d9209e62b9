use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error, formats::FormatOptions,
    io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use thiserror::Error as ThisError;

use super::AudioSignal;

/// Errors raised while decoding an input file.
#[derive(Debug, ThisError)]
pub enum AudioDecodeError {
    /// The file could not be opened.
    #[error("Open {}: {source}", .path.display())]
    Open {
        /// Input file path.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },
    /// The container format could not be identified.
    #[error("Probe failed for {}: {source}", .path.display())]
    Probe {
        /// Input file path.
        path: PathBuf,
        /// Underlying probe error.
        source: Error,
    },
    /// The container carries no default audio track.
    #[error("No default track for {}", .path.display())]
    NoDefaultTrack {
        /// Input file path.
        path: PathBuf,
    },
    /// The track does not declare a sample rate.
    #[error("Missing sample rate for {}", .path.display())]
    MissingSampleRate {
        /// Input file path.
        path: PathBuf,
    },
    /// The track does not declare a channel count.
    #[error("Missing channel count for {}", .path.display())]
    MissingChannels {
        /// Input file path.
        path: PathBuf,
    },
    /// No decoder could be constructed for the track's codec.
    #[error("Decoder setup failed for {}: {source}", .path.display())]
    DecoderSetup {
        /// Input file path.
        path: PathBuf,
        /// Underlying codec error.
        source: Error,
    },
    /// Reading a packet from the container failed.
    #[error("Packet read failed for {}: {source}", .path.display())]
    PacketRead {
        /// Input file path.
        path: PathBuf,
        /// Underlying format error.
        source: Error,
    },
    /// Decoding a packet failed irrecoverably.
    #[error("Decode failed for {}: {source}", .path.display())]
    Decode {
        /// Input file path.
        path: PathBuf,
        /// Underlying decoder error.
        source: Error,
    },
    /// The stream decoded to zero samples.
    #[error("Decoded 0 samples for {}", .path.display())]
    EmptyStream {
        /// Input file path.
        path: PathBuf,
    },
}

/// Decode an audio file to a mono [`AudioSignal`] at its native sample rate.
///
/// Multi-channel input is averaged down to one channel. Non-finite samples
/// are replaced with silence and everything is clamped to `[-1.0, 1.0]`.
pub fn decode_mono(path: &Path) -> Result<AudioSignal, AudioDecodeError> {
    let (interleaved, sample_rate, channels) = decode_interleaved(path)?;
    Ok(AudioSignal {
        samples: downmix_to_mono(&interleaved, channels),
        sample_rate: sample_rate.max(1),
    })
}

fn decode_interleaved(path: &Path) -> Result<(Vec<f32>, u32, u16), AudioDecodeError> {
    let file = File::open(path).map_err(|source| AudioDecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| AudioDecodeError::Probe {
            path: path.to_path_buf(),
            source,
        })?;
    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| AudioDecodeError::NoDefaultTrack {
            path: path.to_path_buf(),
        })?;
    let codec_params = &track.codec_params;
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| AudioDecodeError::MissingSampleRate {
            path: path.to_path_buf(),
        })?;
    let channels = codec_params
        .channels
        .ok_or_else(|| AudioDecodeError::MissingChannels {
            path: path.to_path_buf(),
        })?
        .count() as u16;
    let mut decoder = symphonia::default::get_codecs()
        .make(codec_params, &DecoderOptions::default())
        .map_err(|source| AudioDecodeError::DecoderSetup {
            path: path.to_path_buf(),
            source,
        })?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(_)) => break,
            Err(source) => {
                return Err(AudioDecodeError::PacketRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(Error::DecodeError(_)) => continue,
            Err(source) => {
                return Err(AudioDecodeError::Decode {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let spec = *audio_buf.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    if samples.is_empty() {
        return Err(AudioDecodeError::EmptyStream {
            path: path.to_path_buf(),
        });
    }
    Ok((samples, sample_rate, channels))
}

fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return samples.iter().copied().map(sanitize_sample).collect();
    }
    let frames = samples.len() / channels;
    let mut mono = Vec::with_capacity(frames);
    for frame in 0..frames {
        let start = frame * channels;
        let sum: f32 = samples[start..start + channels]
            .iter()
            .copied()
            .map(sanitize_sample)
            .sum();
        mono.push(sum / channels as f32);
    }
    mono
}

fn sanitize_sample(sample: f32) -> f32 {
    if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
