use std::path::Path;

use hound::{SampleFormat, WavReader};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::{debug, info};

use crate::error::{EnvelopeError, Result};

/// Mono audio normalized to `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct Signal {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Signal {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }
}

/// Reads a WAV file, downmixes it to mono and resamples it to `target_rate`.
pub fn load_audio(path: impl AsRef<Path>, target_rate: u32) -> Result<Signal> {
    if target_rate == 0 {
        return Err(EnvelopeError::InvalidArgument(
            "sample rate must be positive".into(),
        ));
    }

    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    debug!("WAV spec for {}: {:?}", path.display(), spec);

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 8) => reader
            .samples::<i8>()
            .map(|s| s.map(|v| v as f32 / 128.0))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8_388_608.0))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Int, 32) => reader
            .samples::<i32>()
            .map(|s| s.map(|v| (v as f64 / 2_147_483_648.0) as f32))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (format, bits) => {
            return Err(EnvelopeError::UnsupportedFormat(format!(
                "{:?} with {} bits per sample",
                format, bits
            )));
        }
    };

    let mono = downmix(&interleaved, spec.channels as usize);
    let samples = resample(&mono, spec.sample_rate, target_rate)?;
    info!(
        "Loaded {} ({} ch @ {} Hz) -> {} mono samples @ {} Hz",
        path.display(),
        spec.channels,
        spec.sample_rate,
        samples.len(),
        target_rate
    );

    Ok(Signal {
        samples,
        sample_rate: target_rate,
    })
}

/// Averages interleaved frames into a single channel.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Band-limited sinc resampler. Output length is `ceil(len * to / from)`,
/// aligned so that output sample `j` sits at input time `j * from / to`.
pub fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || input.is_empty() {
        return Ok(input.to_vec());
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(EnvelopeError::InvalidArgument(
            "sample rate must be positive".into(),
        ));
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, input.len(), 1)
        .map_err(|e| EnvelopeError::Resample(e.to_string()))?;

    let out_len = (input.len() as u64 * to_rate as u64).div_ceil(from_rate as u64) as usize;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(delay + out_len);

    let mut channels = resampler
        .process(&[input], None)
        .map_err(|e| EnvelopeError::Resample(e.to_string()))?;
    output.append(&mut channels[0]);

    // flush the filter tail with silence
    let silence = vec![0.0f32; input.len()];
    while output.len() < delay + out_len {
        let mut channels = resampler
            .process(&[silence.as_slice()], None)
            .map_err(|e| EnvelopeError::Resample(e.to_string()))?;
        output.append(&mut channels[0]);
    }

    debug!(
        "Resampled {} -> {} samples ({} Hz -> {} Hz, delay {})",
        input.len(),
        out_len,
        from_rate,
        to_rate,
        delay
    );
    Ok(output[delay..delay + out_len].to_vec())
}
