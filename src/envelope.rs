use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use tracing::{debug, warn};

use crate::error::{EnvelopeError, Result};

/// Reduction applied to every frame of the signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Aggregation {
    #[value(name = "MAX")]
    Max,
    #[value(name = "MIN")]
    Min,
    #[value(name = "MEAN")]
    Mean,
    #[value(name = "MEDIAN")]
    Median,
}

impl Aggregation {
    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Max => "MAX",
            Aggregation::Min => "MIN",
            Aggregation::Mean => "MEAN",
            Aggregation::Median => "MEDIAN",
        }
    }

    fn reduce(self, frame: &[f32], scratch: &mut Vec<f32>) -> f32 {
        match self {
            Aggregation::Max => frame.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            Aggregation::Min => frame.iter().copied().fold(f32::INFINITY, f32::min),
            Aggregation::Mean => {
                let sum: f64 = frame.iter().map(|&s| s as f64).sum();
                (sum / frame.len() as f64) as f32
            }
            Aggregation::Median => {
                scratch.clear();
                scratch.extend_from_slice(frame);
                scratch.sort_by(f32::total_cmp);
                let mid = scratch.len() / 2;
                if scratch.len() % 2 == 0 {
                    ((scratch[mid - 1] as f64 + scratch[mid] as f64) / 2.0) as f32
                } else {
                    scratch[mid]
                }
            }
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aggregation {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MAX" => Ok(Aggregation::Max),
            "MIN" => Ok(Aggregation::Min),
            "MEAN" => Ok(Aggregation::Mean),
            "MEDIAN" => Ok(Aggregation::Median),
            _ => Err(EnvelopeError::UnrecognizedPolicy(s.to_string())),
        }
    }
}

fn validate(signal: &[f32], frame_length: usize, hop_length: usize) -> Result<()> {
    if signal.is_empty() {
        return Err(EnvelopeError::InvalidArgument("signal is empty".into()));
    }
    if frame_length < 1 {
        return Err(EnvelopeError::InvalidArgument(
            "frame length must be at least 1".into(),
        ));
    }
    if hop_length < 1 {
        return Err(EnvelopeError::InvalidArgument(
            "hop length must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Number of frames produced for a signal of `len` samples.
pub fn frame_count(len: usize, hop_length: usize) -> usize {
    len.div_ceil(hop_length)
}

/// Reduces each frame `signal[i..i + frame_length]` (clipped at the end of the
/// signal, never padded) to a single value, for `i` stepping by `hop_length`.
///
/// The result has `ceil(signal.len() / hop_length)` entries regardless of the
/// frame length.
pub fn compute_envelope(
    signal: &[f32],
    frame_length: usize,
    hop_length: usize,
    policy: Aggregation,
) -> Result<Vec<f32>> {
    validate(signal, frame_length, hop_length)?;

    let mut envelope = Vec::with_capacity(frame_count(signal.len(), hop_length));
    let mut scratch = Vec::new();
    for start in (0..signal.len()).step_by(hop_length) {
        let end = start.saturating_add(frame_length).min(signal.len());
        envelope.push(policy.reduce(&signal[start..end], &mut scratch));
    }

    debug!(
        "Computed {} envelope frames ({}, frame={}, hop={})",
        envelope.len(),
        policy,
        frame_length,
        hop_length
    );
    Ok(envelope)
}

/// Same as [`compute_envelope`] but takes the policy by name.
///
/// An unknown name does not fail: every frame becomes `0.0` and a warning is
/// logged. Argument validation still applies.
pub fn compute_envelope_by_name(
    signal: &[f32],
    frame_length: usize,
    hop_length: usize,
    policy: &str,
) -> Result<Vec<f32>> {
    match policy.parse::<Aggregation>() {
        Ok(policy) => compute_envelope(signal, frame_length, hop_length, policy),
        Err(_) => {
            validate(signal, frame_length, hop_length)?;
            warn!(
                "Unrecognized aggregation policy '{}'; emitting a zero envelope",
                policy
            );
            Ok(vec![0.0; frame_count(signal.len(), hop_length)])
        }
    }
}
