//! Amplitude envelope extraction and plotting for audio files.
//!
//! [`envelope::compute_envelope`] reduces fixed-length frames of a mono signal
//! to one value each; [`plot::render_envelope`] draws the waveform with that
//! envelope on top.

pub mod args;
pub mod audio;
pub mod envelope;
pub mod error;
pub mod plot;

pub use envelope::{Aggregation, compute_envelope, compute_envelope_by_name};
pub use error::{EnvelopeError, Result};
