use clap::Parser;
use std::path::PathBuf;

use crate::envelope::Aggregation;

/// Compute and plot the amplitude envelope of an audio file.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Audio file name, resolved inside the input directory
    #[clap(long)]
    pub file: String,

    /// Target sampling rate for decoding
    #[clap(long)]
    pub sr: u32,

    /// Frame length in samples
    #[clap(long)]
    pub frame: usize,

    /// Hop length in samples
    #[clap(long)]
    pub hop: usize,

    /// Aggregation applied to each frame (case-insensitive)
    #[clap(long, value_enum, ignore_case = true)]
    pub feature: Aggregation,

    /// Token used to name the output images
    #[clap(long)]
    pub unique_id: String,

    /// Directory the audio file is read from
    #[clap(long, default_value = "inputs")]
    pub input_dir: PathBuf,

    /// Directory the PNG plots are written to
    #[clap(long, default_value = "outputs")]
    pub output_dir: PathBuf,

    /// Tracing filter, e.g. "debug" or "amplenv=trace"
    #[clap(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn input_path(&self) -> PathBuf {
        self.input_dir.join(&self.file)
    }
}
