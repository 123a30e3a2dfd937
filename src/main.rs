use amplenv::args::Args;
use amplenv::audio;
use amplenv::envelope::compute_envelope;
use amplenv::plot::{RenderRequest, render_envelope};
use anyhow::Context;
use clap::Parser;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log_level.as_str())
        .init();

    let input_path = args.input_path();
    info!("Audio file selected is: {}", args.file);

    let signal = audio::load_audio(&input_path, args.sr)
        .with_context(|| format!("failed to load audio from {}", input_path.display()))?;

    info!("Sampling rate used for {}: {}", args.file, signal.sample_rate);
    info!("Frame length selected for {}: {}", args.file, args.frame);
    info!("Hop length used for {}: {}", args.file, args.hop);
    info!("One sample lasts for {:.6} seconds", signal.sample_period());
    info!(
        "Total number of samples in {}: {} ({:.2} s)",
        args.file,
        signal.samples.len(),
        signal.duration_seconds()
    );
    info!("Feature selected: {}", args.feature);

    let envelope = compute_envelope(&signal.samples, args.frame, args.hop, args.feature)
        .context("failed to compute amplitude envelope")?;
    info!("Computed {} envelope frames", envelope.len());

    let paths = render_envelope(&RenderRequest {
        samples: &signal.samples,
        sample_rate: signal.sample_rate,
        envelope: &envelope,
        hop_length: args.hop,
        label: &args.file,
        feature: args.feature,
        output_dir: &args.output_dir,
        unique_id: &args.unique_id,
    })
    .with_context(|| format!("failed to write plots to {}", args.output_dir.display()))?;

    info!(
        "Process complete: {} and {}",
        paths.input.display(),
        paths.envelope.display()
    );
    Ok(())
}
