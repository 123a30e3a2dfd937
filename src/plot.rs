use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use crate::envelope::Aggregation;
use crate::error::{EnvelopeError, Result};

const PANEL_WIDTH: u32 = 1800;
const PANEL_HEIGHT: u32 = 600;

/// Everything the renderer needs to draw one envelope.
pub struct RenderRequest<'a> {
    pub samples: &'a [f32],
    pub sample_rate: u32,
    pub envelope: &'a [f32],
    pub hop_length: usize,
    pub label: &'a str,
    pub feature: Aggregation,
    pub output_dir: &'a Path,
    pub unique_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPaths {
    pub input: PathBuf,
    pub envelope: PathBuf,
}

pub fn output_paths(output_dir: &Path, unique_id: &str) -> RenderedPaths {
    RenderedPaths {
        input: output_dir.join(format!("{}_Input.png", unique_id)),
        envelope: output_dir.join(format!("{}_AmplitudeEnvelope.png", unique_id)),
    }
}

/// Places envelope frame `k` at `k * hop / sr` seconds.
pub fn envelope_points(envelope: &[f32], hop_length: usize, sample_rate: u32) -> Vec<(f64, f64)> {
    envelope
        .iter()
        .enumerate()
        .map(|(k, &v)| ((k * hop_length) as f64 / sample_rate as f64, v as f64))
        .collect()
}

/// Waveform points in seconds. Signals longer than `columns` pairs are
/// reduced to a min/max pair per bucket so peaks stay visible.
pub fn waveform_points(samples: &[f32], sample_rate: u32, columns: usize) -> Vec<(f64, f64)> {
    let sr = sample_rate as f64;
    if columns == 0 || samples.len() <= columns * 2 {
        return samples
            .iter()
            .enumerate()
            .map(|(i, &s)| (i as f64 / sr, s as f64))
            .collect();
    }

    let bucket = samples.len().div_ceil(columns);
    let mut points = Vec::with_capacity(columns * 2);
    for (n, chunk) in samples.chunks(bucket).enumerate() {
        let t = (n * bucket) as f64 / sr;
        let lo = chunk.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = chunk.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        points.push((t, lo as f64));
        points.push((t, hi as f64));
    }
    points
}

fn render_err(e: impl std::fmt::Display) -> EnvelopeError {
    EnvelopeError::Render(e.to_string())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    waveform: &[(f64, f64)],
    color: RGBColor,
    duration: f64,
    envelope: Option<&[(f64, f64)]>,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..duration, -1f64..1f64)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Amplitude")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(waveform.iter().copied(), &color.mix(0.5)))
        .map_err(render_err)?;

    if let Some(points) = envelope {
        chart
            .draw_series(LineSeries::new(points.iter().copied(), RED.stroke_width(2)))
            .map_err(render_err)?;
    }
    Ok(())
}

/// Writes `{id}_Input.png` and `{id}_AmplitudeEnvelope.png` into the output
/// directory, creating it if needed.
pub fn render_envelope(req: &RenderRequest<'_>) -> Result<RenderedPaths> {
    if req.sample_rate == 0 {
        return Err(EnvelopeError::InvalidArgument(
            "sample rate must be positive".into(),
        ));
    }
    fs::create_dir_all(req.output_dir)?;
    let paths = output_paths(req.output_dir, req.unique_id);

    let duration = (req.samples.len() as f64 / req.sample_rate as f64).max(f64::EPSILON);
    let waveform = waveform_points(req.samples, req.sample_rate, PANEL_WIDTH as usize);
    let envelope = envelope_points(req.envelope, req.hop_length, req.sample_rate);
    let input_title = format!("Input Audio {}", req.label);
    debug!(
        "Drawing {} waveform points and {} envelope points",
        waveform.len(),
        envelope.len()
    );

    {
        let root = BitMapBackend::new(&paths.input, (PANEL_WIDTH, PANEL_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        draw_panel(&root, &input_title, &waveform, MAGENTA, duration, None)?;
        root.present().map_err(render_err)?;
    }
    info!("Waveform plot written to {}", paths.input.display());

    {
        let root = BitMapBackend::new(&paths.envelope, (PANEL_WIDTH, PANEL_HEIGHT * 2))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        let (upper, lower) = root.split_vertically(PANEL_HEIGHT);
        draw_panel(&upper, &input_title, &waveform, MAGENTA, duration, None)?;
        draw_panel(
            &lower,
            &format!("Input Audio {} Feature Name {}", req.label, req.feature),
            &waveform,
            CYAN,
            duration,
            Some(envelope.as_slice()),
        )?;
        root.present().map_err(render_err)?;
    }
    info!("Amplitude envelope plot written to {}", paths.envelope.display());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_follow_unique_id() {
        let paths = output_paths(Path::new("outputs"), "run42");
        assert_eq!(paths.input, PathBuf::from("outputs/run42_Input.png"));
        assert_eq!(
            paths.envelope,
            PathBuf::from("outputs/run42_AmplitudeEnvelope.png")
        );
    }

    #[test]
    fn envelope_frames_map_to_seconds() {
        let points = envelope_points(&[0.1, 0.2, 0.3], 512, 22050);
        assert_eq!(points[0], (0.0, 0.1f32 as f64));
        assert!((points[1].0 - 512.0 / 22050.0).abs() < 1e-12);
        assert!((points[2].0 - 1024.0 / 22050.0).abs() < 1e-12);
    }

    #[test]
    fn short_waveform_is_kept_sample_for_sample() {
        let points = waveform_points(&[0.0, 0.5, -0.5], 2, 100);
        assert_eq!(points, vec![(0.0, 0.0), (0.5, 0.5), (1.0, -0.5)]);
    }

    #[test]
    fn decimated_waveform_keeps_extremes() {
        let mut samples = vec![0.0f32; 10_000];
        samples[1234] = 0.9;
        samples[8765] = -0.7;
        let points = waveform_points(&samples, 1000, 100);
        assert_eq!(points.len(), 200);
        let hi = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let lo = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        assert_eq!(hi, 0.9f32 as f64);
        assert_eq!(lo, -0.7f32 as f64);
        assert!(points.last().unwrap().0 < 10.0);
    }

    fn sine_request<'a>(samples: &'a [f32], envelope: &'a [f32], dir: &'a Path) -> RenderRequest<'a> {
        RenderRequest {
            samples,
            sample_rate: 8000,
            envelope,
            hop_length: 128,
            label: "sine.wav",
            feature: Aggregation::Max,
            output_dir: dir,
            unique_id: "test",
        }
    }

    #[test]
    fn renders_both_images() {
        let dir = std::env::temp_dir()
            .join(format!("amplenv-plot-{}", std::process::id()))
            .join("nested");
        let _ = fs::remove_dir_all(&dir);
        let samples: Vec<f32> = (0..4000).map(|i| (i as f32 * 0.05).sin() * 0.6).collect();
        let envelope =
            crate::envelope::compute_envelope(&samples, 256, 128, Aggregation::Max).unwrap();

        let paths = render_envelope(&sine_request(&samples, &envelope, &dir)).unwrap();
        assert_eq!(paths, output_paths(&dir, "test"));
        assert!(paths.input.is_file());
        assert!(paths.envelope.is_file());
        assert!(fs::metadata(&paths.envelope).unwrap().len() > 0);
    }

    #[test]
    fn output_dir_that_is_a_file_fails_with_io() {
        let base = std::env::temp_dir().join(format!("amplenv-plot-file-{}", std::process::id()));
        fs::create_dir_all(&base).unwrap();
        let blocker = base.join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let samples = [0.0f32, 0.5, -0.5, 0.25];
        let envelope = [0.5f32];
        let err = render_envelope(&sine_request(&samples, &envelope, &blocker)).unwrap_err();
        assert!(matches!(err, EnvelopeError::Io(_)), "{err:?}");
        assert!(blocker.is_file());
    }
}
