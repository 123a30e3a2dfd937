use amplenv::audio::load_audio;
use amplenv::{Aggregation, compute_envelope, compute_envelope_by_name};
use hound::{SampleFormat, WavSpec, WavWriter};

#[test]
fn wav_to_envelope() {
    let dir = std::env::temp_dir().join(format!("amplenv-pipeline-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("square.wav");

    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(&path, spec).unwrap();
    for s in [0.0f32, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0] {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();

    let signal = load_audio(&path, 8000).unwrap();
    assert_eq!(signal.samples.len(), 8);

    let max = compute_envelope(&signal.samples, 4, 4, Aggregation::Max).unwrap();
    assert_eq!(max, vec![1.0, 1.0]);

    let min = compute_envelope(&signal.samples, 4, 4, Aggregation::Min).unwrap();
    assert_eq!(min, vec![-1.0, -1.0]);

    let mean = compute_envelope(&signal.samples, 4, 4, Aggregation::Mean).unwrap();
    assert_eq!(mean, vec![0.0, 0.0]);

    let zeros = compute_envelope_by_name(&signal.samples, 4, 3, "BOGUS").unwrap();
    assert_eq!(zeros, vec![0.0; 3]);
}
