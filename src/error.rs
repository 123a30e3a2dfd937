#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unrecognized aggregation policy '{0}' (expected MAX, MIN, MEAN or MEDIAN)")]
    UnrecognizedPolicy(String),

    #[error("unsupported WAV format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV decode error: {0}")]
    Decode(#[from] hound::Error),

    #[error("resample error: {0}")]
    Resample(String),

    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;
