use thiserror::Error;
#[derive(Debug, Error)]
pub enum TopoError {
    #[error("sample rate must be greater than zero")]
    InvalidSampleRate,
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },
    #[error("channel selection is empty")]
    EmptySelection,
    #[error("channel index {index} out of range for {len} channels")]
    ChannelOutOfRange { index: usize, len: usize },
    #[error("invalid time window {tmin}..{tmax} s for a {duration:.2} s recording")]
    InvalidWindow { tmin: f64, tmax: f64, duration: f64 },
    #[error("no frequency bins between {fmin} and {fmax} Hz")]
    NoFrequencyBins { fmin: f64, fmax: f64 },
    #[error("invalid band-pass {l_freq}..{h_freq} Hz at sample rate {sfreq} Hz")]
    InvalidFilter { l_freq: f64, h_freq: f64, sfreq: f64 },
    #[error("transform size must be a positive value larger than the overlap")]
    InvalidTransformSize,
    #[error("power table is already in decibels")]
    AlreadyDecibel,
    #[error("malformed recording file: {0}")]
    Format(String),
    #[error("dataset download failed: {0}")]
    Download(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for TopoError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        TopoError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for TopoError {
    fn from(value: image::ImageError) -> Self {
        TopoError::Plot(value.to_string())
    }
}
impl From<ureq::Error> for TopoError {
    fn from(value: ureq::Error) -> Self {
        TopoError::Download(value.to_string())
    }
}
