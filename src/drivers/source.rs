use std::path::{Path, PathBuf};
use ndarray::{Array2, Axis};
use crate::drivers::filter::BandPass;
use crate::drivers::format::read_recording;
use crate::drivers::TopoError;
use crate::types::RecordingInfo;
/// Multi-channel recording held fully in memory.
#[derive(Clone, Debug)]
pub struct Recording {
    pub info: RecordingInfo,
    data: Array2<f32>, // channels x samples
}
impl Recording {
    pub fn new(info: RecordingInfo, data: Array2<f32>) -> Result<Self, TopoError> {
        if !(info.sfreq > 0.0) {
            return Err(TopoError::InvalidSampleRate);
        }
        if data.nrows() != info.n_channels() {
            return Err(TopoError::ChannelMismatch {
                expected: info.n_channels(),
                actual: data.nrows(),
            });
        }
        Ok(Self { info, data })
    }
    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }
    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }
    pub fn n_times(&self) -> usize {
        self.data.ncols()
    }
    pub fn sfreq(&self) -> f64 {
        self.info.sfreq
    }
    pub fn duration_seconds(&self) -> f64 {
        self.n_times() as f64 / self.info.sfreq
    }
    /// Nearest sample index for a time in seconds.
    pub fn time_as_index(&self, seconds: f64) -> usize {
        (seconds * self.info.sfreq).round().max(0.0) as usize
    }
    /// Copies the `[start, stop)` sample range of the picked channels.
    /// `stop` is clamped to the end of the recording.
    pub fn window(&self, picks: &[usize], start: usize, stop: usize) -> Result<Array2<f32>, TopoError> {
        let stop = stop.min(self.n_times());
        let start = start.min(stop);
        if let Some(&bad) = picks.iter().find(|&&p| p >= self.n_channels()) {
            return Err(TopoError::ChannelOutOfRange {
                index: bad,
                len: self.n_channels(),
            });
        }
        let selected = self.data.select(Axis(0), picks);
        Ok(selected.slice(ndarray::s![.., start..stop]).to_owned())
    }
    /// Zero-phase band-pass of every MEG/EEG channel, in place.
    pub fn filter(&mut self, l_freq: f64, h_freq: f64) -> Result<(), TopoError> {
        let band = BandPass::design(l_freq, h_freq, self.info.sfreq)?;
        let mut filtered = 0usize;
        for (idx, mut row) in self.data.axis_iter_mut(Axis(0)).enumerate() {
            if !self.info.channels[idx].kind.is_data() {
                continue;
            }
            let mut samples: Vec<f64> = row.iter().map(|&v| v as f64).collect();
            band.filtfilt(&mut samples);
            for (dst, src) in row.iter_mut().zip(samples) {
                *dst = src as f32;
            }
            filtered += 1;
        }
        log::info!(
            "band-pass {l_freq}-{h_freq} Hz applied to {filtered} of {} channels",
            self.n_channels()
        );
        Ok(())
    }
}
/// Trait representing something that can produce a recording on demand.
pub trait RecordingSource {
    fn load(&mut self) -> Result<Recording, TopoError>;
}
/// In-memory source useful for tests.
pub struct ManualSource {
    recording: Option<Recording>,
}
impl ManualSource {
    pub fn new(recording: Recording) -> Self {
        Self {
            recording: Some(recording),
        }
    }
}
impl RecordingSource for ManualSource {
    fn load(&mut self) -> Result<Recording, TopoError> {
        self.recording
            .take()
            .ok_or_else(|| TopoError::Format("manual source already consumed".into()))
    }
}
/// Recording stored on disk in the `TOPOREC1` format.
pub struct RecordingFile {
    path: PathBuf,
}
impl RecordingFile {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl RecordingSource for RecordingFile {
    fn load(&mut self) -> Result<Recording, TopoError> {
        log::info!("reading {}", self.path.display());
        read_recording(&self.path)
    }
}
