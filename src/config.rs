use std::path::PathBuf;
use crate::drivers::dataset::{DatasetFetcher, DatasetProvider};
use crate::drivers::picks::{Exclude, PickTypes};
use crate::drivers::psd::PsdParams;
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Band-pass edges in Hz.
    pub l_freq: f64,
    pub h_freq: f64,
    pub picks: PickTypes,
    /// Analysis window in seconds.
    pub tmin: f64,
    pub tmax: f64,
    /// Frequency range kept in the power table.
    pub fmin: f64,
    pub fmax: f64,
    /// FFT size, ideally a power of two.
    pub n_fft: usize,
}
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            l_freq: 1.0,
            h_freq: 20.0,
            // every MEG channel, bad ones included
            picks: PickTypes::meg_only().exclude(Exclude::Names(Vec::new())),
            tmin: 0.0,
            tmax: 120.0,
            fmin: 2.0,
            fmax: 20.0,
            n_fft: 2048,
        }
    }
}
impl AnalysisConfig {
    pub fn psd_params(&self) -> PsdParams {
        PsdParams {
            tmin: self.tmin,
            tmax: self.tmax,
            fmin: self.fmin,
            fmax: self.fmax,
            n_fft: self.n_fft,
            n_overlap: 0,
        }
    }
}
#[derive(Clone, Debug)]
pub struct DatasetConfig {
    pub name: String,
    pub file_name: String,
    /// Defaults to the platform data directory.
    pub cache_root: Option<PathBuf>,
    pub provider: DatasetProvider,
}
impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name: "sample".to_owned(),
            file_name: "sample_audvis_filt-0-40_raw.rec".to_owned(),
            cache_root: None,
            provider: DatasetProvider::Simulated {
                seed: 42,
                duration_seconds: 130.0,
            },
        }
    }
}
impl DatasetConfig {
    pub fn fetcher(&self) -> DatasetFetcher {
        let root = self
            .cache_root
            .clone()
            .unwrap_or_else(DatasetFetcher::default_cache_root);
        DatasetFetcher::new(&self.name, &self.file_name, root, self.provider.clone())
    }
}
