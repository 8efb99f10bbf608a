use std::f64::consts::PI;
use ndarray::Array2;
use rustfft::{num_complex::Complex64, FftPlanner};
use crate::drivers::{Recording, TopoError};
/// Whether a power table holds linear power or decibels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerScale {
    Linear,
    Decibel,
}
/// Power spectral density for each picked channel.
#[derive(Clone, Debug)]
pub struct PowerSpectrum {
    pub freqs: Vec<f64>,
    pub psds: Array2<f64>, // selection row -> bins
    pub channel_names: Vec<String>,
    scale: PowerScale,
}
impl PowerSpectrum {
    pub fn n_channels(&self) -> usize {
        self.psds.nrows()
    }
    pub fn n_freqs(&self) -> usize {
        self.freqs.len()
    }
    pub fn scale(&self) -> PowerScale {
        self.scale
    }
    /// Decibel copy of a linear table. The linear table stays available for re-use.
    pub fn to_decibels(&self) -> Result<PowerSpectrum, TopoError> {
        let mut scaled = self.clone();
        scaled.scale_to_decibels_in_place()?;
        Ok(scaled)
    }
    /// 10 * log10, applied once. A table that is already in dB is refused.
    pub fn scale_to_decibels_in_place(&mut self) -> Result<(), TopoError> {
        if self.scale == PowerScale::Decibel {
            return Err(TopoError::AlreadyDecibel);
        }
        self.psds.mapv_inplace(decibels);
        self.scale = PowerScale::Decibel;
        Ok(())
    }
}
pub fn decibels(power: f64) -> f64 {
    10.0 * power.log10()
}
/// Analysis window and estimator settings.
#[derive(Clone, Debug)]
pub struct PsdParams {
    pub tmin: f64,
    pub tmax: f64,
    pub fmin: f64,
    pub fmax: f64,
    pub n_fft: usize,
    pub n_overlap: usize,
}
impl Default for PsdParams {
    fn default() -> Self {
        Self {
            tmin: 0.0,
            tmax: f64::INFINITY,
            fmin: 0.0,
            fmax: f64::INFINITY,
            n_fft: 2048,
            n_overlap: 0,
        }
    }
}
/// Welch estimator with a Hann window.
pub struct WelchEstimator {
    n_fft: usize,
    hop: usize,
    window: Vec<f64>,
    window_s2: f64,
}
impl WelchEstimator {
    pub fn new(n_fft: usize, n_overlap: usize) -> Result<Self, TopoError> {
        if n_fft == 0 || n_overlap >= n_fft {
            return Err(TopoError::InvalidTransformSize);
        }
        let window: Vec<f64> = (0..n_fft)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n_fft as f64).cos())
            .collect();
        let window_s2 = window.iter().map(|w| w * w).sum();
        Ok(Self {
            n_fft,
            hop: n_fft - n_overlap,
            window,
            window_s2,
        })
    }
    pub fn frequencies(&self, sfreq: f64) -> Vec<f64> {
        (0..=self.n_fft / 2)
            .map(|k| k as f64 * sfreq / self.n_fft as f64)
            .collect()
    }
    pub fn num_segments(&self, len: usize) -> usize {
        if len <= self.n_fft {
            1
        } else {
            (len - self.n_fft) / self.hop + 1
        }
    }
    /// One-sided density for a single channel, `n_fft / 2 + 1` bins.
    pub fn estimate(&self, planner: &mut FftPlanner<f64>, signal: &[f64], sfreq: f64) -> Vec<f64> {
        let fft = planner.plan_fft_forward(self.n_fft);
        let n_bins = self.n_fft / 2 + 1;
        let mut acc = vec![0.0; n_bins];
        let segments = self.num_segments(signal.len());
        let mut buffer = vec![Complex64::new(0.0, 0.0); self.n_fft];
        for seg in 0..segments {
            let start = seg * self.hop;
            for (i, slot) in buffer.iter_mut().enumerate() {
                let v = signal.get(start + i).copied().unwrap_or(0.0);
                *slot = Complex64::new(v * self.window[i], 0.0);
            }
            fft.process(&mut buffer);
            for (a, c) in acc.iter_mut().zip(&buffer) {
                *a += c.norm_sqr();
            }
        }
        let norm = 1.0 / (segments as f64 * sfreq * self.window_s2);
        let nyquist = self.n_fft % 2 == 0;
        for (k, a) in acc.iter_mut().enumerate() {
            let edge = k == 0 || (nyquist && k == n_bins - 1);
            *a *= if edge { norm } else { 2.0 * norm };
        }
        acc
    }
}
/// PSD of the picked channels over `[tmin, tmax]`, restricted to `[fmin, fmax]`.
pub fn compute_raw_psd(
    recording: &Recording,
    picks: &[usize],
    params: &PsdParams,
) -> Result<PowerSpectrum, TopoError> {
    if picks.is_empty() {
        return Err(TopoError::EmptySelection);
    }
    let estimator = WelchEstimator::new(params.n_fft, params.n_overlap)?;
    let start = recording.time_as_index(params.tmin);
    let stop = if params.tmax.is_finite() {
        recording
            .time_as_index(params.tmax)
            .saturating_add(1)
            .min(recording.n_times())
    } else {
        recording.n_times()
    };
    if params.tmax < params.tmin || params.tmin < 0.0 || start >= recording.n_times() {
        return Err(TopoError::InvalidWindow {
            tmin: params.tmin,
            tmax: params.tmax,
            duration: recording.duration_seconds(),
        });
    }
    let data = recording.window(picks, start, stop)?;
    let sfreq = recording.sfreq();
    let all_freqs = estimator.frequencies(sfreq);
    let keep: Vec<usize> = all_freqs
        .iter()
        .enumerate()
        .filter(|(_, &f)| f >= params.fmin && f <= params.fmax)
        .map(|(k, _)| k)
        .collect();
    if keep.is_empty() {
        return Err(TopoError::NoFrequencyBins {
            fmin: params.fmin,
            fmax: params.fmax,
        });
    }
    log::info!(
        "PSD: {} channels, samples {}..{}, {} segment(s) of {}, {} bins in {}-{} Hz",
        picks.len(),
        start,
        start + data.ncols(),
        estimator.num_segments(data.ncols()),
        params.n_fft,
        keep.len(),
        params.fmin,
        params.fmax
    );
    let mut planner = FftPlanner::<f64>::new();
    let mut psds = Array2::<f64>::zeros((picks.len(), keep.len()));
    for (row, channel) in data.outer_iter().enumerate() {
        let signal: Vec<f64> = channel.iter().map(|&v| v as f64).collect();
        let full = estimator.estimate(&mut planner, &signal, sfreq);
        for (col, &k) in keep.iter().enumerate() {
            psds[[row, col]] = full[k];
        }
    }
    Ok(PowerSpectrum {
        freqs: keep.iter().map(|&k| all_freqs[k]).collect(),
        psds,
        channel_names: picks
            .iter()
            .map(|&p| recording.info.channels[p].name.clone())
            .collect(),
        scale: PowerScale::Linear,
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelInfo, ChannelKind, RecordingInfo};
    fn sine_recording(freq: f64, sfreq: f64, seconds: f64) -> Recording {
        let n = (sfreq * seconds) as usize;
        let info = RecordingInfo {
            sfreq,
            channels: vec![
                ChannelInfo::new("MEG 0111", ChannelKind::Grad, None),
                ChannelInfo::new("MEG 0113", ChannelKind::Mag, None),
            ],
            bads: vec![],
        };
        let data = Array2::from_shape_fn((2, n), |(c, t)| {
            let amp = if c == 0 { 1.0 } else { 2.0 };
            (amp * (2.0 * PI * freq * t as f64 / sfreq).sin()) as f32
        });
        Recording::new(info, data).unwrap()
    }
    #[test]
    fn one_row_per_pick_and_bins_inside_range() {
        let rec = sine_recording(10.0, 150.15, 130.0);
        let params = PsdParams {
            tmin: 0.0,
            tmax: 120.0,
            fmin: 2.0,
            fmax: 20.0,
            n_fft: 2048,
            n_overlap: 0,
        };
        let estimate = compute_raw_psd(&rec, &[0, 1], &params).unwrap();
        assert_eq!(estimate.psds.dim(), (2, estimate.n_freqs()));
        let df = 150.15 / 2048.0;
        let expected = (0..=1024)
            .map(|k| k as f64 * df)
            .filter(|f| (2.0..=20.0).contains(f))
            .count();
        assert_eq!(estimate.n_freqs(), expected);
        assert!(estimate.freqs.iter().all(|f| (2.0..=20.0).contains(f)));
        assert_eq!(estimate.channel_names, vec!["MEG 0111", "MEG 0113"]);
    }
    #[test]
    fn peak_sits_at_signal_frequency() {
        let rec = sine_recording(10.0, 128.0, 64.0);
        let params = PsdParams {
            fmin: 2.0,
            fmax: 20.0,
            n_fft: 256,
            ..PsdParams::default()
        };
        let estimate = compute_raw_psd(&rec, &[0], &params).unwrap();
        let row = estimate.psds.row(0);
        let (peak, _) = row
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        assert!((estimate.freqs[peak] - 10.0).abs() < 0.5);
    }
    #[test]
    fn density_integrates_to_signal_power() {
        let sfreq = 128.0;
        let rec = sine_recording(16.0, sfreq, 32.0);
        let params = PsdParams {
            n_fft: 256,
            ..PsdParams::default()
        };
        let estimate = compute_raw_psd(&rec, &[1], &params).unwrap();
        let df = sfreq / 256.0;
        let power: f64 = estimate.psds.row(0).iter().sum::<f64>() * df;
        // amplitude 2 sine -> mean power 2
        assert!((power - 2.0).abs() < 0.05, "power {power}");
    }
    #[test]
    fn short_signal_is_zero_padded_into_one_segment() {
        let rec = sine_recording(10.0, 100.0, 5.0);
        let params = PsdParams {
            n_fft: 2048,
            ..PsdParams::default()
        };
        let estimate = compute_raw_psd(&rec, &[0], &params).unwrap();
        assert_eq!(estimate.n_freqs(), 1025);
    }
    #[test]
    fn empty_frequency_range_is_an_error() {
        let rec = sine_recording(10.0, 100.0, 30.0);
        let params = PsdParams {
            fmin: 20.0,
            fmax: 2.0,
            n_fft: 256,
            ..PsdParams::default()
        };
        assert!(matches!(
            compute_raw_psd(&rec, &[0], &params),
            Err(TopoError::NoFrequencyBins { .. })
        ));
    }
    #[test]
    fn huge_tmax_is_clamped_to_recording_end() {
        let rec = sine_recording(10.0, 100.0, 30.0);
        let params = PsdParams {
            tmax: 1e20,
            fmin: 2.0,
            fmax: 20.0,
            n_fft: 256,
            ..PsdParams::default()
        };
        let estimate = compute_raw_psd(&rec, &[0], &params).unwrap();
        assert!(estimate.psds.iter().all(|p| p.is_finite()));
        assert!(estimate.psds.iter().any(|&p| p > 0.0));
        let db = estimate.to_decibels().unwrap();
        assert!(db.psds.iter().all(|p| p.is_finite()));
    }
    #[test]
    fn window_past_end_is_an_error() {
        let rec = sine_recording(10.0, 100.0, 10.0);
        let params = PsdParams {
            tmin: 50.0,
            tmax: 60.0,
            n_fft: 256,
            ..PsdParams::default()
        };
        assert!(matches!(
            compute_raw_psd(&rec, &[0], &params),
            Err(TopoError::InvalidWindow { .. })
        ));
    }
    #[test]
    fn window_end_is_clamped() {
        let rec = sine_recording(10.0, 100.0, 10.0);
        let params = PsdParams {
            tmin: 0.0,
            tmax: 120.0,
            n_fft: 256,
            ..PsdParams::default()
        };
        assert!(compute_raw_psd(&rec, &[0], &params).is_ok());
    }
    #[test]
    fn decibel_scaling_is_one_way() {
        let rec = sine_recording(10.0, 128.0, 16.0);
        let params = PsdParams {
            fmin: 5.0,
            fmax: 15.0,
            n_fft: 256,
            ..PsdParams::default()
        };
        let linear = compute_raw_psd(&rec, &[0, 1], &params).unwrap();
        let db = linear.to_decibels().unwrap();
        assert_eq!(linear.scale(), PowerScale::Linear);
        assert_eq!(db.scale(), PowerScale::Decibel);
        // recomputing from the cached linear table reproduces the same result
        let again = linear.to_decibels().unwrap();
        assert_eq!(db.psds, again.psds);
        // a second application is detected
        let mut in_place = db.clone();
        assert!(matches!(
            in_place.scale_to_decibels_in_place(),
            Err(TopoError::AlreadyDecibel)
        ));
        assert!(db.to_decibels().is_err());
        // and would have produced a different table
        let peak = linear.psds.row(1).iter().cloned().fold(0.0, f64::max);
        assert_ne!(decibels(decibels(peak)), decibels(peak));
    }
    #[test]
    fn overlap_must_be_smaller_than_transform() {
        assert!(WelchEstimator::new(256, 256).is_err());
        assert!(WelchEstimator::new(0, 0).is_err());
        let w = WelchEstimator::new(256, 128).unwrap();
        assert_eq!(w.num_segments(1024), 7);
    }
}
