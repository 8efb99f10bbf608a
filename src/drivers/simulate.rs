//! Deterministic stand-in for the "sample" MEG/EEG dataset.
//!
//! 102 helmet sites carry two planar gradiometers and one magnetometer each,
//! followed by 8 EEG electrodes, one EOG and one stimulus channel. The signal is
//! correlated background noise plus a posterior 10 Hz alpha rhythm.
use std::f64::consts::PI;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::drivers::{Recording, TopoError};
use crate::types::{ChannelInfo, ChannelKind, RecordingInfo};
pub const SAMPLE_SFREQ: f64 = 150.153_747_564_078_6;
pub const MEG_SITES: usize = 102;
pub const EEG_CHANNELS: usize = 8;
const HELMET_RADIUS_M: f64 = 0.12;
const SCALP_RADIUS_M: f64 = 0.09;
/// Polar angle of the lowest helmet row.
const HELMET_MAX_THETA: f64 = 100.0 * PI / 180.0;
pub const BAD_CHANNEL: &str = "MEG 0443";
#[derive(Clone, Copy, Debug)]
struct SignalGen {
    alpha_amp: f64,
    alpha_phase: f64,
    noise_amp: f64,
}
/// Helmet-shaped sensor sites (Fibonacci spiral on a spherical cap).
pub fn helmet_sites(n: usize, radius: f64, max_theta: f64) -> Vec<[f64; 3]> {
    let golden = PI * (3.0 - 5f64.sqrt());
    let z_min = max_theta.cos();
    (0..n)
        .map(|i| {
            let frac = (i as f64 + 0.5) / n as f64;
            let z = 1.0 - frac * (1.0 - z_min);
            let r = (1.0 - z * z).max(0.0).sqrt();
            let phi = golden * i as f64;
            [radius * r * phi.cos(), radius * r * phi.sin(), radius * z]
        })
        .collect()
}
pub fn sample_info() -> RecordingInfo {
    let mut channels = Vec::with_capacity(MEG_SITES * 3 + EEG_CHANNELS + 2);
    for (s, pos) in helmet_sites(MEG_SITES, HELMET_RADIUS_M, HELMET_MAX_THETA)
        .into_iter()
        .enumerate()
    {
        let site = s + 1;
        channels.push(ChannelInfo::new(format!("MEG {site:03}2"), ChannelKind::Grad, Some(pos)));
        channels.push(ChannelInfo::new(format!("MEG {site:03}3"), ChannelKind::Grad, Some(pos)));
        channels.push(ChannelInfo::new(format!("MEG {site:03}1"), ChannelKind::Mag, Some(pos)));
    }
    for (e, pos) in helmet_sites(EEG_CHANNELS, SCALP_RADIUS_M, PI / 2.0)
        .into_iter()
        .enumerate()
    {
        channels.push(ChannelInfo::new(format!("EEG {:03}", e + 1), ChannelKind::Eeg, Some(pos)));
    }
    channels.push(ChannelInfo::new("EOG 061", ChannelKind::Eog, None));
    channels.push(ChannelInfo::new("STI 014", ChannelKind::Stim, None));
    RecordingInfo {
        sfreq: SAMPLE_SFREQ,
        channels,
        bads: vec![BAD_CHANNEL.to_owned()],
    }
}
pub fn simulate_sample(seed: u64, duration_seconds: f64) -> Result<Recording, TopoError> {
    let info = sample_info();
    let n_times = (duration_seconds * info.sfreq).round() as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array2::<f32>::zeros((info.n_channels(), n_times));
    for (idx, ch) in info.channels.iter().enumerate() {
        let unit = match ch.kind {
            ChannelKind::Mag => 1e-13,
            ChannelKind::Grad => 4e-12,
            ChannelKind::Eeg => 1e-5,
            ChannelKind::Eog => 5e-5,
            ChannelKind::Stim | ChannelKind::Misc => 0.0,
        };
        let mut row = data.row_mut(idx);
        if ch.kind == ChannelKind::Stim {
            let period = info.sfreq.round() as usize;
            for t in (period..n_times).step_by(period) {
                row[t] = (1 + (t / period) % 4) as f32;
            }
            continue;
        }
        // posterior (-y) sensors see more alpha
        let posterior = ch
            .position
            .map(|p| (-p[1] / HELMET_RADIUS_M).clamp(-1.0, 1.0) * 0.5 + 0.5)
            .unwrap_or(0.1);
        let gen = SignalGen {
            alpha_amp: unit * (0.3 + 1.7 * posterior),
            alpha_phase: rng.gen_range(0.0..2.0 * PI),
            noise_amp: unit,
        };
        let mut colored = 0.0f64;
        for t in 0..n_times {
            let time = t as f64 / info.sfreq;
            let white: f64 = rng.gen_range(-1.0..1.0);
            colored = 0.97 * colored + 0.25 * white;
            let alpha = gen.alpha_amp * (2.0 * PI * 10.0 * time + gen.alpha_phase).sin();
            let v = gen.noise_amp * (colored + 0.2 * white) + alpha;
            row[t] = v as f32;
        }
    }
    log::info!(
        "simulated {} channels x {} samples (seed {seed})",
        info.n_channels(),
        n_times
    );
    Recording::new(info, data)
}
