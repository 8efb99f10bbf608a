use std::f64::consts::PI;
use crate::drivers::TopoError;
/// Section Q factors of a 4th order Butterworth response.
const BUTTER4_Q: [f64; 2] = [0.541_196_100_146_197, 1.306_562_964_876_376_6];
#[derive(Clone, Copy, Debug)]
struct BiquadCoeffs {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}
#[derive(Clone, Copy, Debug, Default)]
struct BiquadState {
    z1: f64,
    z2: f64,
}
impl BiquadCoeffs {
    fn run(&self, samples: &mut [f64]) {
        let mut state = BiquadState::default();
        // Start from the steady state for the first sample to soften the edge transient.
        if let Some(&first) = samples.first() {
            let dc_gain = (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2);
            let y = dc_gain * first;
            state.z1 = y - self.b0 * first;
            state.z2 = self.b2 * first - self.a2 * y;
        }
        for sample in samples.iter_mut() {
            // Transposed direct form II
            let input = *sample;
            let y = self.b0 * input + state.z1;
            state.z1 = self.b1 * input - self.a1 * y + state.z2;
            state.z2 = self.b2 * input - self.a2 * y;
            *sample = y;
        }
    }
}
/// Butterworth band-pass built from high-pass and low-pass biquad sections.
#[derive(Clone, Debug)]
pub struct BandPass {
    sections: Vec<BiquadCoeffs>,
}
impl BandPass {
    pub fn design(l_freq: f64, h_freq: f64, sfreq: f64) -> Result<Self, TopoError> {
        let nyquist = sfreq * 0.5;
        let valid = sfreq > 0.0 && l_freq > 0.0 && h_freq > l_freq && h_freq < nyquist;
        if !valid {
            return Err(TopoError::InvalidFilter {
                l_freq,
                h_freq,
                sfreq,
            });
        }
        let mut sections = Vec::with_capacity(4);
        for q in BUTTER4_Q {
            sections.push(highpass(l_freq, sfreq, q));
        }
        for q in BUTTER4_Q {
            sections.push(lowpass(h_freq, sfreq, q));
        }
        Ok(Self { sections })
    }
    /// Forward-backward application; the result has zero phase shift.
    pub fn filtfilt(&self, samples: &mut Vec<f64>) {
        let n = samples.len();
        if n < 2 {
            return;
        }
        let pad = (6 * self.sections.len()).min(n - 1);
        let mut extended = odd_extend(samples, pad);
        for section in &self.sections {
            section.run(&mut extended);
        }
        extended.reverse();
        for section in &self.sections {
            section.run(&mut extended);
        }
        extended.reverse();
        samples.clear();
        samples.extend_from_slice(&extended[pad..pad + n]);
    }
}
/// Point-symmetric reflection around both end samples.
fn odd_extend(samples: &[f64], pad: usize) -> Vec<f64> {
    let n = samples.len();
    let first = samples[0];
    let last = samples[n - 1];
    let mut out = Vec::with_capacity(n + 2 * pad);
    out.extend((1..=pad).rev().map(|i| 2.0 * first - samples[i]));
    out.extend_from_slice(samples);
    out.extend((1..=pad).map(|i| 2.0 * last - samples[n - 1 - i]));
    out
}
fn lowpass(freq_hz: f64, sample_rate_hz: f64, q: f64) -> BiquadCoeffs {
    let w0 = 2.0 * PI * freq_hz / sample_rate_hz;
    let alpha = w0.sin() / (2.0 * q);
    let cos_w0 = w0.cos();
    let b0 = (1.0 - cos_w0) * 0.5;
    let b1 = 1.0 - cos_w0;
    let b2 = b0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;
    normalize(b0, b1, b2, a0, a1, a2)
}
fn highpass(freq_hz: f64, sample_rate_hz: f64, q: f64) -> BiquadCoeffs {
    let w0 = 2.0 * PI * freq_hz / sample_rate_hz;
    let alpha = w0.sin() / (2.0 * q);
    let cos_w0 = w0.cos();
    let b0 = (1.0 + cos_w0) * 0.5;
    let b1 = -(1.0 + cos_w0);
    let b2 = b0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;
    normalize(b0, b1, b2, a0, a1, a2)
}
fn normalize(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> BiquadCoeffs {
    let a0_inv = 1.0 / a0;
    BiquadCoeffs {
        b0: b0 * a0_inv,
        b1: b1 * a0_inv,
        b2: b2 * a0_inv,
        a1: a1 * a0_inv,
        a2: a2 * a0_inv,
    }
}
