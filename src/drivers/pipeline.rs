use crate::config::AnalysisConfig;
use crate::drivers::error::TopoError;
use crate::drivers::layout::TopoLayout;
use crate::drivers::picks::pick_types;
use crate::drivers::psd::{compute_raw_psd, PowerSpectrum};
use crate::drivers::source::RecordingSource;
use crate::drivers::topo::{iter_topography, SpectrumContext, TopoFigure};
/// Everything the viewer needs after one run.
pub struct TopoOutput {
    pub figure: TopoFigure,
    pub context: SpectrumContext,
    /// Linear-scale table, kept so the dB view can be recomputed.
    pub spectrum: PowerSpectrum,
}
/// Load -> filter -> pick -> PSD -> dB -> layout -> draw.
pub struct PsdTopoPipeline {
    config: AnalysisConfig,
}
impl PsdTopoPipeline {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
    pub fn run<S: RecordingSource>(&self, source: &mut S) -> Result<TopoOutput, TopoError> {
        let mut raw = source.load()?;
        raw.filter(self.config.l_freq, self.config.h_freq)?;
        let picks = pick_types(&raw.info, &self.config.picks)?;
        let spectrum = compute_raw_psd(&raw, &picks, &self.config.psd_params())?;
        let psds_db = spectrum.to_decibels()?;
        let context = SpectrumContext::new(&psds_db);
        let layout = TopoLayout::from_picks(&raw.info, &picks);
        let mut figure = iter_topography(&layout, Some(context.clone().into_callback()));
        // The click callback redraws with a frequency axis; this pass plots bins only.
        for (ax, idx) in figure.iter_mut() {
            context.draw_bins(ax, idx)?;
        }
        log::info!(
            "topography ready: {} regions, {} bins each",
            figure.len(),
            context.freqs().len()
        );
        Ok(TopoOutput {
            figure,
            context,
            spectrum,
        })
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::plot::{render_topo_png, PlotStyle};
    use crate::drivers::psd::PowerScale;
    use crate::drivers::simulate::simulate_sample;
    use crate::drivers::source::ManualSource;
    #[test]
    fn sample_run_builds_one_region_per_meg_channel() {
        let raw = simulate_sample(3, 130.0).unwrap();
        let n_meg = raw.info.channels.iter().filter(|c| c.kind.is_meg()).count();
        let mut source = ManualSource::new(raw);
        let pipeline = PsdTopoPipeline::new(AnalysisConfig::default());
        let mut out = pipeline.run(&mut source).unwrap();
        assert_eq!(out.figure.len(), n_meg);
        assert_eq!(out.spectrum.n_channels(), n_meg);
        assert_eq!(out.spectrum.scale(), PowerScale::Linear);
        let n_bins = out.context.freqs().len();
        assert!(out.context.freqs().iter().all(|f| (2.0..=20.0).contains(f)));
        for region in out.figure.regions() {
            assert_eq!(region.traces.len(), 1);
            assert_eq!(region.traces[0].len(), n_bins);
        }
        assert!((0..n_meg).all(|i| out.figure.draw_count(i) == 1));
        out.figure.pick(0).unwrap();
        out.figure.pick(n_meg - 1).unwrap();
        assert_eq!(out.figure.draw_count(0), 2);
        let freqs = &out.figure.picked()[0].traces[0].xs;
        assert!(out.figure.picked().iter().all(|r| &r.traces[0].xs == freqs));
        assert!(out.figure.pick(n_meg).is_err());
    }
    #[test]
    fn alpha_peak_shows_in_decibel_spectrum() {
        let raw = simulate_sample(5, 40.0).unwrap();
        let config = AnalysisConfig {
            tmax: 30.0,
            n_fft: 512,
            ..AnalysisConfig::default()
        };
        let out = PsdTopoPipeline::new(config).run(&mut ManualSource::new(raw)).unwrap();
        let freqs = out.context.freqs();
        let db = out.spectrum.to_decibels().unwrap();
        let row = db.psds.row(0);
        let (peak, _) = row
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        assert!((freqs[peak] - 10.0).abs() < 0.6, "peak at {} Hz", freqs[peak]);
    }
    #[test]
    fn pipeline_figure_renders_to_png() {
        let raw = simulate_sample(9, 20.0).unwrap();
        let config = AnalysisConfig {
            tmax: 15.0,
            n_fft: 256,
            ..AnalysisConfig::default()
        };
        let out = PsdTopoPipeline::new(config).run(&mut ManualSource::new(raw)).unwrap();
        let style = PlotStyle {
            width: 300,
            height: 300,
            ..PlotStyle::default()
        };
        let png = render_topo_png(&out.figure, style).unwrap();
        assert!(!png.is_empty());
    }
    #[test]
    fn invalid_band_stops_the_run() {
        let raw = simulate_sample(1, 5.0).unwrap();
        let config = AnalysisConfig {
            h_freq: 200.0,
            ..AnalysisConfig::default()
        };
        let result = PsdTopoPipeline::new(config).run(&mut ManualSource::new(raw));
        assert!(matches!(result, Err(TopoError::InvalidFilter { .. })));
    }
}
