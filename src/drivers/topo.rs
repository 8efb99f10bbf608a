use std::sync::Arc;
use ndarray::Array2;
use crate::drivers::layout::{Rect, TopoLayout};
use crate::drivers::psd::PowerSpectrum;
use crate::drivers::TopoError;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceColor(pub u8, pub u8, pub u8);
impl TraceColor {
    pub const YELLOW: TraceColor = TraceColor(255, 255, 0);
    pub const WHITE: TraceColor = TraceColor(255, 255, 255);
}
/// One line drawn into a region.
#[derive(Clone, Debug)]
pub struct Trace {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: TraceColor,
}
impl Trace {
    pub fn len(&self) -> usize {
        self.ys.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ys.is_empty()
    }
}
/// A plotting region handed to draw code; records what was drawn into it.
#[derive(Clone, Debug)]
pub struct AxesRegion {
    pub index: usize,
    pub name: String,
    pub rect: Rect,
    pub traces: Vec<Trace>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
}
impl AxesRegion {
    pub fn new(index: usize, name: impl Into<String>, rect: Rect) -> Self {
        Self {
            index,
            name: name.into(),
            rect,
            traces: Vec::new(),
            xlabel: None,
            ylabel: None,
        }
    }
    /// Plots `ys` against their sample positions 0, 1, 2, ...
    pub fn plot(&mut self, ys: impl IntoIterator<Item = f64>, color: TraceColor) {
        let ys: Vec<f64> = ys.into_iter().collect();
        let xs = (0..ys.len()).map(|i| i as f64).collect();
        self.traces.push(Trace { xs, ys, color });
    }
    pub fn plot_xy(&mut self, xs: &[f64], ys: impl IntoIterator<Item = f64>, color: TraceColor) {
        let ys: Vec<f64> = ys.into_iter().collect();
        self.traces.push(Trace {
            xs: xs[..ys.len().min(xs.len())].to_vec(),
            ys: ys.into_iter().take(xs.len()).collect(),
            color,
        });
    }
    /// `(x_min, x_max, y_min, y_max)` over every finite point, `None` when nothing is drawn.
    pub fn data_bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for trace in &self.traces {
            for (&x, &y) in trace.xs.iter().zip(&trace.ys) {
                if !x.is_finite() || !y.is_finite() {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, x, y, y),
                    Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
                });
            }
        }
        bounds
    }
}
/// Callback run when a region is clicked: receives a fresh region and the channel index.
pub type PickCallback = Box<dyn Fn(&mut AxesRegion, usize) -> Result<(), TopoError>>;
/// All regions of one topographic figure plus the pick handler.
pub struct TopoFigure {
    regions: Vec<AxesRegion>,
    picked: Vec<AxesRegion>,
    on_pick: Option<PickCallback>,
}
/// Builds one region per layout box. Iterate with [`TopoFigure::iter_mut`].
pub fn iter_topography(layout: &TopoLayout, on_pick: Option<PickCallback>) -> TopoFigure {
    let regions = layout
        .boxes
        .iter()
        .map(|b| AxesRegion::new(b.index, b.name.clone(), b.rect))
        .collect();
    TopoFigure {
        regions,
        picked: Vec::new(),
        on_pick,
    }
}
impl TopoFigure {
    /// Yields `(region, index)` pairs; `index` is the selection row of the channel.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&mut AxesRegion, usize)> {
        self.regions.iter_mut().map(|r| {
            let idx = r.index;
            (r, idx)
        })
    }
    pub fn regions(&self) -> &[AxesRegion] {
        &self.regions
    }
    /// Detail regions opened by clicks, oldest first.
    pub fn picked(&self) -> &[AxesRegion] {
        &self.picked
    }
    pub fn len(&self) -> usize {
        self.regions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
    /// Region under a point in layout coordinates.
    pub fn region_at(&self, x: f64, y: f64) -> Option<usize> {
        self.regions
            .iter()
            .find(|r| r.rect.contains(x, y))
            .map(|r| r.index)
    }
    /// Handles a click at a layout-space point. Returns the channel that was picked, if any.
    pub fn pick_at(&mut self, x: f64, y: f64) -> Result<Option<usize>, TopoError> {
        match self.region_at(x, y) {
            Some(index) => self.pick(index).map(|()| Some(index)),
            None => Ok(None),
        }
    }
    /// Opens a detail region for `index` and runs the pick callback on it.
    pub fn pick(&mut self, index: usize) -> Result<(), TopoError> {
        let Some(callback) = self.on_pick.as_ref() else {
            return Ok(());
        };
        let name = self
            .regions
            .iter()
            .find(|r| r.index == index)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| format!("Ch {index}"));
        let mut detail = AxesRegion::new(index, name, Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 });
        callback(&mut detail, index)?;
        log::info!("picked {} ({} trace(s))", detail.name, detail.traces.len());
        self.picked.push(detail);
        Ok(())
    }
    /// Drops the detail region at `slot` (position in [`TopoFigure::picked`]).
    pub fn close_picked(&mut self, slot: usize) -> Option<AxesRegion> {
        (slot < self.picked.len()).then(|| self.picked.remove(slot))
    }
    /// Number of traces drawn for a channel, in its layout region and in its detail regions.
    pub fn draw_count(&self, index: usize) -> usize {
        self.regions
            .iter()
            .chain(self.picked.iter())
            .filter(|r| r.index == index)
            .map(|r| r.traces.len())
            .sum()
    }
}
/// Frequency axis and dB table captured by the draw callbacks.
#[derive(Clone, Debug)]
pub struct SpectrumContext {
    freqs: Arc<Vec<f64>>,
    psds: Arc<Array2<f64>>,
}
impl SpectrumContext {
    pub fn new(spectrum: &PowerSpectrum) -> Self {
        Self {
            freqs: Arc::new(spectrum.freqs.clone()),
            psds: Arc::new(spectrum.psds.clone()),
        }
    }
    pub fn freqs(&self) -> &[f64] {
        &self.freqs
    }
    pub fn n_channels(&self) -> usize {
        self.psds.nrows()
    }
    fn row(&self, index: usize) -> Result<Vec<f64>, TopoError> {
        if index >= self.psds.nrows() {
            return Err(TopoError::ChannelOutOfRange {
                index,
                len: self.psds.nrows(),
            });
        }
        Ok(self.psds.row(index).to_vec())
    }
    /// Spectrum of one channel against the frequency axis, in yellow.
    /// Axis labels stay unset, so no labels are rendered.
    pub fn draw(&self, ax: &mut AxesRegion, index: usize) -> Result<(), TopoError> {
        let row = self.row(index)?;
        ax.plot_xy(&self.freqs, row, TraceColor::YELLOW);
        Ok(())
    }
    /// Spectrum of one channel against bin positions (no frequency axis).
    pub fn draw_bins(&self, ax: &mut AxesRegion, index: usize) -> Result<(), TopoError> {
        let row = self.row(index)?;
        ax.plot(row, TraceColor::YELLOW);
        Ok(())
    }
    pub fn into_callback(self) -> PickCallback {
        Box::new(move |ax: &mut AxesRegion, index: usize| self.draw(ax, index))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelInfo, ChannelKind, RecordingInfo};
    fn context(rows: usize, bins: usize) -> SpectrumContext {
        SpectrumContext {
            freqs: Arc::new((0..bins).map(|k| 2.0 + k as f64 * 0.5).collect()),
            psds: Arc::new(Array2::from_shape_fn((rows, bins), |(r, k)| -(r as f64) - k as f64)),
        }
    }
    fn layout(n: usize) -> TopoLayout {
        let info = RecordingInfo {
            sfreq: 100.0,
            channels: (0..n)
                .map(|i| {
                    let a = i as f64;
                    ChannelInfo::new(
                        format!("MEG {i:03}1"),
                        ChannelKind::Mag,
                        Some([0.05 * a.cos(), 0.05 * a.sin(), 0.08 + 0.001 * a]),
                    )
                })
                .collect(),
            bads: vec![],
        };
        TopoLayout::from_picks(&info, &(0..n).collect::<Vec<_>>())
    }
    #[test]
    fn callback_plots_one_point_per_bin() {
        let ctx = context(3, 12);
        let mut ax = AxesRegion::new(1, "MEG 0011", Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 });
        ctx.draw(&mut ax, 1).unwrap();
        assert_eq!(ax.traces.len(), 1);
        assert_eq!(ax.traces[0].len(), 12);
        assert_eq!(ax.traces[0].xs, ctx.freqs());
        assert_eq!(ax.traces[0].color, TraceColor::YELLOW);
        assert!(ax.xlabel.is_none() && ax.ylabel.is_none());
    }
    #[test]
    fn out_of_range_channel_fails_without_drawing() {
        let ctx = context(3, 12);
        let mut ax = AxesRegion::new(3, "X", Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 });
        assert!(matches!(
            ctx.draw(&mut ax, 3),
            Err(TopoError::ChannelOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(ctx.draw_bins(&mut ax, 7), Err(TopoError::ChannelOutOfRange { .. })));
        assert!(ax.traces.is_empty());
    }
    #[test]
    fn each_region_drawn_once_by_loop_and_once_per_click() {
        let ctx = context(4, 8);
        let mut fig = iter_topography(&layout(4), Some(ctx.clone().into_callback()));
        for (ax, idx) in fig.iter_mut() {
            ctx.draw_bins(ax, idx).unwrap();
        }
        assert!((0..4).all(|i| fig.draw_count(i) == 1));
        fig.pick(2).unwrap();
        assert_eq!(fig.draw_count(2), 2);
        assert_eq!(fig.draw_count(0), 1);
        assert_eq!(fig.picked()[0].traces[0].xs, ctx.freqs());
        // loop-body traces use bin positions, not frequencies
        assert_eq!(fig.regions()[0].traces[0].xs[0], 0.0);
    }
    #[test]
    fn click_inside_region_picks_its_channel() {
        let ctx = context(4, 8);
        let mut fig = iter_topography(&layout(4), Some(ctx.into_callback()));
        let r = fig.regions()[3].rect;
        let picked = fig.pick_at(r.x + r.w / 2.0, r.y + r.h / 2.0).unwrap();
        assert_eq!(picked, Some(3));
        assert_eq!(fig.picked().len(), 1);
        assert_eq!(fig.pick_at(-1.0, -1.0).unwrap(), None);
    }
    #[test]
    fn closed_detail_regions_are_dropped() {
        let ctx = context(4, 8);
        let mut fig = iter_topography(&layout(4), Some(ctx.into_callback()));
        fig.pick(1).unwrap();
        fig.pick(2).unwrap();
        let closed = fig.close_picked(0).unwrap();
        assert_eq!(closed.index, 1);
        assert_eq!(fig.picked().len(), 1);
        assert_eq!(fig.picked()[0].index, 2);
        assert_eq!(fig.draw_count(1), 0);
        assert!(fig.close_picked(5).is_none());
    }
    #[test]
    fn pick_without_callback_draws_nothing() {
        let mut fig = iter_topography(&layout(2), None);
        fig.pick(0).unwrap();
        assert!(fig.picked().is_empty());
        assert_eq!(fig.draw_count(0), 0);
    }
    #[test]
    fn bounds_skip_non_finite_points() {
        let mut ax = AxesRegion::new(0, "X", Rect { x: 0.0, y: 0.0, w: 1.0, h: 1.0 });
        assert!(ax.data_bounds().is_none());
        ax.plot([f64::NEG_INFINITY, -3.0, 4.0], TraceColor::WHITE);
        assert_eq!(ax.data_bounds(), Some((1.0, 2.0, -3.0, 4.0)));
    }
}
