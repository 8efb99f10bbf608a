use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::drivers::error::TopoError;
use crate::drivers::topo::{AxesRegion, TopoFigure};
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub frame: RGBColor,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1200,
            background: RGBColor(0, 0, 0),
            frame: RGBColor(60, 60, 60),
        }
    }
}
/// Static snapshot of a topographic figure: one small chart per region, no axes.
pub fn render_topo_png(figure: &TopoFigure, style: PlotStyle) -> Result<Vec<u8>, TopoError> {
    if figure.is_empty() {
        return Err(TopoError::Plot("figure has no regions".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        for region in figure.regions() {
            draw_region(&root, region, &style)?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn draw_region(
    root: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    region: &AxesRegion,
    style: &PlotStyle,
) -> Result<(), TopoError> {
    let (w, h) = (style.width as f64, style.height as f64);
    let left = (region.rect.x * w).round() as i32;
    // layout y grows upwards, pixels grow downwards
    let top = ((1.0 - region.rect.y - region.rect.h) * h).round() as i32;
    let size = (
        (region.rect.w * w).round().max(2.0) as u32,
        (region.rect.h * h).round().max(2.0) as u32,
    );
    let area = root.clone().shrink((left, top), size);
    area.fill(&style.background)?;
    let Some((x0, x1, y0, y1)) = region.data_bounds() else {
        return Ok(());
    };
    let x_range = if x1 > x0 { x0..x1 } else { x0 - 0.5..x0 + 0.5 };
    let y_range = if y1 > y0 { y0..y1 } else { y0 - 0.5..y0 + 0.5 };
    let mut chart = ChartBuilder::on(&area).build_cartesian_2d(x_range, y_range)?;
    chart.plotting_area().draw(&Rectangle::new(
        [(x0, y0), (x1.max(x0 + f64::EPSILON), y1.max(y0 + f64::EPSILON))],
        style.frame.stroke_width(1),
    ))?;
    for trace in &region.traces {
        let color = RGBColor(trace.color.0, trace.color.1, trace.color.2);
        let series = trace
            .xs
            .iter()
            .copied()
            .zip(trace.ys.iter().copied())
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        chart.draw_series(LineSeries::new(series, &color))?;
    }
    Ok(())
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, TopoError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| TopoError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
