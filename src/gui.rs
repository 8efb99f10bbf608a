// src/gui.rs
use eframe::egui;
use egui::{Color32, Pos2, Rect, Rounding, Shape, Stroke, Vec2};
use egui_plot::{Line, Plot, PlotPoints};
use crate::drivers::topo::{AxesRegion, TopoFigure, TraceColor};

pub struct TopoApp {
    title: String,
    figure: TopoFigure,
    // 详情窗口：(窗口 id, 是否可见)，与 figure.picked() 一一对应
    detail_open: Vec<(u64, bool)>,
    next_detail_id: u64,
    log_messages: Vec<String>,
}

impl TopoApp {
    pub fn new(title: impl Into<String>, figure: TopoFigure) -> Self {
        let regions = figure.len();
        Self {
            title: title.into(),
            figure,
            detail_open: Vec::new(),
            next_detail_id: 0,
            log_messages: vec![format!("{regions} channels. Click a sensor to open its spectrum.")],
        }
    }

    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > 8 { self.log_messages.remove(0); }
    }

    // 关闭的详情窗口连同其区域一起释放
    fn drop_closed_details(&mut self) {
        for slot in (0..self.detail_open.len()).rev() {
            if !self.detail_open[slot].1 {
                self.detail_open.remove(slot);
                self.figure.close_picked(slot);
            }
        }
    }

    fn color(c: TraceColor) -> Color32 {
        Color32::from_rgb(c.0, c.1, c.2)
    }

    // 布局坐标 (y 向上) -> 屏幕矩形
    fn screen_rect(canvas: Rect, region: &AxesRegion) -> Rect {
        let side = canvas.width().min(canvas.height());
        let origin = canvas.center() - Vec2::splat(side / 2.0);
        let r = region.rect;
        let min = origin + Vec2::new((r.x * side as f64) as f32, ((1.0 - r.y - r.h) * side as f64) as f32);
        Rect::from_min_size(min, Vec2::new((r.w * side as f64) as f32, (r.h * side as f64) as f32))
    }

    fn screen_to_layout(canvas: Rect, pos: Pos2) -> (f64, f64) {
        let side = canvas.width().min(canvas.height());
        let origin = canvas.center() - Vec2::splat(side / 2.0);
        let x = (pos.x - origin.x) / side;
        let y = 1.0 - (pos.y - origin.y) / side;
        (x as f64, y as f64)
    }

    fn paint_region(painter: &egui::Painter, rect: Rect, region: &AxesRegion) {
        painter.rect_stroke(rect, Rounding::same(0.0), Stroke::new(0.5, Color32::from_rgb(60, 60, 60)));
        let Some((x0, x1, y0, y1)) = region.data_bounds() else { return };
        let sx = if x1 > x0 { x1 - x0 } else { 1.0 };
        let sy = if y1 > y0 { y1 - y0 } else { 1.0 };
        for trace in &region.traces {
            let points: Vec<Pos2> = trace
                .xs
                .iter()
                .zip(&trace.ys)
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| {
                    let u = ((x - x0) / sx) as f32;
                    let v = ((y - y0) / sy) as f32;
                    Pos2::new(rect.left() + u * rect.width(), rect.bottom() - v * rect.height())
                })
                .collect();
            if points.len() > 1 {
                painter.add(Shape::line(points, Stroke::new(1.0, Self::color(trace.color))));
            }
        }
    }
}

impl eframe::App for TopoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut visuals = egui::Visuals::dark();
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(10, 10, 15);
        ctx.set_visuals(visuals);

        egui::SidePanel::left("L").min_width(240.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading(&self.title);
            ui.label("Power spectral density (dB)");
            ui.separator();
            ui.label(format!("Regions: {}", self.figure.len()));
            ui.label(format!("Opened: {}", self.figure.picked().len()));
            ui.add_space(10.0);
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                for m in &self.log_messages { ui.monospace(m); }
            });
        });

        let mut clicked_at = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
                let canvas = response.rect;
                for region in self.figure.regions() {
                    Self::paint_region(&painter, Self::screen_rect(canvas, region), region);
                }
                if let Some(pos) = response.hover_pos() {
                    let (x, y) = Self::screen_to_layout(canvas, pos);
                    if let Some(idx) = self.figure.region_at(x, y) {
                        if let Some(region) = self.figure.regions().iter().find(|r| r.index == idx) {
                            painter.text(
                                pos + Vec2::new(12.0, -12.0),
                                egui::Align2::LEFT_BOTTOM,
                                &region.name,
                                egui::FontId::proportional(12.0),
                                Color32::WHITE,
                            );
                        }
                    }
                }
                if response.clicked() {
                    clicked_at = response.interact_pointer_pos().map(|p| Self::screen_to_layout(canvas, p));
                }
            });

        if let Some((x, y)) = clicked_at {
            match self.figure.pick_at(x, y) {
                Ok(Some(idx)) => {
                    self.detail_open.push((self.next_detail_id, true));
                    self.next_detail_id += 1;
                    self.log(&format!("picked channel {idx}"));
                }
                Ok(None) => {}
                Err(err) => {
                    log::error!("pick callback failed: {err}");
                    self.log(&err.to_string());
                }
            }
        }

        // 详情窗口：点击回调画出的频谱
        for (region, (id, open)) in self.figure.picked().iter().zip(self.detail_open.iter_mut()) {
            egui::Window::new(region.name.clone())
                .id(egui::Id::new(("detail", *id)))
                .open(open)
                .default_size([420.0, 260.0])
                .show(ctx, |ui| {
                    let mut plot = Plot::new(("detail_plot", *id)).view_aspect(1.6);
                    if let Some(label) = &region.xlabel {
                        plot = plot.x_axis_label(label.clone());
                    }
                    if let Some(label) = &region.ylabel {
                        plot = plot.y_axis_label(label.clone());
                    }
                    plot.show(ui, |plot_ui| {
                        for trace in &region.traces {
                            let points: Vec<[f64; 2]> = trace
                                .xs
                                .iter()
                                .zip(&trace.ys)
                                .filter(|(x, y)| x.is_finite() && y.is_finite())
                                .map(|(x, y)| [*x, *y])
                                .collect();
                            plot_ui.line(Line::new(PlotPoints::new(points)).color(Self::color(trace.color)));
                        }
                    });
                });
        }
        self.drop_closed_details();
    }
}
