// src/main.rs
use anyhow::Context;
use eframe::egui;
use sensortopo::config::{AnalysisConfig, DatasetConfig};
use sensortopo::drivers::{PsdTopoPipeline, RecordingFile};
use sensortopo::gui;
// 入口函数
fn main() -> anyhow::Result<()> {
    env_logger::init();
    // 1. 数据集：首次运行时获取，之后直接读缓存
    let fetcher = DatasetConfig::default().fetcher();
    let raw_fname = fetcher
        .data_path()
        .context("failed to obtain the sample dataset")?;
    // 2. 滤波 -> 选通道 -> PSD -> dB -> 拓扑布局
    let pipeline = PsdTopoPipeline::new(AnalysisConfig::default());
    let output = pipeline
        .run(&mut RecordingFile::open(&raw_fname))
        .with_context(|| format!("processing {}", raw_fname.display()))?;
    log::info!(
        "{} regions, linear table {}x{}",
        output.figure.len(),
        output.spectrum.n_channels(),
        output.spectrum.n_freqs()
    );
    // 3. 交互窗口，关闭前阻塞
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 960.0])
        .with_min_inner_size([640.0, 480.0])
        .with_title("Sensor topography: power spectra");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let figure = output.figure;
    eframe::run_native(
        "sensortopo",
        options,
        Box::new(move |_cc| Box::new(gui::TopoApp::new("MEG power spectra", figure))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
