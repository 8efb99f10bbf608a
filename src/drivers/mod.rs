// src/drivers/mod.rs
// 数据源、信号处理与拓扑绘图服务
pub mod dataset;
pub mod error;
pub mod filter;
pub mod format;
pub mod layout;
pub mod picks;
pub mod pipeline;
pub mod plot;
pub mod psd;
pub mod simulate;
pub mod source;
pub mod topo;
// 公开导出常用类型，方便外部调用
pub use dataset::{DatasetFetcher, DatasetProvider};
pub use error::TopoError;
pub use layout::TopoLayout;
pub use picks::{pick_types, Exclude, MegPick, PickTypes};
pub use pipeline::{PsdTopoPipeline, TopoOutput};
pub use plot::{render_topo_png, PlotStyle};
pub use psd::{compute_raw_psd, PowerScale, PowerSpectrum, PsdParams};
pub use source::{ManualSource, Recording, RecordingFile, RecordingSource};
pub use topo::{iter_topography, AxesRegion, SpectrumContext, TopoFigure};
