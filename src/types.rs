// src/types.rs
use serde::{Deserialize, Serialize};

// 通道类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    Mag,
    Grad,
    Eeg,
    Eog,
    Stim,
    Misc,
}

impl ChannelKind {
    pub fn is_meg(self) -> bool {
        matches!(self, ChannelKind::Mag | ChannelKind::Grad)
    }

    /// Channels that carry physiological data and get filtered.
    pub fn is_data(self) -> bool {
        matches!(self, ChannelKind::Mag | ChannelKind::Grad | ChannelKind::Eeg)
    }
}

// 单个通道的元数据
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub name: String,
    pub kind: ChannelKind,
    /// Sensor location in head coordinates (metres). `None` for stim/misc channels.
    pub position: Option<[f64; 3]>,
}

impl ChannelInfo {
    pub fn new(name: impl Into<String>, kind: ChannelKind, position: Option<[f64; 3]>) -> Self {
        Self {
            name: name.into(),
            kind,
            position,
        }
    }
}

// 记录的元数据
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordingInfo {
    pub sfreq: f64,
    pub channels: Vec<ChannelInfo>,
    #[serde(default)]
    pub bads: Vec<String>,
}

impl RecordingInfo {
    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channel_names(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    pub fn is_bad(&self, name: &str) -> bool {
        self.bads.iter().any(|b| b == name)
    }
}
