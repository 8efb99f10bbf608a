use crate::drivers::TopoError;
use crate::types::{ChannelKind, RecordingInfo};
/// Which MEG sensors to include.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MegPick {
    None,
    All,
    Mag,
    Grad,
}
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exclude {
    /// Drop the channels listed in `info.bads`.
    Bads,
    /// Drop exactly these channels. An empty list keeps everything, bads included.
    Names(Vec<String>),
}
#[derive(Clone, Debug)]
pub struct PickTypes {
    pub meg: MegPick,
    pub eeg: bool,
    pub eog: bool,
    pub stim: bool,
    pub exclude: Exclude,
}
impl Default for PickTypes {
    fn default() -> Self {
        Self {
            meg: MegPick::All,
            eeg: false,
            eog: false,
            stim: false,
            exclude: Exclude::Bads,
        }
    }
}
impl PickTypes {
    pub fn meg_only() -> Self {
        Self::default()
    }
    pub fn exclude(mut self, exclude: Exclude) -> Self {
        self.exclude = exclude;
        self
    }
    fn accepts(&self, kind: ChannelKind) -> bool {
        match kind {
            ChannelKind::Mag => matches!(self.meg, MegPick::All | MegPick::Mag),
            ChannelKind::Grad => matches!(self.meg, MegPick::All | MegPick::Grad),
            ChannelKind::Eeg => self.eeg,
            ChannelKind::Eog => self.eog,
            ChannelKind::Stim => self.stim,
            ChannelKind::Misc => false,
        }
    }
}
/// Channel indices matching the requested kinds, in recording order.
pub fn pick_types(info: &RecordingInfo, picks: &PickTypes) -> Result<Vec<usize>, TopoError> {
    let selected: Vec<usize> = info
        .channels
        .iter()
        .enumerate()
        .filter(|(_, ch)| picks.accepts(ch.kind))
        .filter(|(_, ch)| match &picks.exclude {
            Exclude::Bads => !info.is_bad(&ch.name),
            Exclude::Names(names) => !names.iter().any(|n| n == &ch.name),
        })
        .map(|(idx, _)| idx)
        .collect();
    if selected.is_empty() {
        return Err(TopoError::EmptySelection);
    }
    log::debug!("picked {} of {} channels", selected.len(), info.n_channels());
    Ok(selected)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChannelInfo;
    fn info() -> RecordingInfo {
        RecordingInfo {
            sfreq: 100.0,
            channels: vec![
                ChannelInfo::new("STI 014", ChannelKind::Stim, None),
                ChannelInfo::new("MEG 0111", ChannelKind::Grad, None),
                ChannelInfo::new("MEG 0112", ChannelKind::Grad, None),
                ChannelInfo::new("MEG 0113", ChannelKind::Mag, None),
                ChannelInfo::new("EEG 001", ChannelKind::Eeg, None),
            ],
            bads: vec!["MEG 0112".into()],
        }
    }
    #[test]
    fn empty_exclude_keeps_bads() {
        let picks = pick_types(&info(), &PickTypes::meg_only().exclude(Exclude::Names(vec![]))).unwrap();
        assert_eq!(picks, vec![1, 2, 3]);
    }
    #[test]
    fn default_exclude_drops_bads() {
        assert_eq!(pick_types(&info(), &PickTypes::meg_only()).unwrap(), vec![1, 3]);
    }
    #[test]
    fn magnetometers_only() {
        let sel = PickTypes {
            meg: MegPick::Mag,
            ..PickTypes::default()
        };
        assert_eq!(pick_types(&info(), &sel).unwrap(), vec![3]);
    }
    #[test]
    fn eeg_and_stim_without_meg() {
        let sel = PickTypes {
            meg: MegPick::None,
            eeg: true,
            stim: true,
            ..PickTypes::default()
        };
        assert_eq!(pick_types(&info(), &sel).unwrap(), vec![0, 4]);
    }
    #[test]
    fn no_match_is_an_error() {
        let sel = PickTypes {
            meg: MegPick::None,
            eog: true,
            ..PickTypes::default()
        };
        assert!(matches!(pick_types(&info(), &sel), Err(TopoError::EmptySelection)));
    }
}
