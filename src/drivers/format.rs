//! On-disk recording layout:
//!
//! ```text
//! b"TOPOREC1" | u32 LE header length | JSON header | f32 LE samples (channel-major)
//! ```
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use crate::drivers::{Recording, TopoError};
use crate::types::RecordingInfo;
pub const MAGIC: &[u8; 8] = b"TOPOREC1";
/// Headers are small JSON objects; anything larger is treated as corruption.
pub const MAX_HEADER_LEN: usize = 16 * 1024 * 1024;
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordingHeader {
    pub info: RecordingInfo,
    pub n_times: usize,
}
pub fn write_recording(path: impl AsRef<Path>, recording: &Recording) -> Result<(), TopoError> {
    let header = RecordingHeader {
        info: recording.info.clone(),
        n_times: recording.n_times(),
    };
    let header_bytes = serde_json::to_vec(&header)?;
    let mut w = BufWriter::new(File::create(path.as_ref())?);
    w.write_all(MAGIC)?;
    w.write_all(&(header_bytes.len() as u32).to_le_bytes())?;
    w.write_all(&header_bytes)?;
    for value in recording.data().iter() {
        w.write_all(&value.to_le_bytes())?;
    }
    w.flush()?;
    Ok(())
}
impl RecordingHeader {
    /// Byte length of the sample section.
    pub fn sample_bytes(&self) -> Result<usize, TopoError> {
        self.info
            .n_channels()
            .checked_mul(self.n_times)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| TopoError::Format("sample count overflows".into()))
    }
}
pub fn read_header(path: impl AsRef<Path>) -> Result<RecordingHeader, TopoError> {
    let mut r = BufReader::new(File::open(path.as_ref())?);
    read_header_from(&mut r).map(|(header, _)| header)
}
/// Reads the header and checks the file holds exactly the samples it announces.
pub fn verify_recording(path: impl AsRef<Path>) -> Result<RecordingHeader, TopoError> {
    let path = path.as_ref();
    let mut r = BufReader::new(File::open(path)?);
    let (header, header_len) = read_header_from(&mut r)?;
    let expected = (MAGIC.len() + 4 + header_len) as u64 + header.sample_bytes()? as u64;
    let found = std::fs::metadata(path)?.len();
    if found != expected {
        return Err(TopoError::Format(format!(
            "expected {expected} bytes, file has {found}"
        )));
    }
    Ok(header)
}
pub fn read_recording(path: impl AsRef<Path>) -> Result<Recording, TopoError> {
    let mut r = BufReader::new(File::open(path.as_ref())?);
    let (header, _) = read_header_from(&mut r)?;
    let n_channels = header.info.n_channels();
    let expected = header.sample_bytes()?;
    let mut raw = Vec::new();
    r.read_to_end(&mut raw)?;
    if raw.len() != expected {
        return Err(TopoError::Format(format!(
            "expected {} sample bytes, found {}",
            expected,
            raw.len()
        )));
    }
    let samples: Vec<f32> = raw
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    let data = Array2::from_shape_vec((n_channels, header.n_times), samples)
        .map_err(|e| TopoError::Format(e.to_string()))?;
    log::debug!(
        "loaded {} channels x {} samples @ {} Hz",
        n_channels,
        header.n_times,
        header.info.sfreq
    );
    Recording::new(header.info, data)
}
fn read_header_from<R: Read>(r: &mut R) -> Result<(RecordingHeader, usize), TopoError> {
    let mut magic = [0u8; 8];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(TopoError::Format("bad magic".into()));
    }
    let mut len = [0u8; 4];
    r.read_exact(&mut len)?;
    let len = u32::from_le_bytes(len) as usize;
    if len > MAX_HEADER_LEN {
        return Err(TopoError::Format(format!("header length {len} too large")));
    }
    let mut header_bytes = vec![0u8; len];
    r.read_exact(&mut header_bytes)?;
    Ok((serde_json::from_slice(&header_bytes)?, len))
}
