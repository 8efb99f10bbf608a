//! Named sample datasets, acquired once and served from a local cache afterwards.
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use crate::drivers::format::{verify_recording, write_recording};
use crate::drivers::simulate::simulate_sample;
use crate::drivers::TopoError;
/// Where the recording comes from the first time it is requested.
#[derive(Clone, Debug)]
pub enum DatasetProvider {
    /// HTTP(S) download of a file in the `TOPOREC1` format.
    Remote { url: String },
    /// Generated locally from a fixed seed.
    Simulated { seed: u64, duration_seconds: f64 },
}
#[derive(Clone, Debug)]
pub struct DatasetFetcher {
    name: String,
    file_name: String,
    cache_root: PathBuf,
    provider: DatasetProvider,
}
impl DatasetFetcher {
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        cache_root: impl AsRef<Path>,
        provider: DatasetProvider,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            cache_root: cache_root.as_ref().to_path_buf(),
            provider,
        }
    }
    /// `<data-local-dir>/sensortopo`, or `./sensortopo-data` when the platform has none.
    pub fn default_cache_root() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("sensortopo"))
            .unwrap_or_else(|| PathBuf::from("sensortopo-data"))
    }
    pub fn dataset_dir(&self) -> PathBuf {
        self.cache_root.join(&self.name)
    }
    pub fn file_path(&self) -> PathBuf {
        self.dataset_dir().join(&self.file_name)
    }
    /// A cached copy counts only when its header parses and its body is complete.
    pub fn is_cached(&self) -> bool {
        verify_recording(self.file_path()).is_ok()
    }
    /// Local path of the recording, acquiring it first when no valid copy is cached.
    pub fn data_path(&self) -> Result<PathBuf, TopoError> {
        let target = self.file_path();
        if self.is_cached() {
            log::debug!("dataset '{}' cached at {}", self.name, target.display());
            return Ok(target);
        }
        if target.exists() {
            log::warn!("discarding unreadable cache file {}", target.display());
        }
        fs::create_dir_all(self.dataset_dir())?;
        let partial = target.with_extension("part");
        log::info!("acquiring dataset '{}' into {}", self.name, target.display());
        let acquired = self
            .acquire(&partial)
            .and_then(|()| verify_recording(&partial).map(|_| ()));
        if let Err(err) = acquired {
            fs::remove_file(&partial).ok();
            return Err(err);
        }
        fs::rename(&partial, &target)?;
        Ok(target)
    }
    fn acquire(&self, partial: &Path) -> Result<(), TopoError> {
        match &self.provider {
            DatasetProvider::Remote { url } => download(url, partial),
            DatasetProvider::Simulated {
                seed,
                duration_seconds,
            } => {
                let recording = simulate_sample(*seed, *duration_seconds)?;
                write_recording(partial, &recording)
            }
        }
    }
}
fn download(url: &str, path: &Path) -> Result<(), TopoError> {
    let response = ureq::get(url).call()?;
    let mut reader = response.into_reader();
    let mut file = File::create(path)?;
    let bytes = io::copy(&mut reader, &mut file)?;
    file.flush()?;
    log::info!("downloaded {bytes} bytes from {url}");
    Ok(())
}
