use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use taxi_install_core::InstallError;

use crate::http::HttpClient;

pub(crate) const DOWNLOAD_CHUNK_SIZE: usize = 4096;

static DOWNLOAD_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Scratch directory for a single download. Removed when dropped.
pub(crate) struct DownloadDir {
    path: PathBuf,
}

impl DownloadDir {
    pub(crate) fn create() -> Result<Self> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system time is before unix epoch")?
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "taxi-install-{}-{}-{}",
            std::process::id(),
            nanos,
            DOWNLOAD_DIR_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&path)
            .map_err(|err| InstallError::filesystem("create directory", &path, err))?;
        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DownloadDir {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_dir_all(&self.path) {
            log::debug!(
                "could not remove download dir {}: {err}",
                self.path.display()
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DownloadSummary {
    pub(crate) path: PathBuf,
    pub(crate) bytes: u64,
    pub(crate) content_length: Option<u64>,
    pub(crate) sha256: String,
}

/// Streams `url` into `dest`.
///
/// With a known content length the body is copied in [`DOWNLOAD_CHUNK_SIZE`]
/// chunks and `on_progress(downloaded, Some(total))` fires after every chunk.
/// Without one the body is buffered, written once, and `on_progress` fires a
/// single time with `None` as the total.
pub(crate) fn download_to_file<F>(
    client: &dyn HttpClient,
    url: &str,
    dest: &Path,
    mut on_progress: F,
) -> Result<DownloadSummary>
where
    F: FnMut(u64, Option<u64>),
{
    let mut body = client.get_stream(url)?;
    let mut file =
        File::create(dest).map_err(|err| InstallError::filesystem("create", dest, err))?;
    let mut hasher = Sha256::new();

    let bytes = match body.content_length {
        Some(total) => {
            let mut buffer = [0_u8; DOWNLOAD_CHUNK_SIZE];
            let mut downloaded = 0_u64;
            loop {
                let read = body
                    .reader
                    .read(&mut buffer)
                    .map_err(|err| InstallError::network(url, err.to_string()))?;
                if read == 0 {
                    break;
                }
                file.write_all(&buffer[..read])
                    .map_err(|err| InstallError::filesystem("write", dest, err))?;
                hasher.update(&buffer[..read]);
                downloaded += read as u64;
                on_progress(downloaded, Some(total));
            }
            if downloaded != total {
                return Err(InstallError::network(
                    url,
                    format!("truncated download: received {downloaded} of {total} bytes"),
                )
                .into());
            }
            downloaded
        }
        None => {
            let mut content = Vec::new();
            body.reader
                .read_to_end(&mut content)
                .map_err(|err| InstallError::network(url, err.to_string()))?;
            file.write_all(&content)
                .map_err(|err| InstallError::filesystem("write", dest, err))?;
            hasher.update(&content);
            let downloaded = content.len() as u64;
            on_progress(downloaded, None);
            downloaded
        }
    };

    file.flush()
        .map_err(|err| InstallError::filesystem("flush", dest, err))?;
    log::debug!("downloaded {bytes} bytes from {url} to {}", dest.display());

    Ok(DownloadSummary {
        path: dest.to_path_buf(),
        bytes,
        content_length: body.content_length,
        sha256: hex::encode(hasher.finalize()),
    })
}
