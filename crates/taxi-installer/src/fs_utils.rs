use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use taxi_install_core::InstallError;

static TMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Removes `path` when it is a file or a symlink. Dangling symlinks count as
/// present.
pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => fs::remove_file(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

/// Writes `contents` next to `path`, lets `prepare` adjust the staged file,
/// then renames it over `path`. Readers never observe a missing or partially
/// written target.
pub fn replace_file_atomically<F>(path: &Path, contents: &[u8], prepare: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let staged = sibling_tmp_path(path)?;
    fs::write(&staged, contents)
        .map_err(|err| InstallError::filesystem("write", &staged, err))?;

    let result = prepare(&staged).and_then(|()| {
        fs::rename(&staged, path)
            .map_err(|err| InstallError::filesystem("replace", path, err).into())
    });
    if result.is_err() {
        let _ = remove_file_if_exists(&staged);
    }
    result
}

/// Points `link` at `target`, replacing whatever file or symlink was there.
pub fn replace_symlink_atomically(target: &Path, link: &Path) -> Result<()> {
    let staged = sibling_tmp_path(link)?;
    create_symlink(target, &staged).map_err(|err| {
        InstallError::filesystem("create symlink", &staged, err)
    })?;

    if let Err(err) = fs::rename(&staged, link) {
        let _ = remove_file_if_exists(&staged);
        return Err(InstallError::filesystem("replace symlink", link, err).into());
    }
    Ok(())
}

/// Moves a file into place, overwriting `dst`. Falls back to copy and remove
/// only when `src` and `dst` are on different filesystems.
pub fn move_file(src: &Path, dst: &Path) -> Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => return Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {}
        Err(err) => return Err(InstallError::filesystem("move", dst, err).into()),
    }

    log::debug!(
        "{} and {} are on different filesystems, copying instead",
        src.display(),
        dst.display()
    );
    let staged = sibling_tmp_path(dst)?;
    if let Err(err) = fs::copy(src, &staged) {
        let _ = remove_file_if_exists(&staged);
        return Err(InstallError::filesystem("copy", src, err))
            .with_context(|| format!("failed to move artifact to {}", dst.display()));
    }
    if let Err(err) = fs::rename(&staged, dst) {
        let _ = remove_file_if_exists(&staged);
        return Err(InstallError::filesystem("replace", dst, err).into());
    }
    fs::remove_file(src).map_err(|err| InstallError::filesystem("remove", src, err))?;
    Ok(())
}

fn sibling_tmp_path(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .and_then(|v| v.to_str())
        .with_context(|| format!("path has no file name: {}", path.display()))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system time is before unix epoch")?
        .as_nanos();
    let sequence = TMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    Ok(path.with_file_name(format!(
        ".{file_name}.tmp-{}-{nanos}-{sequence}",
        std::process::id()
    )))
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
