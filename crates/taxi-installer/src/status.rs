use std::fs;
use std::io;
use std::path::Path;

use anyhow::Result;
use taxi_install_core::InstallError;

use crate::exposure::exposed_launcher_target;
use crate::receipts::read_install_receipt;
use crate::{InstallLayout, InstallState};

pub fn inspect_install(layout: &InstallLayout) -> Result<InstallState> {
    let layout = &layout.absolute()?;
    let launcher_path = layout.launcher_path();
    let launcher_mode = file_mode(&launcher_path)?;
    let link_target = exposed_launcher_target(layout)?;
    let link_points_to_launcher = link_target.as_deref() == Some(launcher_path.as_path());
    let artifact_path = layout.artifact_path();
    let artifact_size = file_size(&artifact_path)?;
    let receipt = read_install_receipt(layout)?;

    Ok(InstallState {
        launcher_present: launcher_mode.is_some(),
        launcher_executable: launcher_mode.is_some_and(|mode| mode & 0o100 != 0),
        launcher_path,
        link_path: layout.link_path(),
        link_target,
        link_points_to_launcher,
        artifact_path,
        artifact_size,
        receipt,
    })
}

fn file_size(path: &Path) -> Result<Option<u64>> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(Some(metadata.len())),
        Ok(_) => Ok(None),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(InstallError::filesystem("inspect", path, err).into()),
    }
}

#[cfg(unix)]
fn file_mode(path: &Path) -> Result<Option<u32>> {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => Ok(Some(metadata.permissions().mode())),
        Ok(_) => Ok(None),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(InstallError::filesystem("inspect", path, err).into()),
    }
}

#[cfg(not(unix))]
fn file_mode(path: &Path) -> Result<Option<u32>> {
    Ok(file_size(path)?.map(|_| 0o755))
}
