use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Result;
use taxi_install_core::InstallError;

use crate::fs_utils::{remove_file_if_exists, replace_symlink_atomically};
use crate::InstallLayout;

pub fn expose_launcher(layout: &InstallLayout) -> Result<PathBuf> {
    let link = layout.link_path();
    replace_symlink_atomically(&layout.launcher_path(), &link)?;
    log::debug!(
        "linked {} -> {}",
        link.display(),
        layout.launcher_path().display()
    );
    Ok(link)
}

/// Target of the bin-directory entry, or `None` when it is missing or not a
/// symlink.
pub fn exposed_launcher_target(layout: &InstallLayout) -> Result<Option<PathBuf>> {
    let link = layout.link_path();
    match fs::symlink_metadata(&link) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            let target = fs::read_link(&link)
                .map_err(|err| InstallError::filesystem("read symlink", &link, err))?;
            Ok(Some(target))
        }
        Ok(_) => Ok(None),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(InstallError::filesystem("inspect", &link, err).into()),
    }
}

/// Removes the bin-directory link when it points at this layout's launcher.
/// Returns whether anything was removed.
pub fn remove_exposed_launcher(layout: &InstallLayout) -> Result<bool> {
    let Some(target) = exposed_launcher_target(layout)? else {
        return Ok(false);
    };
    if target != layout.launcher_path() {
        return Ok(false);
    }

    let link = layout.link_path();
    remove_file_if_exists(&link).map_err(|err| InstallError::filesystem("remove", &link, err))?;
    Ok(true)
}
