use std::path::Path;

use anyhow::Result;
use taxi_install_core::InstallError;

use crate::exposure::remove_exposed_launcher;
use crate::fs_utils::remove_file_if_exists;
use crate::receipts::read_install_receipt;
use crate::{InstallLayout, UninstallResult, UninstallStatus};

/// Removes the link, launcher, artifact and receipt. The link is only removed
/// when it still points at this layout's launcher; a foreign link is reported
/// and left alone. Directories stay.
pub fn uninstall(layout: &InstallLayout) -> Result<UninstallResult> {
    let layout = &layout.absolute()?;
    let version = match read_install_receipt(layout) {
        Ok(receipt) => receipt.map(|receipt| receipt.version),
        Err(err) => {
            log::warn!("ignoring unreadable install receipt: {err:#}");
            None
        }
    };

    let mut removed = Vec::new();
    let mut foreign_link = None;

    if remove_exposed_launcher(layout)? {
        removed.push(layout.link_path());
    } else if std::fs::symlink_metadata(layout.link_path()).is_ok() {
        foreign_link = Some(layout.link_path());
    }

    for path in [
        layout.launcher_path(),
        layout.artifact_path(),
        layout.receipt_path(),
    ] {
        if remove_existing(&path)? {
            removed.push(path);
        }
    }

    let status = if removed.is_empty() {
        UninstallStatus::NotInstalled
    } else {
        UninstallStatus::Uninstalled
    };
    log::info!("uninstall removed {} entries", removed.len());

    Ok(UninstallResult {
        status,
        version,
        removed,
        foreign_link,
    })
}

fn remove_existing(path: &Path) -> Result<bool> {
    if std::fs::symlink_metadata(path).is_err() {
        return Ok(false);
    }
    remove_file_if_exists(path).map_err(|err| InstallError::filesystem("remove", path, err))?;
    Ok(true)
}
