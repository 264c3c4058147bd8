use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use taxi_install_core::InstallError;

use crate::exposure::expose_launcher;
use crate::fs_utils::move_file;
use crate::launcher::write_launcher;
use crate::receipts::{current_unix_timestamp, write_install_receipt};
use crate::{ArtifactInstall, InstallLayout, InstallOutcome, InstallReceipt};

/// Installs an already downloaded artifact: writes the launcher, links it from
/// the bin directory and moves the artifact into place. Each step replaces
/// what a previous run left behind. A failure part way leaves earlier steps in
/// place.
pub fn install_artifact(
    layout: &InstallLayout,
    downloaded: &Path,
    request: &ArtifactInstall<'_>,
) -> Result<InstallOutcome> {
    log::info!(
        "installing {} from {}",
        request.version,
        downloaded.display()
    );
    let layout = &layout.absolute()?;
    layout.ensure_base_dirs()?;

    let launcher_path = write_launcher(layout, request.runtime_command)?;
    let link_path = expose_launcher(layout)?;

    let artifact_path = layout.artifact_path();
    move_file(downloaded, &artifact_path).with_context(|| {
        format!(
            "failed to move {} into {}",
            downloaded.display(),
            artifact_path.display()
        )
    })?;
    let artifact_size = fs::metadata(&artifact_path)
        .map_err(|err| InstallError::filesystem("inspect", &artifact_path, err))?
        .len();

    let receipt = InstallReceipt {
        version: request.version.to_string(),
        artifact_url: Some(request.artifact_url.to_string()),
        artifact_sha256: request.artifact_sha256.map(str::to_string),
        artifact_size: Some(artifact_size),
        launcher: Some(launcher_path.display().to_string()),
        link: Some(link_path.display().to_string()),
        installed_at_unix: current_unix_timestamp()?,
    };
    let receipt_path = write_install_receipt(layout, &receipt)?;

    Ok(InstallOutcome {
        version: receipt.version,
        launcher_path,
        link_path,
        artifact_path,
        artifact_size,
        receipt_path,
    })
}
