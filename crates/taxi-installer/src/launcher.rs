use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use taxi_install_core::InstallError;

use crate::fs_utils::replace_file_atomically;
use crate::InstallLayout;

/// Paths with characters outside a conservative shell-safe set are single-quoted.
pub fn render_launcher_script(runtime_command: &str, artifact_path: &Path) -> String {
    format!(
        "#!/bin/bash\n{} {} \"$@\" \n",
        runtime_command.trim(),
        shell_word(&artifact_path.display().to_string())
    )
}

/// Grants execute permission to every class that can already read the file.
pub fn copy_read_bits_to_execute(mode: u32) -> u32 {
    mode | ((mode & 0o444) >> 2)
}

#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata =
        fs::metadata(path).map_err(|err| InstallError::filesystem("inspect", path, err))?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(copy_read_bits_to_execute(permissions.mode()));
    fs::set_permissions(path, permissions)
        .map_err(|err| InstallError::filesystem("set permissions on", path, err))?;
    Ok(())
}

#[cfg(not(unix))]
pub fn make_executable(path: &Path) -> Result<()> {
    fs::metadata(path).map_err(|err| InstallError::filesystem("inspect", path, err))?;
    Ok(())
}

pub fn write_launcher(layout: &InstallLayout, runtime_command: &str) -> Result<PathBuf> {
    let path = layout.launcher_path();
    let script = render_launcher_script(runtime_command, &layout.artifact_path());
    replace_file_atomically(&path, script.as_bytes(), make_executable)?;
    log::debug!("wrote launcher {}", path.display());
    Ok(path)
}

fn shell_word(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "/._-+:@%,=".contains(ch));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "'\\''"))
    }
}
