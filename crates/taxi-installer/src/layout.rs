use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use taxi_install_core::{InstallError, InstallerConfig};

const RECEIPT_FILE_NAME: &str = "install.receipt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    install_dir: PathBuf,
    bin_dir: PathBuf,
    launcher_name: String,
    artifact_file_name: String,
}

impl InstallLayout {
    pub fn new(
        install_dir: impl Into<PathBuf>,
        bin_dir: impl Into<PathBuf>,
        launcher_name: impl Into<String>,
        artifact_file_name: impl Into<String>,
    ) -> Self {
        Self {
            install_dir: install_dir.into(),
            bin_dir: bin_dir.into(),
            launcher_name: launcher_name.into(),
            artifact_file_name: artifact_file_name.into(),
        }
    }

    pub fn from_config(config: &InstallerConfig) -> Self {
        Self::new(
            config.install_dir.clone(),
            config.bin_dir.clone(),
            config.launcher_name.clone(),
            config.artifact_file_name.clone(),
        )
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn launcher_name(&self) -> &str {
        &self.launcher_name
    }

    pub fn launcher_path(&self) -> PathBuf {
        self.install_dir.join(&self.launcher_name)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.install_dir.join(&self.artifact_file_name)
    }

    pub fn link_path(&self) -> PathBuf {
        self.bin_dir.join(&self.launcher_name)
    }

    pub fn receipt_path(&self) -> PathBuf {
        self.install_dir.join(RECEIPT_FILE_NAME)
    }

    /// Copy of this layout with both directories resolved against the
    /// current directory. Symlink targets and launcher contents are taken from
    /// these paths, so they must not depend on where the installer ran.
    pub fn absolute(&self) -> Result<Self> {
        Ok(Self {
            install_dir: absolute_path(&self.install_dir)?,
            bin_dir: absolute_path(&self.bin_dir)?,
            launcher_name: self.launcher_name.clone(),
            artifact_file_name: self.artifact_file_name.clone(),
        })
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [self.install_dir.as_path(), self.bin_dir.as_path()] {
            fs::create_dir_all(dir)
                .map_err(|err| InstallError::filesystem("create directory", dir, err))?;
        }
        Ok(())
    }
}

pub fn default_user_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set; cannot resolve install directory")?;
    if home.trim().is_empty() {
        return Err(InstallError::config("HOME is empty; cannot resolve install directory").into());
    }
    Ok(PathBuf::from(home))
}

/// Makes `path` absolute against the current directory and folds `.` and `..`
/// components lexically.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)
        .map_err(|err| InstallError::filesystem("resolve", path, err))?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
