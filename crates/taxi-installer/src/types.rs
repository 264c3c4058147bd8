use std::path::PathBuf;

use taxi_install_core::ReleaseVersion;

/// What the installer needs to know about an artifact that has already been
/// downloaded.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactInstall<'a> {
    pub version: &'a ReleaseVersion,
    pub artifact_url: &'a str,
    pub artifact_sha256: Option<&'a str>,
    pub runtime_command: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub version: String,
    pub launcher_path: PathBuf,
    pub link_path: PathBuf,
    pub artifact_path: PathBuf,
    pub artifact_size: u64,
    pub receipt_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReceipt {
    pub version: String,
    pub artifact_url: Option<String>,
    pub artifact_sha256: Option<String>,
    pub artifact_size: Option<u64>,
    pub launcher: Option<String>,
    pub link: Option<String>,
    pub installed_at_unix: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallState {
    pub launcher_path: PathBuf,
    pub launcher_present: bool,
    pub launcher_executable: bool,
    pub link_path: PathBuf,
    pub link_target: Option<PathBuf>,
    pub link_points_to_launcher: bool,
    pub artifact_path: PathBuf,
    pub artifact_size: Option<u64>,
    pub receipt: Option<InstallReceipt>,
}

impl InstallState {
    pub fn is_installed(&self) -> bool {
        self.launcher_present && self.link_points_to_launcher && self.artifact_size.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallStatus {
    NotInstalled,
    Uninstalled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallResult {
    pub status: UninstallStatus,
    pub version: Option<String>,
    pub removed: Vec<PathBuf>,
    pub foreign_link: Option<PathBuf>,
}
