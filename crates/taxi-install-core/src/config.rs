use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{InstallError, ReleaseVersion};

pub const DEFAULT_METADATA_URL: &str = "https://api.bintray.com/packages/taxi-lang/releases/taxi-cli";
pub const DEFAULT_DOWNLOAD_URL_TEMPLATE: &str = "https://bintray.com/taxi-lang/releases/download_file?file_path=lang%2Ftaxi%2Ftaxi-cli%2F{version}%2Ftaxi-cli-{version}.jar";
pub const DEFAULT_RUNTIME_COMMAND: &str = "java -jar";
pub const DEFAULT_LAUNCHER_NAME: &str = "taxi";
pub const DEFAULT_ARTIFACT_FILE_NAME: &str = "taxi-cli.jar";
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Everything an install run needs to know about where to fetch from and where
/// to put things.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    pub metadata_url: String,
    pub download_url_template: String,
    pub install_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub runtime_command: String,
    pub launcher_name: String,
    pub artifact_file_name: String,
}

impl InstallerConfig {
    pub fn for_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref();
        Self {
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            download_url_template: DEFAULT_DOWNLOAD_URL_TEMPLATE.to_string(),
            install_dir: home.join(".taxi"),
            bin_dir: home.join("bin"),
            runtime_command: DEFAULT_RUNTIME_COMMAND.to_string(),
            launcher_name: DEFAULT_LAUNCHER_NAME.to_string(),
            artifact_file_name: DEFAULT_ARTIFACT_FILE_NAME.to_string(),
        }
    }

    /// Overlays the values set in `file`. Relative directories are taken
    /// relative to `home`.
    pub fn apply_file(&mut self, home: &Path, file: ConfigFile) {
        if let Some(url) = file.metadata_url {
            self.metadata_url = url;
        }
        if let Some(template) = file.download_url_template {
            self.download_url_template = template;
        }
        if let Some(dir) = file.install_dir {
            self.install_dir = resolve_against(home, dir);
        }
        if let Some(dir) = file.bin_dir {
            self.bin_dir = resolve_against(home, dir);
        }
        if let Some(runtime) = file.runtime_command {
            self.runtime_command = runtime;
        }
        if let Some(name) = file.launcher_name {
            self.launcher_name = name;
        }
        if let Some(name) = file.artifact_file_name {
            self.artifact_file_name = name;
        }
    }

    pub fn download_url(&self, version: &ReleaseVersion) -> String {
        self.download_url_template
            .replace(VERSION_PLACEHOLDER, version.as_str())
    }

    pub fn validate(&self) -> Result<(), InstallError> {
        if self.metadata_url.trim().is_empty() {
            return Err(InstallError::config("metadata_url must not be empty"));
        }
        if !self.download_url_template.contains(VERSION_PLACEHOLDER) {
            return Err(InstallError::config(format!(
                "download_url_template must contain {VERSION_PLACEHOLDER}: {}",
                self.download_url_template
            )));
        }
        let runtime = self.runtime_command.trim();
        if runtime.is_empty() {
            return Err(InstallError::config("runtime_command must not be empty"));
        }
        if runtime.contains(['\n', '\r']) {
            return Err(InstallError::config(
                "runtime_command must be a single line",
            ));
        }
        validate_file_name("launcher_name", &self.launcher_name)?;
        validate_file_name("artifact_file_name", &self.artifact_file_name)?;
        if self.launcher_name == self.artifact_file_name {
            return Err(InstallError::config(
                "launcher_name and artifact_file_name must differ",
            ));
        }
        Ok(())
    }
}

/// On-disk overlay for [`InstallerConfig`]. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub metadata_url: Option<String>,
    pub download_url_template: Option<String>,
    pub install_dir: Option<PathBuf>,
    pub bin_dir: Option<PathBuf>,
    pub runtime_command: Option<String>,
    pub launcher_name: Option<String>,
    pub artifact_file_name: Option<String>,
}

impl ConfigFile {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input)
            .map_err(|err| InstallError::config(err.to_string()))
            .context("failed to parse installer config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| InstallError::filesystem("read config file", path, err))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("failed to load installer config: {}", path.display()))
    }
}

fn resolve_against(home: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        home.join(dir)
    }
}

fn validate_file_name(field: &str, value: &str) -> Result<(), InstallError> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !value.contains(['/', '\\']) => Ok(()),
        _ => Err(InstallError::config(format!(
            "{field} must be a plain file name: '{value}'"
        ))),
    }
}
