mod config;
mod error;
mod release;

pub use config::{
    ConfigFile, InstallerConfig, DEFAULT_ARTIFACT_FILE_NAME, DEFAULT_DOWNLOAD_URL_TEMPLATE,
    DEFAULT_LAUNCHER_NAME, DEFAULT_METADATA_URL, DEFAULT_RUNTIME_COMMAND, VERSION_PLACEHOLDER,
};
pub use error::InstallError;
pub use release::{ReleaseMetadata, ReleaseVersion};

#[cfg(test)]
mod tests;
