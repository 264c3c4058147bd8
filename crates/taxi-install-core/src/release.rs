use std::fmt;
use std::str::FromStr;

use semver::Version;
use serde::Deserialize;

use crate::InstallError;

/// Package record returned by the metadata endpoint. Only `latest_version` is
/// required; everything else the service sends is ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReleaseMetadata {
    pub latest_version: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

impl ReleaseMetadata {
    pub fn from_json_str(input: &str) -> Result<Self, InstallError> {
        serde_json::from_str(input)
            .map_err(|err| InstallError::parse(format!("invalid release metadata: {err}")))
    }

    pub fn latest(&self) -> Result<ReleaseVersion, InstallError> {
        ReleaseVersion::parse(&self.latest_version)
    }
}

/// A version identifier that is safe to splice into a download URL and a file
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    pub fn parse(raw: &str) -> Result<Self, InstallError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InstallError::parse("release version must not be empty"));
        }
        if trimmed == "." || trimmed == ".." {
            return Err(InstallError::parse(format!(
                "release version is not a valid identifier: {trimmed}"
            )));
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '+' | '_')))
        {
            return Err(InstallError::parse(format!(
                "release version '{trimmed}' contains invalid character '{ch}'"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn semver(&self) -> Option<Version> {
        Version::parse(self.0.trim_start_matches('v')).ok()
    }

    /// Semver ordering when both sides parse, plain inequality otherwise.
    pub fn is_newer_than(&self, installed: &ReleaseVersion) -> bool {
        match (self.semver(), installed.semver()) {
            (Some(candidate), Some(current)) => candidate > current,
            _ => self != installed,
        }
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReleaseVersion {
    type Err = InstallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
