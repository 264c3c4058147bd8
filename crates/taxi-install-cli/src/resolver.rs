use anyhow::{Context, Result};
use taxi_install_core::{ReleaseMetadata, ReleaseVersion};

use crate::http::HttpClient;

pub(crate) fn fetch_release_metadata(
    client: &dyn HttpClient,
    metadata_url: &str,
) -> Result<ReleaseMetadata> {
    let body = client.get_text(metadata_url)?;
    let metadata = ReleaseMetadata::from_json_str(&body)
        .with_context(|| format!("failed to read release metadata from {metadata_url}"))?;
    Ok(metadata)
}

pub(crate) fn resolve_latest_version(
    client: &dyn HttpClient,
    metadata_url: &str,
) -> Result<ReleaseVersion> {
    let metadata = fetch_release_metadata(client, metadata_url)?;
    let version = metadata
        .latest()
        .with_context(|| format!("metadata from {metadata_url} has an unusable latest_version"))?;
    log::info!("latest release is {version}");
    Ok(version)
}

/// Uses `requested` when given, otherwise asks the metadata endpoint.
pub(crate) fn resolve_target_version(
    client: &dyn HttpClient,
    metadata_url: &str,
    requested: Option<&str>,
) -> Result<ReleaseVersion> {
    match requested {
        Some(raw) => {
            let version = ReleaseVersion::parse(raw)
                .with_context(|| format!("invalid --version value '{raw}'"))?;
            Ok(version)
        }
        None => resolve_latest_version(client, metadata_url),
    }
}
