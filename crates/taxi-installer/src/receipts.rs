use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use taxi_install_core::InstallError;

use crate::fs_utils::replace_file_atomically;
use crate::{InstallLayout, InstallReceipt};

pub fn write_install_receipt(layout: &InstallLayout, receipt: &InstallReceipt) -> Result<PathBuf> {
    let payload = serialize_receipt(receipt)?;
    let path = layout.receipt_path();
    replace_file_atomically(&path, payload.as_bytes(), |_| Ok(()))
        .with_context(|| format!("failed to write install receipt: {}", path.display()))?;
    Ok(path)
}

pub fn read_install_receipt(layout: &InstallLayout) -> Result<Option<InstallReceipt>> {
    let path = layout.receipt_path();
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(InstallError::filesystem("read", &path, err).into()),
    };
    let receipt = parse_receipt(&raw)
        .with_context(|| format!("failed to parse install receipt: {}", path.display()))?;
    Ok(Some(receipt))
}

pub fn current_unix_timestamp() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system time is before unix epoch")?
        .as_secs())
}

fn serialize_receipt(receipt: &InstallReceipt) -> Result<String> {
    let mut payload = String::new();
    push_field(&mut payload, "version", &receipt.version)?;
    if let Some(url) = &receipt.artifact_url {
        push_field(&mut payload, "artifact_url", url)?;
    }
    if let Some(sha256) = &receipt.artifact_sha256 {
        push_field(&mut payload, "artifact_sha256", sha256)?;
    }
    if let Some(size) = receipt.artifact_size {
        push_field(&mut payload, "artifact_size", &size.to_string())?;
    }
    if let Some(launcher) = &receipt.launcher {
        push_field(&mut payload, "launcher", launcher)?;
    }
    if let Some(link) = &receipt.link {
        push_field(&mut payload, "link", link)?;
    }
    push_field(
        &mut payload,
        "installed_at_unix",
        &receipt.installed_at_unix.to_string(),
    )?;
    Ok(payload)
}

fn push_field(payload: &mut String, key: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(anyhow!("receipt value for '{key}' must not contain newlines"));
    }
    payload.push_str(&format!("{key}={value}\n"));
    Ok(())
}

pub(crate) fn parse_receipt(raw: &str) -> Result<InstallReceipt> {
    let mut version = None;
    let mut artifact_url = None;
    let mut artifact_sha256 = None;
    let mut artifact_size = None;
    let mut launcher = None;
    let mut link = None;
    let mut installed_at_unix = None;

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };
        match k {
            "version" => version = Some(v.to_string()),
            "artifact_url" => artifact_url = Some(v.to_string()),
            "artifact_sha256" => artifact_sha256 = Some(v.to_string()),
            "artifact_size" => {
                artifact_size = Some(v.parse().context("artifact_size must be u64")?)
            }
            "launcher" => launcher = Some(v.to_string()),
            "link" => link = Some(v.to_string()),
            "installed_at_unix" => {
                installed_at_unix = Some(v.parse().context("installed_at_unix must be u64")?)
            }
            _ => {}
        }
    }

    Ok(InstallReceipt {
        version: version.context("missing version")?,
        artifact_url,
        artifact_sha256,
        artifact_size,
        launcher,
        link,
        installed_at_unix: installed_at_unix.context("missing installed_at_unix")?,
    })
}
