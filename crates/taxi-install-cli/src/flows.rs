use std::ffi::OsString;
use std::path::Path;

use anyhow::Result;
use taxi_install_core::{InstallerConfig, ReleaseVersion};
use taxi_installer::{
    inspect_install, install_artifact, uninstall, ArtifactInstall, InstallLayout,
    InstallOutcome, InstallState, UninstallResult, UninstallStatus,
};

use crate::download::{download_to_file, DownloadDir};
use crate::http::HttpClient;
use crate::render::TerminalRenderer;
use crate::resolver::{resolve_latest_version, resolve_target_version};

pub(crate) fn run_install(
    config: &InstallerConfig,
    client: &dyn HttpClient,
    renderer: TerminalRenderer,
    requested_version: Option<&str>,
) -> Result<InstallOutcome> {
    renderer.print_status("step", "Installing taxi-cli...");

    let version = resolve_target_version(client, &config.metadata_url, requested_version)?;
    if requested_version.is_some() {
        renderer.print_status("step", &format!("Requested version is v{version}"));
    } else {
        renderer.print_status("step", &format!("The latest version is v{version}"));
    }

    let url = config.download_url(&version);
    let download_dir = DownloadDir::create()?;
    let download_path = download_dir.path().join(&config.artifact_file_name);
    renderer.print_status("step", &format!("Downloading {}", download_path.display()));
    log::info!("downloading {url}");

    let mut progress = renderer.start_download();
    let summary = match download_to_file(client, &url, &download_path, |downloaded, total| {
        progress.update(downloaded, total)
    }) {
        Ok(summary) => summary,
        Err(err) => {
            progress.abandon();
            return Err(err);
        }
    };
    if let Some(line) = progress.finish() {
        renderer.print_status("ok", &line);
    }

    let layout = InstallLayout::from_config(config);
    let outcome = install_artifact(
        &layout,
        &summary.path,
        &ArtifactInstall {
            version: &version,
            artifact_url: &url,
            artifact_sha256: Some(&summary.sha256),
            runtime_command: &config.runtime_command,
        },
    )?;
    drop(download_dir);

    renderer.print_status(
        "ok",
        &format!(
            "Taxi installed at {} and linked from {}",
            outcome.artifact_path.display(),
            outcome.link_path.display()
        ),
    );
    if !dir_on_path(layout.bin_dir(), std::env::var_os("PATH")) {
        renderer.print_status(
            "warn",
            &format!(
                "{} is not on PATH; add it to run '{}' directly",
                layout.bin_dir().display(),
                layout.launcher_name()
            ),
        );
    }

    Ok(outcome)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StatusReport {
    pub(crate) state: InstallState,
    pub(crate) latest: Option<ReleaseVersion>,
}

pub(crate) fn run_status(
    config: &InstallerConfig,
    client: &dyn HttpClient,
    renderer: TerminalRenderer,
    check_latest: bool,
) -> Result<StatusReport> {
    let layout = InstallLayout::from_config(config);
    let state = inspect_install(&layout)?;
    let latest = if check_latest {
        Some(resolve_latest_version(client, &config.metadata_url)?)
    } else {
        None
    };

    let report = StatusReport { state, latest };
    renderer.print_lines(&format_status_lines(&report));
    Ok(report)
}

pub(crate) fn format_status_lines(report: &StatusReport) -> Vec<String> {
    let state = &report.state;
    let mut lines = Vec::new();

    let installed_version = state.receipt.as_ref().map(|receipt| receipt.version.clone());
    match (&installed_version, state.is_installed()) {
        (Some(version), true) => lines.push(format!("installed: v{version}")),
        (Some(version), false) => lines.push(format!("installed: v{version} (incomplete)")),
        (None, true) => lines.push("installed: unknown version (no receipt)".to_string()),
        (None, false) => lines.push("installed: no".to_string()),
    }

    lines.push(format!(
        "launcher: {} ({})",
        state.launcher_path.display(),
        match (state.launcher_present, state.launcher_executable) {
            (false, _) => "missing",
            (true, false) => "not executable",
            (true, true) => "ok",
        }
    ));
    lines.push(match &state.link_target {
        Some(target) if state.link_points_to_launcher => {
            format!("link: {} -> {}", state.link_path.display(), target.display())
        }
        Some(target) => format!(
            "link: {} -> {} (not managed by taxi-install)",
            state.link_path.display(),
            target.display()
        ),
        None => format!("link: {} (missing)", state.link_path.display()),
    });
    lines.push(match state.artifact_size {
        Some(size) => format!("artifact: {} ({size} bytes)", state.artifact_path.display()),
        None => format!("artifact: {} (missing)", state.artifact_path.display()),
    });
    if let Some(sha256) = state
        .receipt
        .as_ref()
        .and_then(|receipt| receipt.artifact_sha256.as_deref())
    {
        lines.push(format!("sha256: {sha256}"));
    }

    if let Some(latest) = &report.latest {
        let update_available = match installed_version
            .as_deref()
            .map(ReleaseVersion::parse)
            .and_then(Result::ok)
        {
            Some(installed) => latest.is_newer_than(&installed),
            None => true,
        };
        if update_available {
            lines.push(format!("latest: v{latest} (update available)"));
        } else {
            lines.push(format!("latest: v{latest} (up to date)"));
        }
    }

    lines
}

pub(crate) fn run_uninstall(
    config: &InstallerConfig,
    renderer: TerminalRenderer,
) -> Result<UninstallResult> {
    let layout = InstallLayout::from_config(config);
    let result = uninstall(&layout)?;

    match result.status {
        UninstallStatus::NotInstalled => {
            renderer.print_status("step", "taxi-cli is not installed");
        }
        UninstallStatus::Uninstalled => {
            let label = result
                .version
                .as_deref()
                .map(|version| format!("taxi-cli v{version}"))
                .unwrap_or_else(|| "taxi-cli".to_string());
            renderer.print_status("ok", &format!("Uninstalled {label}"));
            for path in &result.removed {
                renderer.print_status("step", &format!("removed {}", path.display()));
            }
        }
    }
    if let Some(link) = &result.foreign_link {
        renderer.print_status(
            "warn",
            &format!("left {} in place: it is not managed by taxi-install", link.display()),
        );
    }

    Ok(result)
}

pub(crate) fn dir_on_path(dir: &Path, path_var: Option<OsString>) -> bool {
    let Some(path_var) = path_var else {
        return false;
    };
    std::env::split_paths(&path_var).any(|entry| entry == dir)
}
