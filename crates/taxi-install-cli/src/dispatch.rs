use std::path::PathBuf;

use anyhow::Result;
use taxi_install_core::{ConfigFile, InstallError, InstallerConfig};
use taxi_installer::{absolute_path, default_user_home};

use crate::completion::write_completions_script;
use crate::flows::{run_install, run_status, run_uninstall};
use crate::http::ReqwestHttpClient;
use crate::render::{resolve_output_style, TerminalRenderer};
use crate::{Cli, Commands, GlobalOptions};

pub(crate) const CONFIG_ENV: &str = "TAXI_INSTALL_CONFIG";

pub(crate) const EXIT_FAILURE: u8 = 1;
pub(crate) const EXIT_NETWORK: u8 = 2;
pub(crate) const EXIT_PARSE: u8 = 3;
pub(crate) const EXIT_FILESYSTEM: u8 = 4;

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    let renderer = TerminalRenderer::from_style(resolve_output_style(cli.options.plain));

    match cli.command.unwrap_or(Commands::Install { version: None }) {
        Commands::Install { version } => {
            let config = build_config(&cli.options)?;
            let client = ReqwestHttpClient::new()?;
            run_install(&config, &client, renderer, version.as_deref())?;
        }
        Commands::Status { check_latest } => {
            let config = build_config(&cli.options)?;
            let client = ReqwestHttpClient::new()?;
            run_status(&config, &client, renderer, check_latest)?;
        }
        Commands::Uninstall => {
            let config = build_config(&cli.options)?;
            run_uninstall(&config, renderer)?;
        }
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout().lock();
            write_completions_script(shell, &mut stdout)?;
        }
    }

    Ok(())
}

/// Defaults for the user's home, then the config file, then flags. Relative
/// directories end up absolute against the current directory.
pub(crate) fn build_config(options: &GlobalOptions) -> Result<InstallerConfig> {
    let home = match &options.home {
        Some(home) => home.clone(),
        None => default_user_home()?,
    };
    let home = absolute_path(&home)?;
    let mut config = InstallerConfig::for_home(&home);

    let config_path = options
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = config_path {
        log::debug!("loading installer config {}", path.display());
        config.apply_file(&home, ConfigFile::load(&path)?);
    }

    if let Some(url) = &options.metadata_url {
        config.metadata_url = url.clone();
    }
    if let Some(template) = &options.download_url {
        config.download_url_template = template.clone();
    }
    if let Some(dir) = &options.install_dir {
        config.install_dir = dir.clone();
    }
    if let Some(dir) = &options.bin_dir {
        config.bin_dir = dir.clone();
    }
    if let Some(runtime) = &options.runtime {
        config.runtime_command = runtime.clone();
    }

    config.install_dir = absolute_path(&config.install_dir)?;
    config.bin_dir = absolute_path(&config.bin_dir)?;

    config.validate()?;
    log::debug!("resolved installer config: {config:?}");
    Ok(config)
}

/// Picks the exit status from the first typed error in the chain.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(install_err) = cause.downcast_ref::<InstallError>() {
            return match install_err {
                InstallError::Network { .. } | InstallError::HttpStatus { .. } => EXIT_NETWORK,
                InstallError::Parse { .. } => EXIT_PARSE,
                InstallError::Filesystem { .. } => EXIT_FILESYSTEM,
                InstallError::Config { .. } => EXIT_FAILURE,
            };
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return EXIT_FILESYSTEM;
        }
    }
    EXIT_FAILURE
}

pub(crate) fn format_error_report(err: &anyhow::Error) -> Vec<String> {
    let mut lines = vec![format!("error: {err}")];
    for cause in err.chain().skip(1) {
        lines.push(format!("  caused by: {cause}"));
    }
    lines
}
