use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod completion;
mod dispatch;
mod download;
mod flows;
mod http;
mod render;
mod resolver;

use completion::CliCompletionShell;
use dispatch::{exit_code_for, format_error_report, run_cli};

const LOG_ENV: &str = "TAXI_INSTALL_LOG";

#[derive(Parser, Debug)]
#[command(name = "taxi-install", version)]
#[command(about = "Install the taxi command line tools into your home directory", long_about = None)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Debug, Default)]
struct GlobalOptions {
    /// TOML file overlaying the default configuration
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Home directory the default layout is derived from
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,
    #[arg(long, global = true, value_name = "DIR")]
    install_dir: Option<PathBuf>,
    #[arg(long, global = true, value_name = "DIR")]
    bin_dir: Option<PathBuf>,
    #[arg(long, global = true, value_name = "URL")]
    metadata_url: Option<String>,
    /// Download URL with {version} placeholders
    #[arg(long, global = true, value_name = "TEMPLATE")]
    download_url: Option<String>,
    /// Command the launcher runs the artifact with
    #[arg(long, global = true, value_name = "CMD")]
    runtime: Option<String>,
    /// Disable colors and animated progress
    #[arg(long, global = true)]
    plain: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// Download and install taxi-cli (the default)
    Install {
        /// Install this version instead of the latest
        #[arg(long)]
        version: Option<String>,
    },
    /// Show what is installed
    Status {
        /// Also ask the metadata endpoint for the latest version
        #[arg(long)]
        check_latest: bool,
    },
    /// Remove the launcher, link, artifact and receipt
    Uninstall,
    /// Print a shell completion script
    Completions { shell: CliCompletionShell },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, "warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("install failed: {err:?}");
            for line in format_error_report(&err) {
                eprintln!("{line}");
            }
            ExitCode::from(exit_code_for(&err))
        }
    }
}
