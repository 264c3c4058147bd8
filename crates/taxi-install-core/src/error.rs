use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Root causes an install run can fail with.
///
/// Callers propagate these inside `anyhow::Error` and recover the category with
/// `downcast_ref` when choosing an exit status.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("{message}")]
    Parse { message: String },

    #[error("failed to {action} {}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl InstallError {
    pub fn network<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn filesystem(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
