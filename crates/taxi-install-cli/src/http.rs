use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use taxi_install_core::InstallError;

pub(crate) const USER_AGENT: &str = concat!("taxi-install/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A response body that is read incrementally.
pub(crate) struct HttpBody {
    pub(crate) content_length: Option<u64>,
    pub(crate) reader: Box<dyn Read>,
}

/// The two request shapes an install needs. Implementations must turn non-2xx
/// responses into [`InstallError::HttpStatus`].
pub(crate) trait HttpClient {
    fn get_text(&self, url: &str) -> Result<String>;

    fn get_stream(&self, url: &str) -> Result<HttpBody>;
}

pub(crate) struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub(crate) fn new() -> Result<Self> {
        // No overall timeout: artifact downloads can legitimately take minutes.
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(None)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    fn send(&self, url: &str) -> Result<Response> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| InstallError::network(url, err.to_string()))?;

        let status = response.status();
        log::debug!("GET {url} -> {status}");
        if !status.is_success() {
            return Err(InstallError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        Ok(response)
    }
}

impl HttpClient for ReqwestHttpClient {
    fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url)?;
        let body = response
            .text()
            .map_err(|err| InstallError::network(url, err.to_string()))?;
        Ok(body)
    }

    fn get_stream(&self, url: &str) -> Result<HttpBody> {
        let response = self.send(url)?;
        Ok(HttpBody {
            content_length: response.content_length(),
            reader: Box::new(response),
        })
    }
}
