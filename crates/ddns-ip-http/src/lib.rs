// # HTTP IP Source
//
// This crate provides the public IP probe for the DDNS synchronizer.
//
// ## Architecture
//
// Fetches the current address from an external IP-echo service
// (default: https://ifconfig.co/ip) with a single GET per run. The
// response body is used verbatim apart from one trailing line terminator.
//
// ## Trust
//
// The echo service decides which address the record is pointed at. TLS
// certificates are verified unless the operator explicitly opts out.

use ddns_core::config::{IP_PROBE_TIMEOUT, IpSourceConfig};
use ddns_core::traits::{IpSource, PublicIp};
use ddns_core::{Error, Result};

use std::time::Duration;

/// HTTP-based IP source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source with the fixed probe timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://ifconfig.co/ip")
    /// - `accept_invalid_certs`: skip TLS certificate verification
    pub fn new(url: impl Into<String>, accept_invalid_certs: bool) -> Result<Self> {
        Self::with_timeout(url, accept_invalid_certs, IP_PROBE_TIMEOUT)
    }

    /// Create with a custom timeout
    pub fn with_timeout(
        url: impl Into<String>,
        accept_invalid_certs: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let url = url.into();

        if accept_invalid_certs {
            tracing::warn!(
                "TLS certificate verification disabled for IP probe ({})",
                url
            );
        }
        if url.starts_with("http://") {
            tracing::warn!("IP probe uses HTTP (not HTTPS): {}", url);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { url, client })
    }

    /// Create an IP source from configuration
    pub fn from_config(config: &IpSourceConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.url.clone(), config.accept_invalid_certs)
    }

    /// Fetch current IP from HTTP service
    async fn fetch_ip(&self) -> Result<PublicIp> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "text/plain")
            .send()
            .await
            .map_err(|e| Error::network(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "HTTP error from {}: {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        Ok(PublicIp::from_response_body(&body))
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<PublicIp> {
        let ip = self.fetch_ip().await?;
        tracing::debug!("Public IP from {}: {}", self.url, ip);
        Ok(ip)
    }

    fn describe(&self) -> String {
        format!("IP echo service {}", self.url)
    }
}
