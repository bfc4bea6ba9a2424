//! Configuration types for the DDNS synchronizer
//!
//! These are plain values built once at startup (the binary reads them from
//! the environment) and handed to the components that need them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default IP-echo endpoint (plain-text body, one address per response)
pub const DEFAULT_IP_ECHO_URL: &str = "https://ifconfig.co/ip";

/// Fixed timeout for the public IP probe
pub const IP_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A configured hostname split into record label and parent zone.
///
/// `"home.example.com"` becomes label `"home"` in zone `"example.com"`.
/// The split happens on the first `.` only, so deeper names keep the rest
/// in the zone part (`"a.b.example.com"` → `"a"` in `"b.example.com"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostnameSpec {
    subdomain_label: String,
    parent_zone: String,
}

impl HostnameSpec {
    /// Split a fully-qualified hostname on its first separator
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)`: the hostname contains no `.`
    pub fn parse(hostname: &str) -> Result<Self, crate::Error> {
        let (label, zone) = hostname.split_once('.').ok_or_else(|| {
            crate::Error::config(format!(
                "hostname '{}' must contain a '.' separating record name and zone",
                hostname
            ))
        })?;

        Ok(Self {
            subdomain_label: label.to_string(),
            parent_zone: zone.to_string(),
        })
    }

    /// The record name within the zone ("" addresses the zone apex)
    pub fn subdomain_label(&self) -> &str {
        &self.subdomain_label
    }

    /// The zone's domain name
    pub fn parent_zone(&self) -> &str {
        &self.parent_zone
    }
}

impl FromStr for HostnameSpec {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HostnameSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.subdomain_label, self.parent_zone)
    }
}

/// DNS provider configuration
#[derive(Clone)]
pub struct ProviderConfig {
    /// API token used as a bearer credential
    /// ⚠️ NEVER log this value
    pub api_token: String,
    /// API base URL override (provider default when `None`)
    pub api_url: Option<String>,
    /// Log every request and response
    pub debug: bool,
    /// Perform reads but only log the intended update
    pub dry_run: bool,
}

impl ProviderConfig {
    /// Configuration with only the token set
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            api_url: None,
            debug: false,
            dry_run: false,
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.trim().is_empty() {
            return Err(crate::Error::config("API token cannot be empty"));
        }
        if let Some(url) = &self.api_url {
            validate_http_url(url, "API URL")?;
        }
        Ok(())
    }
}

// Custom Debug implementation that hides the API token
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<REDACTED>")
            .field("api_url", &self.api_url)
            .field("debug", &self.debug)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Public IP probe configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSourceConfig {
    /// IP-echo endpoint
    pub url: String,
    /// Skip TLS certificate verification for the probe
    pub accept_invalid_certs: bool,
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_http_url(&self.url, "IP echo URL")
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_IP_ECHO_URL.to_string(),
            accept_invalid_certs: false,
        }
    }
}

/// Everything one synchronization run needs
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// The record to keep in sync
    pub hostname: HostnameSpec,
    /// DNS provider settings
    pub provider: ProviderConfig,
    /// Public IP probe settings
    pub ip_source: IpSourceConfig,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.ip_source.validate()?;
        Ok(())
    }
}

fn validate_http_url(url: &str, what: &str) -> Result<(), crate::Error> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}
