// # IP Source Trait
//
// Defines the interface for discovering the machine's current public
// address.
//
// ## Implementations
//
// - HTTP IP-echo service: `ddns-ip-http` crate

use async_trait::async_trait;
use std::fmt;

/// The external address as reported by an IP-echo service.
///
/// Holds the raw text with one trailing line terminator removed. The value
/// is deliberately not parsed: whatever the service returned is compared
/// and, if it differs, written to the record verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicIp(String);

impl PublicIp {
    /// Wrap an already-clean address string
    pub fn new(ip: impl Into<String>) -> Self {
        Self(ip.into())
    }

    /// Build from a response body, stripping exactly one trailing `\n` or `\r\n`
    pub fn from_response_body(body: &str) -> Self {
        let trimmed = body
            .strip_suffix("\r\n")
            .or_else(|| body.strip_suffix('\n'))
            .unwrap_or(body);
        Self(trimmed.to_string())
    }

    /// The address text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for PublicIp {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Trait for IP source implementations
///
/// An IP source is queried once per run. It must not retry or fall back to
/// another service; a failure is returned to the caller as-is.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address
    async fn current(&self) -> Result<PublicIp, crate::Error>;

    /// A short description of where the address comes from (for logging)
    fn describe(&self) -> String;
}
