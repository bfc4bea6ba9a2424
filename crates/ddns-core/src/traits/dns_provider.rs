// # DNS Provider Trait
//
// Defines the narrow slice of a DNS provider API the synchronizer consumes:
// zone listing, record listing, record creation and record update.
//
// ## Implementations
//
// - Linode: `ddns-provider-linode` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// let zones = provider.list_zones().await?;
// let records = provider.list_records(zones[0].id).await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned identifier of a DNS zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u64);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-assigned identifier of a record within a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A DNS zone owned by the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// The zone ID
    pub id: ZoneId,
    /// The zone's domain name (e.g. "example.com")
    pub domain: String,
}

/// One DNS record within a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The record ID
    pub id: RecordId,
    /// Record name relative to the zone ("" for the apex)
    pub name: String,
    /// Record type (A, AAAA, CNAME, ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// The record target (an address for A/AAAA records)
    pub target: String,
}

/// Replacement values sent when updating a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordUpdate {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub target: String,
}

impl RecordUpdate {
    /// An address-record update pointing `name` at `target`
    pub fn address(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            record_type: "A".to_string(),
            name: name.into(),
            target: target.into(),
        }
    }
}

/// Values for a new record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCreate {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub target: String,
    /// Time-to-live in seconds (provider default when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_sec: Option<u32>,
}

/// Trait for DNS provider implementations
///
/// Providers are thin, stateless API clients: one HTTP exchange per call
/// (plus page follow-ups for listings), no retries, no caching, and no
/// decision about whether an update is needed. That decision belongs to
/// [`crate::engine::reconciler`].
///
/// Listings must be returned in the provider's listing order; the locator
/// relies on it for its first-match policy.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every zone visible to the authenticated account
    async fn list_zones(&self) -> Result<Vec<Zone>, crate::Error>;

    /// List every record of a zone
    async fn list_records(&self, zone_id: ZoneId) -> Result<Vec<Record>, crate::Error>;

    /// Create a record in a zone
    ///
    /// Part of the client surface; reconciliation never creates records.
    async fn create_record(
        &self,
        zone_id: ZoneId,
        record: RecordCreate,
    ) -> Result<Record, crate::Error>;

    /// Replace the type, name and target of an existing record
    ///
    /// # Returns
    ///
    /// The record as stored by the provider after the update
    async fn update_record(
        &self,
        zone_id: ZoneId,
        record_id: RecordId,
        update: RecordUpdate,
    ) -> Result<Record, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
