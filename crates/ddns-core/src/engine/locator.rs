//! Zone/record lookup
//!
//! Finds the record a [`HostnameSpec`] refers to by walking the provider's
//! zone listing and then the matching zone's record listing. Both scans
//! use a first-match policy in listing order with exact, case-sensitive
//! name comparison.

use crate::config::HostnameSpec;
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, RecordId, ZoneId};
use tracing::{debug, info};

/// The record the synchronizer will compare against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub zone_id: ZoneId,
    pub record_id: RecordId,
    /// The record's target at lookup time
    pub current_target: String,
}

/// Locate the zone and record for `hostname`
///
/// Provider errors propagate unchanged. When no zone matches the parent
/// zone, or the first matching zone has no record with the label, the
/// result is [`Error::NotFound`] with the fixed
/// [`NOT_FOUND_MESSAGE`](crate::error::NOT_FOUND_MESSAGE).
pub async fn locate(hostname: &HostnameSpec, provider: &dyn DnsProvider) -> Result<ResolvedTarget> {
    let zones = provider.list_zones().await?;
    debug!("{} listed {} zone(s)", provider.provider_name(), zones.len());

    let Some(zone) = zones.iter().find(|z| z.domain == hostname.parent_zone()) else {
        debug!("No zone named '{}'", hostname.parent_zone());
        return Err(Error::domain_not_found());
    };

    let records = provider.list_records(zone.id).await?;
    debug!("Zone {} ({}) has {} record(s)", zone.domain, zone.id, records.len());

    let Some(record) = records
        .iter()
        .find(|r| r.name == hostname.subdomain_label())
    else {
        debug!(
            "Zone '{}' has no record named '{}'",
            zone.domain,
            hostname.subdomain_label()
        );
        return Err(Error::domain_not_found());
    };

    info!(
        "Found subdomain: {} with existing IP of: {}",
        record.name, record.target
    );

    Ok(ResolvedTarget {
        zone_id: zone.id,
        record_id: record.id,
        current_target: record.target.clone(),
    })
}
