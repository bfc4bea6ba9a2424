//! Compare-and-update decision
//!
//! The only write the synchronizer ever performs happens here, and only
//! when the record's target differs from the current public IP.

use super::locator::ResolvedTarget;
use crate::config::HostnameSpec;
use crate::error::Result;
use crate::traits::{DnsProvider, PublicIp, RecordUpdate};
use tracing::info;

/// Result of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record already points at the current IP; nothing was written
    NoChangeNeeded {
        /// The record's (unchanged) target
        current_target: String,
    },
    /// The record was rewritten
    Updated {
        /// Record name as returned by the provider
        name: String,
        /// New target as returned by the provider
        target: String,
    },
}

impl UpdateOutcome {
    /// Whether a write was issued
    pub fn is_update(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Bring the located record in line with `public_ip`
///
/// Equality is plain string comparison. On drift, exactly one
/// `update_record` call is made with an `A` record named after the
/// hostname's label. A failed update is returned as-is.
pub async fn reconcile(
    target: &ResolvedTarget,
    hostname: &HostnameSpec,
    public_ip: &PublicIp,
    provider: &dyn DnsProvider,
) -> Result<UpdateOutcome> {
    if *public_ip == *target.current_target {
        info!("External IP already in sync, skipping update.");
        return Ok(UpdateOutcome::NoChangeNeeded {
            current_target: target.current_target.clone(),
        });
    }

    info!(
        "External IP {} is not in sync with remote IP {}, updating",
        public_ip, target.current_target
    );

    let update = RecordUpdate::address(hostname.subdomain_label(), public_ip.as_str());
    let record = provider
        .update_record(target.zone_id, target.record_id, update)
        .await?;

    info!("Domain {} updated successfully to {}", record.name, record.target);

    Ok(UpdateOutcome::Updated {
        name: record.name,
        target: record.target,
    })
}
