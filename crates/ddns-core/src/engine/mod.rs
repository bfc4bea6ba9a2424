//! One-shot synchronization engine
//!
//! The SyncEngine runs a single reconciliation pass:
//! - Locate the zone and record for the configured hostname
//! - Resolve the current public IP (once)
//! - Compare and, on drift, update the record
//!
//! ## Run Phases
//!
//! ```text
//! Start ─▶ Locating ─┬─▶ Found ─▶ ResolvingIp ─▶ Comparing ─┬─▶ NoChange ─┐
//!                    │                                      └─▶ Updating ─┴─▶ Done
//!                    └─▶ NotFound ─▶ Failed
//! ```
//!
//! Phases only move forward. There is no retry loop; a scheduler that
//! invokes the whole process periodically owns retries.

pub mod locator;
pub mod reconciler;

pub use locator::{ResolvedTarget, locate};
pub use reconciler::{UpdateOutcome, reconcile};

use crate::config::HostnameSpec;
use crate::error::Result;
use crate::traits::{DnsProvider, IpSource};
use std::fmt;
use tracing::{debug, info, warn};

/// Phase of a synchronization run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    Locating,
    Found,
    NotFound,
    ResolvingIp,
    Comparing,
    NoChange,
    Updating,
    Done,
    Failed,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Start => "start",
            RunPhase::Locating => "locating",
            RunPhase::Found => "found",
            RunPhase::NotFound => "not-found",
            RunPhase::ResolvingIp => "resolving-ip",
            RunPhase::Comparing => "comparing",
            RunPhase::NoChange => "no-change",
            RunPhase::Updating => "updating",
            RunPhase::Done => "done",
            RunPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Single-pass DDNS synchronizer
///
/// Owns its collaborators explicitly; nothing is kept in process-wide
/// state. `run_once` may be called repeatedly (each call is a fresh pass),
/// but the binary calls it exactly once per process.
pub struct SyncEngine {
    /// DNS provider for listing and updating records
    provider: Box<dyn DnsProvider>,

    /// Source of the current public IP
    ip_source: Box<dyn IpSource>,

    /// The record to keep in sync
    hostname: HostnameSpec,
}

impl SyncEngine {
    /// Create a new engine
    pub fn new(
        provider: Box<dyn DnsProvider>,
        ip_source: Box<dyn IpSource>,
        hostname: HostnameSpec,
    ) -> Self {
        Self {
            provider,
            ip_source,
            hostname,
        }
    }

    /// The hostname this engine synchronizes
    pub fn hostname(&self) -> &HostnameSpec {
        &self.hostname
    }

    /// Run one reconciliation pass
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateOutcome)`: the record was already in sync or was updated
    /// - `Err(Error)`: configuration, lookup, provider or network failure
    pub async fn run_once(&self) -> Result<UpdateOutcome> {
        let mut phase = RunPhase::Start;
        info!(
            "Synchronizing {} via {}",
            self.hostname,
            self.provider.provider_name()
        );

        advance(&mut phase, RunPhase::Locating);
        let target = match locate(&self.hostname, self.provider.as_ref()).await {
            Ok(target) => {
                advance(&mut phase, RunPhase::Found);
                target
            }
            Err(e) => {
                if e.is_not_found() {
                    advance(&mut phase, RunPhase::NotFound);
                }
                advance(&mut phase, RunPhase::Failed);
                return Err(e);
            }
        };

        advance(&mut phase, RunPhase::ResolvingIp);
        debug!("Querying {}", self.ip_source.describe());
        let public_ip = self.ip_source.current().await.inspect_err(|e| {
            warn!("Public IP lookup failed: {}", e);
            advance(&mut phase, RunPhase::Failed);
        })?;
        debug!("Current public IP: {}", public_ip);

        advance(&mut phase, RunPhase::Comparing);
        let outcome = reconcile(&target, &self.hostname, &public_ip, self.provider.as_ref())
            .await
            .inspect_err(|_| advance(&mut phase, RunPhase::Failed))?;
        advance(&mut phase, outcome_phase(&outcome));

        advance(&mut phase, RunPhase::Done);
        Ok(outcome)
    }
}

fn advance(phase: &mut RunPhase, next: RunPhase) {
    debug!("Run phase: {} -> {}", phase, next);
    *phase = next;
}

/// The phase a reconciliation result settles in
fn outcome_phase(outcome: &UpdateOutcome) -> RunPhase {
    match outcome {
        UpdateOutcome::NoChangeNeeded { .. } => RunPhase::NoChange,
        UpdateOutcome::Updated { .. } => RunPhase::Updating,
    }
}
