// # ddns-core
//
// Core library for the one-shot DDNS synchronizer.
//
// ## Architecture Overview
//
// This library holds everything that decides, and nothing that talks to
// the network:
// - **IpSource**: Trait for discovering the current public IP
// - **DnsProvider**: Trait for listing zones/records and updating a record
// - **HostnameSpec**: A configured hostname split into record label and zone
// - **locate**: Finds the zone and record a hostname refers to
// - **reconcile**: Compares record target and public IP, updates on drift
// - **SyncEngine**: Runs locate → resolve IP → reconcile exactly once
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from provider and probe implementations
// 2. **Stateless**: Every run rebuilds its view from live provider data
// 3. **Single-shot**: No retry loops; errors propagate to the caller
// 4. **Library-First**: All core functionality can be used as a library

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{DnsProvider, IpSource, PublicIp};
pub use engine::{ResolvedTarget, SyncEngine, UpdateOutcome, locate, reconcile};
pub use config::{HostnameSpec, IpSourceConfig, ProviderConfig, SyncConfig};
pub use error::{Error, Result};
