//! Core traits for the DDNS synchronizer
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Discover the current public IP
//! - [`DnsProvider`]: List zones and records, update a record via provider APIs

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::{IpSource, PublicIp};
pub use dns_provider::{DnsProvider, Record, RecordCreate, RecordId, RecordUpdate, Zone, ZoneId};
