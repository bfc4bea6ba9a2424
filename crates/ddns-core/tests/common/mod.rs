//! Test doubles and common utilities for synchronizer contract tests
//!
//! The doubles record every call so tests can assert on how many network
//! operations a run would have issued.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{
    DnsProvider, IpSource, PublicIp, Record, RecordCreate, RecordId, RecordUpdate, Zone, ZoneId,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An in-memory DnsProvider that tracks calls
#[derive(Clone, Default)]
pub struct FakeDnsProvider {
    zones: Vec<Zone>,
    records: HashMap<ZoneId, Vec<Record>>,
    fail_list_zones: bool,
    fail_update: bool,
    list_zones_calls: Arc<AtomicUsize>,
    list_records_calls: Arc<Mutex<Vec<ZoneId>>>,
    updates: Arc<Mutex<Vec<(ZoneId, RecordId, RecordUpdate)>>>,
}

impl FakeDnsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, id: u64, domain: &str) -> Self {
        self.zones.push(zone(id, domain));
        self
    }

    pub fn with_record(mut self, zone_id: u64, id: u64, name: &str, target: &str) -> Self {
        self.records
            .entry(ZoneId(zone_id))
            .or_default()
            .push(record(id, name, target));
        self
    }

    pub fn failing_list_zones(mut self) -> Self {
        self.fail_list_zones = true;
        self
    }

    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    /// Number of list_zones() calls
    pub fn list_zones_calls(&self) -> usize {
        self.list_zones_calls.load(Ordering::SeqCst)
    }

    /// Zones whose records were listed, in call order
    pub fn listed_record_zones(&self) -> Vec<ZoneId> {
        self.list_records_calls.lock().unwrap().clone()
    }

    /// Every update_record() call
    pub fn updates(&self) -> Vec<(ZoneId, RecordId, RecordUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn update_call_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DnsProvider for FakeDnsProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.list_zones_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_zones {
            return Err(Error::provider("fake", "Authentication failed"));
        }
        Ok(self.zones.clone())
    }

    async fn list_records(&self, zone_id: ZoneId) -> Result<Vec<Record>> {
        self.list_records_calls.lock().unwrap().push(zone_id);
        Ok(self.records.get(&zone_id).cloned().unwrap_or_default())
    }

    async fn create_record(&self, _zone_id: ZoneId, create: RecordCreate) -> Result<Record> {
        Ok(Record {
            id: RecordId(999),
            name: create.name,
            record_type: create.record_type,
            target: create.target,
        })
    }

    async fn update_record(
        &self,
        zone_id: ZoneId,
        record_id: RecordId,
        update: RecordUpdate,
    ) -> Result<Record> {
        self.updates
            .lock()
            .unwrap()
            .push((zone_id, record_id, update.clone()));
        if self.fail_update {
            return Err(Error::provider("fake", "Server error (transient): 503"));
        }
        Ok(Record {
            id: record_id,
            name: update.name,
            record_type: update.record_type,
            target: update.target,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// An IpSource returning a fixed address and counting queries
#[derive(Clone)]
pub struct FixedIpSource {
    ip: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: Some(ip.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source whose lookup always fails
    pub fn unreachable() -> Self {
        Self {
            ip: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<PublicIp> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.ip
            .as_deref()
            .map(PublicIp::new)
            .ok_or_else(|| Error::network("Request failed: operation timed out"))
    }

    fn describe(&self) -> String {
        "fixed test source".to_string()
    }
}

pub fn zone(id: u64, domain: &str) -> Zone {
    Zone {
        id: ZoneId(id),
        domain: domain.to_string(),
    }
}

pub fn record(id: u64, name: &str, target: &str) -> Record {
    Record {
        id: RecordId(id),
        name: name.to_string(),
        record_type: "A".to_string(),
        target: target.to_string(),
    }
}

/// The account used by the end-to-end scenarios: one zone, one record
pub fn home_example_account() -> FakeDnsProvider {
    FakeDnsProvider::new()
        .with_zone(1, "example.com")
        .with_record(1, 10, "home", "1.2.3.4")
}
