//! Test doubles and common utilities for engine behavior tests
//!
//! The doubles record every call so tests can assert on exactly which
//! updates and notifications a pass produced.

use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use autocf_core::config::Watchlist;
use autocf_core::error::{Error, Result};
use autocf_core::record::{DnsRecord, RecordContent, RecordUpdate, ZoneId};
use autocf_core::traits::{DnsProvider, IpSource, Messenger};

/// Build a watch-list pair from hostname slices
pub fn watchlist(common: &[&str], nocached: &[&str]) -> Watchlist {
    Watchlist {
        common: common.iter().map(|name| name.to_string()).collect(),
        nocached: nocached.iter().map(|name| name.to_string()).collect(),
    }
}

/// Build a record of the given type for tests.
///
/// Content that parses as a dotted quad becomes an IPv4 payload, matching
/// how provider responses are decoded.
pub fn record(id: &str, name: &str, record_type: &str, content: &str, proxied: bool) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        r#type: record_type.to_string(),
        content: match content.parse::<Ipv4Addr>() {
            Ok(ip) => RecordContent::Ipv4(ip),
            Err(_) => RecordContent::Other(content.to_string()),
        },
        proxied,
    }
}

/// Build an `A` record for tests
pub fn a_record(id: &str, name: &str, content: &str, proxied: bool) -> DnsRecord {
    record(id, name, "A", content, proxied)
}

/// The zone every mock provider pretends to own
pub fn test_zone() -> ZoneId {
    ZoneId::new("zone-1")
}

/// A mock DnsProvider over an in-memory zone
///
/// Updates are applied to the stored records, so a second pass over the
/// same provider observes the converged state.
pub struct MockDnsProvider {
    /// The zone's records, mutated by update calls
    records: Arc<Mutex<Vec<DnsRecord>>>,
    /// Recorded (record name, update) pairs, in call order
    updates: Arc<Mutex<Vec<(String, RecordUpdate)>>>,
    /// Call counter for list_records()
    list_call_count: Arc<AtomicUsize>,
    /// Record name whose update call fails, if any
    fail_update_for: Option<String>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            updates: Arc::new(Mutex::new(Vec::new())),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            fail_update_for: None,
        }
    }

    /// Like [`new`](Self::new), but the update call for `name` fails
    pub fn failing_update_on(records: Vec<DnsRecord>, name: &str) -> Self {
        Self {
            fail_update_for: Some(name.to_string()),
            ..Self::new(records)
        }
    }

    /// Create a MockDnsProvider that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            records: Arc::clone(&other.records),
            updates: Arc::clone(&other.updates),
            list_call_count: Arc::clone(&other.list_call_count),
            fail_update_for: other.fail_update_for.clone(),
        }
    }

    /// Get the recorded update calls, in order
    pub fn updates(&self) -> Vec<(String, RecordUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    /// Get the number of update calls that went through
    pub fn update_call_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    /// Get the number of times list_records() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the zone's records
    pub fn records(&self) -> Vec<DnsRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn resolve_zone(&self) -> Result<ZoneId> {
        Ok(test_zone())
    }

    async fn list_records(&self, _zone: &ZoneId) -> Result<Vec<DnsRecord>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().clone())
    }

    async fn update_record(
        &self,
        _zone: &ZoneId,
        record: &DnsRecord,
        update: RecordUpdate,
    ) -> Result<()> {
        if self.fail_update_for.as_deref() == Some(record.name.as_str()) {
            return Err(Error::provider(500, "injected update failure"));
        }

        self.updates
            .lock()
            .unwrap()
            .push((record.name.clone(), update));

        let mut records = self.records.lock().unwrap();
        if let Some(stored) = records.iter_mut().find(|stored| stored.id == record.id) {
            if let Some(ip) = update.content {
                stored.content = RecordContent::Ipv4(ip);
            }
            if let Some(flag) = update.proxied {
                stored.proxied = flag;
            }
        }
        Ok(())
    }
}

/// An IpSource that always answers with the same address
pub struct FixedIpSource {
    ip: Ipv4Addr,
    /// Call counter for current()
    current_call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: Ipv4Addr) -> Self {
        Self {
            ip,
            current_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a FixedIpSource that shares its counter with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            current_call_count: Arc::clone(&other.current_call_count),
        }
    }

    /// Get the number of times current() was called
    pub fn current_call_count(&self) -> usize {
        self.current_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// A Messenger that records every delivered text
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RecordingMessenger that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            sent: Arc::clone(&other.sent),
        }
    }

    /// Get every delivered text, in order
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Get the number of times send() was called
    pub fn send_call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// A Messenger whose send() always fails
pub struct FailingMessenger {
    /// Call counter for send()
    send_call_count: Arc<AtomicUsize>,
}

impl FailingMessenger {
    pub fn new() -> Self {
        Self {
            send_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a FailingMessenger that shares its counter with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            send_call_count: Arc::clone(&other.send_call_count),
        }
    }

    /// Get the number of times send() was called
    pub fn send_call_count(&self) -> usize {
        self.send_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Messenger for FailingMessenger {
    async fn send(&self, _text: &str) -> Result<()> {
        self.send_call_count.fetch_add(1, Ordering::SeqCst);
        Err(Error::notification(500, "injected delivery failure"))
    }
}
