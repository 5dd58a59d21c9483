//! DNS record model
//!
//! The engine works on these types only; how they map onto a concrete
//! provider API is the business of the provider crates.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Identifier of the provider-side zone all records live in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneId(String);

impl ZoneId {
    /// Wrap a provider-assigned zone identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One provider-side DNS entry, fetched fresh every pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsRecord {
    /// Opaque identifier assigned by the provider
    pub id: String,
    /// Fully-qualified hostname; the watch-list matching key
    pub name: String,
    /// Record type; only `"A"` records are ever reconciled
    pub r#type: String,
    /// Record payload
    pub content: RecordContent,
    /// Whether provider-side proxying is enabled for this record
    pub proxied: bool,
}

/// Payload of a DNS record.
///
/// The provider sends every content as a string; anything that parses as a
/// dotted-quad IPv4 address is kept as one, so `A` records compare directly
/// against the current public address. Everything else stays opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordContent {
    /// An IPv4 address, as carried by `A` records
    Ipv4(Ipv4Addr),
    /// Any other payload, kept verbatim
    Other(String),
}

impl fmt::Display for RecordContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4(ip) => ip.fmt(f),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl PartialEq<Ipv4Addr> for RecordContent {
    fn eq(&self, other: &Ipv4Addr) -> bool {
        matches!(self, Self::Ipv4(ip) if ip == other)
    }
}

impl<'de> Deserialize<'de> for RecordContent {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match Ipv4Addr::from_str(&raw) {
            Ok(ip) => Self::Ipv4(ip),
            Err(_) => Self::Other(raw),
        })
    }
}

/// Partial change to apply to one record.
///
/// Fields left at `None` keep the record's current value when the provider
/// payload is built. The engine issues at most one content change and one
/// proxy change per record and pass, each as its own update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordUpdate {
    /// New IPv4 content, when the content check fired
    pub content: Option<Ipv4Addr>,
    /// New proxy flag, when a proxy check fired
    pub proxied: Option<bool>,
}

impl RecordUpdate {
    /// Change only the record content
    pub fn content(ip: Ipv4Addr) -> Self {
        Self {
            content: Some(ip),
            proxied: None,
        }
    }

    /// Change only the proxy flag
    pub fn proxied(flag: bool) -> Self {
        Self {
            content: None,
            proxied: Some(flag),
        }
    }
}
