// # DNS Provider Trait
//
// Defines the interface for reading and updating DNS records via a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `autocf-cloudflare` crate

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{DnsRecord, RecordUpdate, ZoneId};

/// Trait for DNS provider implementations
///
/// The engine owns all decision logic. Implementations authenticate out of
/// band (credentials are attached at construction) and perform exactly one
/// API call per method; a failed call is returned as an error and never
/// retried here.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Resolve the single zone the account owns
    ///
    /// The tool manages exactly one zone. Accounts owning zero or several
    /// zones fail with [`Error::Config`](crate::Error::Config) before any
    /// record is touched.
    async fn resolve_zone(&self) -> Result<ZoneId>;

    /// Fetch every record of the zone in one call
    ///
    /// Zones are assumed small enough that pagination never kicks in; the
    /// first page is the whole answer.
    async fn list_records(&self, zone: &ZoneId) -> Result<Vec<DnsRecord>>;

    /// Apply a partial change to one record
    ///
    /// Full-record replacement semantics: the record's type and name are
    /// resent unchanged, the TTL is forced to the provider's "automatic"
    /// value, and fields absent from `update` keep their current value.
    async fn update_record(
        &self,
        zone: &ZoneId,
        record: &DnsRecord,
        update: RecordUpdate,
    ) -> Result<()>;
}
