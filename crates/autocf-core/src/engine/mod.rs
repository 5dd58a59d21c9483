//! Reconciliation engine
//!
//! The Reconciler is responsible for:
//! - Fetching the zone's records via DnsProvider
//! - Resolving the current public IPv4 via IpSource
//! - Converging every watched `A` record, content first, proxy flag second
//! - Describing each applied change to the Notifier
//!
//! ## Pass Flow
//!
//! 1. List all records of the zone
//! 2. Resolve the current public IPv4 once
//! 3. For each `A` record on a watch-list, compare and update
//! 4. Flush the batched notification, on success and failure alike
//!
//! Calls run strictly one after another; a failed update aborts the pass and
//! the error carries to the caller after the flush.

use tracing::{debug, info, warn};

use crate::config::Watchlist;
use crate::error::Result;
use crate::notify::Notifier;
use crate::record::{DnsRecord, RecordUpdate, ZoneId};
use crate::traits::{DnsProvider, IpSource, Messenger};

/// Core reconciliation engine
///
/// Owns all decision logic: which records to touch, in which order, and what
/// each change is called in the notification. The collaborators behind the
/// trait objects only execute single calls.
pub struct Reconciler {
    /// DNS provider for reading and updating records
    provider: Box<dyn DnsProvider>,

    /// Source of the current public IPv4 address
    ip_source: Box<dyn IpSource>,

    /// Delivery channel for the batched change notification
    messenger: Box<dyn Messenger>,

    /// Hostnames to manage, split by desired proxy state
    watchlist: Watchlist,
}

impl Reconciler {
    /// Create a new reconciler
    pub fn new(
        provider: Box<dyn DnsProvider>,
        ip_source: Box<dyn IpSource>,
        messenger: Box<dyn Messenger>,
        watchlist: Watchlist,
    ) -> Self {
        Self {
            provider,
            ip_source,
            messenger,
            watchlist,
        }
    }

    /// Run one reconciliation pass over the zone
    ///
    /// The notification is flushed before this returns, whether the pass
    /// completed or aborted on a failed call. When the pass and the flush
    /// both fail, the pass error wins and the flush failure is logged.
    pub async fn run(&self, zone: &ZoneId) -> Result<()> {
        let mut notifier = Notifier::new();
        let outcome = self.pass(zone, &mut notifier).await;
        let flushed = notifier.flush(self.messenger.as_ref()).await;

        match outcome {
            Ok(()) => flushed,
            Err(err) => {
                if let Err(flush_err) = flushed {
                    warn!("notification flush failed after aborted pass: {flush_err}");
                }
                Err(err)
            }
        }
    }

    async fn pass(&self, zone: &ZoneId, notifier: &mut Notifier) -> Result<()> {
        let records = self.provider.list_records(zone).await?;
        let current_ip = self.ip_source.current().await?;
        info!(
            "reconciling {} records against current IP {current_ip}",
            records.len()
        );

        for record in &records {
            if record.r#type != "A" {
                continue;
            }
            if !self.watchlist.is_known(&record.name) {
                debug!("record '{}' is not watched, skipping", record.name);
                continue;
            }

            if record.content != current_ip {
                notifier.register(format!("Updating `IP={current_ip}` of '{}'", record.name));
                self.update(zone, record, RecordUpdate::content(current_ip))
                    .await?;
            }

            // Checked in this order so a hostname on both lists ends up
            // unproxied.
            if self.watchlist.is_nocached(&record.name) && record.proxied {
                notifier.register(format!("Updating `proxy=False` of '{}'", record.name));
                self.update(zone, record, RecordUpdate::proxied(false))
                    .await?;
            } else if self.watchlist.is_common(&record.name) && !record.proxied {
                notifier.register(format!("Updating `proxy=True` of '{}'", record.name));
                self.update(zone, record, RecordUpdate::proxied(true))
                    .await?;
            }
        }

        Ok(())
    }

    /// Perform a single update call
    async fn update(&self, zone: &ZoneId, record: &DnsRecord, update: RecordUpdate) -> Result<()> {
        info!(
            "updating record '{}' ({:?} -> content: {:?}, proxied: {:?})",
            record.name, record.content, update.content, update.proxied
        );
        self.provider.update_record(zone, record, update).await
    }
}
