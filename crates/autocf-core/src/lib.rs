// # autocf-core
//
// Core library for the Autocloudflare record reconciler.
//
// ## Architecture Overview
//
// This library provides everything except the outward-facing integrations:
// - **DnsProvider**: Trait for reading and updating records via a provider API
// - **IpSource**: Trait for resolving the current public IPv4 address
// - **Messenger**: Trait for delivering the batched change notification
// - **Reconciler**: Engine that converges watched records in one pass
// - **Notifier**: Ordered message collector flushed once per pass
// - **Settings**: Environment-driven configuration, loaded once at startup
//
// The concrete integrations live in `autocf-cloudflare`, `autocf-ip-http`
// and `autocf-notify-telegram`, wired together by the `autocf` binary.

pub mod config;
pub mod engine;
pub mod error;
pub mod notify;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use config::{parse_watch_list, Settings, Watchlist, DEFAULT_CLOUDFLARE_API_BASE};
pub use engine::Reconciler;
pub use error::{Error, Result};
pub use notify::Notifier;
pub use record::{DnsRecord, RecordContent, RecordUpdate, ZoneId};
pub use traits::{DnsProvider, IpSource, Messenger};
