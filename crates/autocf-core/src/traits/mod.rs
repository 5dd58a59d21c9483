//! Core traits for the reconciler
//!
//! This module defines the seams between the engine and its collaborators.
//!
//! - [`DnsProvider`]: Zone and record operations against the DNS API
//! - [`IpSource`]: The caller's current public IPv4 address
//! - [`Messenger`]: Outbound delivery of one composed notification

pub mod dns_provider;
pub mod ip_source;
pub mod messenger;

pub use dns_provider::DnsProvider;
pub use ip_source::IpSource;
pub use messenger::Messenger;
