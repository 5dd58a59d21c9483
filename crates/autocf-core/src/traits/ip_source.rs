// # IP Source Trait
//
// Defines the interface for resolving the caller's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP lookup service: `autocf-ip-http` crate

use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for current-IP source implementations
///
/// Only IPv4 is supported; watched records are `A` records.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IPv4 address
    ///
    /// Called once per reconciliation pass, so every watched record is
    /// compared against the same address.
    async fn current(&self) -> Result<Ipv4Addr>;
}
