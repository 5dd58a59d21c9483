// # HTTP IP Source
//
// This crate resolves the caller's current public IPv4 address by asking
// an external what-is-my-ip service.
//
// ## Endpoint
//
// The default endpoint is httpbin's `/ip`, which answers
//
// ```json
// {"origin": "203.0.113.1"}
// ```
//
// Any service speaking the same shape works; the URL is injectable, which
// the tests use.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use autocf_core::traits::IpSource;
use autocf_core::{Error, Result};

/// Default lookup endpoint
pub const DEFAULT_LOOKUP_URL: &str = "https://httpbin.org/ip";

/// HTTP timeout for lookup requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-based current-IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    origin: String,
}

impl HttpIpSource {
    /// Create a source against a custom endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_URL)
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("request to {} failed: {e}", self.url)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "{} answered {}",
                self.url,
                response.status()
            )));
        }

        let payload: LookupResponse = response
            .json()
            .await
            .map_err(|e| Error::ip_source(format!("decoding {} response failed: {e}", self.url)))?;

        let ip = payload.origin.trim().parse::<Ipv4Addr>().map_err(|_| {
            Error::ip_source(format!(
                "origin is not a single IPv4 address: {:?}",
                payload.origin
            ))
        })?;

        debug!("current public IPv4 is {ip}");
        Ok(ip)
    }
}
