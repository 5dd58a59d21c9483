// # Cloudflare DNS Provider
//
// This crate implements the `DnsProvider` seam against the Cloudflare v4
// REST API, authenticated with the legacy email + API key header pair.
//
// One HTTP request per operation, no retry and no caching; a failed call
// surfaces as an error with the raw response body attached.
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones`
// - List DNS Records: GET `/zones/:zone_id/dns_records`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use autocf_core::record::{DnsRecord, RecordUpdate, ZoneId};
use autocf_core::traits::DnsProvider;
use autocf_core::{Error, Result, Settings};

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// TTL value Cloudflare interprets as "automatic"
const AUTOMATIC_TTL: u32 = 1;

/// Cloudflare DNS provider
///
/// Credentials are attached to every request as default headers at
/// construction time; after that the client holds no secret fields.
pub struct CloudflareProvider {
    /// HTTP client with auth headers and timeout baked in
    client: reqwest::Client,

    /// API base URL, without a trailing slash
    base_api: String,
}

// Custom Debug implementation that keeps credentials out of logs
impl fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("base_api", &self.base_api)
            .finish_non_exhaustive()
    }
}

/// Envelope around every Cloudflare v4 response payload
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct Zone {
    id: String,
    name: String,
}

/// Full-record PUT payload.
///
/// Type and name are resent unchanged and the TTL is always the automatic
/// value; `proxied` is omitted entirely when the update does not touch it.
#[derive(Debug, Serialize)]
struct UpdateRecordBody<'a> {
    r#type: &'a str,
    name: &'a str,
    ttl: u32,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxied: Option<bool>,
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `base_api`: API base URL, e.g. `https://api.cloudflare.com/client/v4`
    /// - `email`: account email, sent as `X-Auth-Email`
    /// - `api_key`: account API key, sent as `X-Auth-Key`
    pub fn new(base_api: impl Into<String>, email: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .default_headers(auth_headers(email, api_key)?)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_api: base_api.into(),
        })
    }

    /// Create a provider from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.cloudflare_base_api.clone(),
            &settings.cloudflare_email,
            &settings.cloudflare_api_key,
        )
    }

    /// GET a path and decode the `result` field of the envelope
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_api, path);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::http(format!("GET {path} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("reading GET {path} response failed: {e}")))?;

        if !status.is_success() {
            return Err(Error::provider(status.as_u16(), body));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        Ok(envelope.result)
    }

    /// PUT a JSON payload to a path, discarding the response body on success
    async fn put_json(&self, path: &str, payload: &impl Serialize) -> Result<()> {
        let url = format!("{}{}", self.base_api, path);
        debug!("PUT {url}");

        let response = self
            .client
            .put(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| Error::http(format!("PUT {path} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::provider(status.as_u16(), body));
        }

        Ok(())
    }
}

/// Build the legacy auth header pair, with the key marked sensitive
fn auth_headers(email: &str, api_key: &str) -> Result<HeaderMap> {
    if email.is_empty() {
        return Err(Error::config("`cloudflare_email` must not be empty"));
    }
    if api_key.is_empty() {
        return Err(Error::config("`cloudflare_api_key` must not be empty"));
    }

    let email = HeaderValue::from_str(email)
        .map_err(|_| Error::config("`cloudflare_email` is not a valid header value"))?;
    let mut key = HeaderValue::from_str(api_key)
        .map_err(|_| Error::config("`cloudflare_api_key` is not a valid header value"))?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("X-Auth-Email", email);
    headers.insert("X-Auth-Key", key);
    Ok(headers)
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Resolve the single zone the account owns
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones
    /// X-Auth-Email: <email>
    /// X-Auth-Key: <key>
    /// ```
    async fn resolve_zone(&self) -> Result<ZoneId> {
        let mut zones: Vec<Zone> = self.get_json("/zones").await?;

        if zones.len() != 1 {
            return Err(Error::config(format!(
                "the account must own exactly one zone, found {}",
                zones.len()
            )));
        }

        let zone = zones.remove(0);
        debug!("resolved zone '{}' to id {}", zone.name, zone.id);
        Ok(ZoneId::new(zone.id))
    }

    /// Fetch every record of the zone
    ///
    /// A single unpaginated call; the zones this tool manages fit in the
    /// first page.
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records
    /// ```
    async fn list_records(&self, zone: &ZoneId) -> Result<Vec<DnsRecord>> {
        self.get_json(&format!("/zones/{zone}/dns_records")).await
    }

    /// Apply a partial change as a full-record PUT
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "type": "A",
    ///   "name": "www.example.com",
    ///   "ttl": 1,
    ///   "content": "198.51.100.10",
    ///   "proxied": true          // only when the update sets it
    /// }
    /// ```
    async fn update_record(
        &self,
        zone: &ZoneId,
        record: &DnsRecord,
        update: RecordUpdate,
    ) -> Result<()> {
        let payload = UpdateRecordBody {
            r#type: &record.r#type,
            name: &record.name,
            ttl: AUTOMATIC_TTL,
            content: match update.content {
                Some(ip) => ip.to_string(),
                None => record.content.to_string(),
            },
            proxied: update.proxied,
        };

        self.put_json(
            &format!("/zones/{zone}/dns_records/{}", record.id),
            &payload,
        )
        .await
    }
}
